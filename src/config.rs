//! Runtime configuration loaded from environment variables.
//!
//! Required values are all checked before the first CMS call.

use chrono::Duration;
use thiserror::Error;

use crate::cms::KontentEndpoints;
use crate::models::WorkflowStepIds;

const DEFAULT_DUE_WINDOW_MINUTES: i64 = 10;
/// One week.
const MAX_DUE_WINDOW_MINUTES: i64 = 7 * 24 * 60;
const DEFAULT_SCAN_DEPTH: u32 = 1;
const DEFAULT_EVENT_DEPTH: u32 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the publisher needs to talk to the CMS and the notifier.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub preview_api_key: String,
    pub management_api_key: String,
    pub internal_api_token: String,
    pub endpoints: KontentEndpoints,
    pub steps: WorkflowStepIds,
    pub notifier_endpoint: String,
    pub notifier_key: String,
    pub cascade: CascadeSettings,
}

/// Tunables of the cascade walk itself.
#[derive(Debug, Clone)]
pub struct CascadeSettings {
    /// How far ahead a scheduled item still counts as due.
    pub due_window: Duration,
    /// Linked-item depth of the whole-project scan.
    pub scan_depth: u32,
    /// Linked-item depth when cascading a single transitioned item.
    pub event_depth: u32,
}

impl Default for CascadeSettings {
    fn default() -> Self {
        Self {
            due_window: Duration::minutes(DEFAULT_DUE_WINDOW_MINUTES),
            scan_depth: DEFAULT_SCAN_DEPTH,
            event_depth: DEFAULT_EVENT_DEPTH,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let defaults = KontentEndpoints::default();
        let endpoints = KontentEndpoints {
            delivery_url: optional("KC_DELIVERY_URL").unwrap_or(defaults.delivery_url),
            management_url: optional("KC_MANAGEMENT_URL").unwrap_or(defaults.management_url),
            internal_url: optional("KC_INTERNAL_URL").unwrap_or(defaults.internal_url),
        };

        let due_window = due_window(optional("CASCADE_DUE_WINDOW_MINUTES"))?;

        Ok(Self {
            project_id: required("KC_PROJECT_ID")?,
            preview_api_key: required("KC_PREVIEW_API_KEY")?,
            management_api_key: required("KC_CONTENT_MANAGEMENT_API_KEY")?,
            internal_api_token: required("KC_INTERNAL_API_TOKEN")?,
            endpoints,
            steps: WorkflowStepIds {
                cascade_publish: required("KC_STEP_CASCADE_PUBLISH_ID")?,
                scheduled: required("KC_STEP_SCHEDULED_PUBLISH_ID")?,
                published: required("KC_STEP_PUBLISHED_ID")?,
                archived: required("KC_STEP_ARCHIVED_ID")?,
            },
            notifier_endpoint: required("NOTIFIER_ENDPOINT")?,
            notifier_key: required("NOTIFIER_KEY")?,
            cascade: CascadeSettings {
                due_window,
                scan_depth: parse_or(
                    "CASCADE_SCAN_DEPTH",
                    optional("CASCADE_SCAN_DEPTH"),
                    DEFAULT_SCAN_DEPTH,
                )?,
                event_depth: parse_or(
                    "CASCADE_EVENT_DEPTH",
                    optional("CASCADE_EVENT_DEPTH"),
                    DEFAULT_EVENT_DEPTH,
                )?,
            },
        })
    }
}

/// Due window in minutes, between zero and one week.
fn due_window(raw: Option<String>) -> Result<Duration, ConfigError> {
    const NAME: &str = "CASCADE_DUE_WINDOW_MINUTES";
    let minutes: i64 = parse_or(NAME, raw, DEFAULT_DUE_WINDOW_MINUTES)?;
    (0..=MAX_DUE_WINDOW_MINUTES)
        .contains(&minutes)
        .then(|| Duration::try_minutes(minutes))
        .flatten()
        .ok_or_else(|| ConfigError::Invalid {
            name: NAME,
            value: minutes.to_string(),
        })
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
