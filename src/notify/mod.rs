//! Operator notifications for failed publish calls.

mod event_grid;

pub use event_grid::{EventGridEvent, EventGridNotifier, NotificationData};

use async_trait::async_trait;
use uuid::Uuid;

use crate::cms::ClientError;
use crate::models::DEFAULT_LANGUAGE_ID;

pub const FAILURE_TITLE: &str = "Cascade publish failed.";

/// A message for the operators' channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub text: String,
}

impl Notification {
    /// Failure message linking straight to the item in the CMS UI.
    ///
    /// Underscores in the codename are escaped because the text is rendered
    /// as Markdown.
    pub fn publish_failed(project_id: &str, codename: &str, item_id: Uuid, error: &str) -> Self {
        let headline = format!("Publishing of content item **{}** has failed.", codename)
            .replace('_', "\\_");
        let text = format!(
            "{}  {}: [Content item in Kentico Kontent](https://app.kontent.ai/{}/content-inventory/{}/content/{})",
            headline, error, project_id, DEFAULT_LANGUAGE_ID, item_id
        );
        Self {
            title: FAILURE_TITLE.to_string(),
            text,
        }
    }
}

/// Sink for operator notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), ClientError>;
}
