//! HTTP client for the Kontent.ai APIs used by the cascade.
//!
//! Three APIs are involved:
//! - Delivery preview API: item listings with linked items resolved
//! - Management API: workflow step lookup and publish/schedule
//! - Internal draft API: scheduled publish time of a variant
//!
//! Management and internal calls are wrapped in [`retry_with_policy`] so the
//! cascade survives the API's rate limit without its own retry loop.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::delivery::DeliveryListing;
use super::retry::{is_retryable_status, retry_with_policy, RetryPolicy};
use super::{ContentSnapshotProvider, PublishMutator, ScheduleTimeProvider, WorkflowStepProvider};
use crate::config::Config;
use crate::models::{ScheduleData, Snapshot, DEFAULT_LANGUAGE_ID};

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: API key missing or invalid")]
    Unauthorized,

    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether the failure is transient and the call may be repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => is_retryable_status(*status),
            Self::NotFound(_) | Self::Unauthorized | Self::Decode(_) => false,
        }
    }
}

/// Base URLs of the Kontent.ai APIs.
#[derive(Debug, Clone)]
pub struct KontentEndpoints {
    pub delivery_url: String,
    pub management_url: String,
    pub internal_url: String,
}

impl Default for KontentEndpoints {
    fn default() -> Self {
        Self {
            delivery_url: "https://preview-deliver.kontent.ai".to_string(),
            management_url: "https://manage.kontent.ai/v2".to_string(),
            internal_url: "https://app.kontent.ai/api".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VariantResponse {
    workflow_step: Option<WorkflowStepRef>,
}

#[derive(Debug, Deserialize)]
struct WorkflowStepRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InternalVariantResponse {
    variant: InternalVariant,
}

#[derive(Debug, Deserialize)]
struct InternalVariant {
    assignment: InternalAssignment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InternalAssignment {
    publish_schedule_time: Option<DateTime<Utc>>,
}

/// HTTP client for one Kontent.ai project.
#[derive(Debug, Clone)]
pub struct KontentClient {
    project_id: String,
    preview_api_key: String,
    management_api_key: String,
    internal_api_token: String,
    endpoints: KontentEndpoints,
    retry: RetryPolicy,
    client: Client,
}

impl KontentClient {
    pub fn new(
        project_id: impl Into<String>,
        preview_api_key: impl Into<String>,
        management_api_key: impl Into<String>,
        internal_api_token: impl Into<String>,
        endpoints: KontentEndpoints,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            preview_api_key: preview_api_key.into(),
            management_api_key: management_api_key.into(),
            internal_api_token: internal_api_token.into(),
            endpoints,
            retry: RetryPolicy::default(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.project_id,
            &config.preview_api_key,
            &config.management_api_key,
            &config.internal_api_token,
            config.endpoints.clone(),
        )
    }

    fn delivery_url(&self, path: &str) -> String {
        format!("{}/{}{}", self.endpoints.delivery_url, self.project_id, path)
    }

    fn management_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}{}",
            self.endpoints.management_url, self.project_id, path
        )
    }

    fn internal_url(&self, path: &str) -> String {
        format!(
            "{}/project/{}{}",
            self.endpoints.internal_url, self.project_id, path
        )
    }

    /// Map non-success statuses onto [`ClientError`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
            _ => Err(ClientError::Status { status, body }),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get_listing(&self, query: &[(&str, String)]) -> Result<Snapshot, ClientError> {
        let response = self
            .client
            .get(self.delivery_url("/items"))
            .bearer_auth(&self.preview_api_key)
            .query(query)
            .send()
            .await?;
        let listing: DeliveryListing = Self::handle_response(response).await?;
        Ok(listing.into())
    }

    async fn put_publish(&self, item_id: Uuid, data: Option<&ScheduleData>) -> Result<(), ClientError> {
        let url = self.management_url(&format!(
            "/items/{}/variants/{}/publish",
            item_id, DEFAULT_LANGUAGE_ID
        ));
        let (client, url, key) = (&self.client, &url, &self.management_api_key);
        retry_with_policy(&self.retry, "publish_variant", move || async move {
            let mut request = client.put(url).bearer_auth(key);
            if let Some(data) = data {
                request = request.json(data);
            }
            Self::check_status(request.send().await?).await.map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl ContentSnapshotProvider for KontentClient {
    async fn fetch_snapshot(&self, depth: u32) -> Result<Snapshot, ClientError> {
        self.get_listing(&[("depth", depth.to_string())]).await
    }

    async fn fetch_item_snapshot(
        &self,
        item_id: Uuid,
        depth: u32,
    ) -> Result<Snapshot, ClientError> {
        self.get_listing(&[("system.id", item_id.to_string()), ("depth", depth.to_string())])
            .await
    }
}

#[async_trait]
impl WorkflowStepProvider for KontentClient {
    async fn workflow_step(&self, codename: &str) -> Result<String, ClientError> {
        let url = self.management_url(&format!(
            "/items/codename/{}/variants/{}",
            codename, DEFAULT_LANGUAGE_ID
        ));
        let (client, url, key) = (&self.client, &url, &self.management_api_key);
        let variant: VariantResponse =
            retry_with_policy(&self.retry, "view_variant", move || async move {
                let response = client.get(url).bearer_auth(key).send().await?;
                Self::handle_response(response).await
            })
            .await?;

        Ok(variant
            .workflow_step
            .and_then(|step| step.id)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ScheduleTimeProvider for KontentClient {
    async fn scheduled_time(&self, item_id: Uuid) -> Result<Option<DateTime<Utc>>, ClientError> {
        let url = self.internal_url(&format!("/item/{}/variant/{}", item_id, DEFAULT_LANGUAGE_ID));
        let (client, url, token) = (&self.client, &url, &self.internal_api_token);
        let variant: InternalVariantResponse =
            retry_with_policy(&self.retry, "view_schedule", move || async move {
                let response = client.get(url).bearer_auth(token).send().await?;
                Self::handle_response(response).await
            })
            .await?;

        Ok(variant.variant.assignment.publish_schedule_time)
    }
}

#[async_trait]
impl PublishMutator for KontentClient {
    async fn publish(&self, item_id: Uuid) -> Result<(), ClientError> {
        self.put_publish(item_id, None).await
    }

    async fn schedule(&self, item_id: Uuid, data: &ScheduleData) -> Result<(), ClientError> {
        self.put_publish(item_id, Some(data)).await
    }
}
