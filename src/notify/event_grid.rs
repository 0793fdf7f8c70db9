use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Notification, Notifier};
use crate::cms::ClientError;

const EVENT_TYPE: &str = "KenticoDocs.Notification.Created";
const SUBJECT: &str = "Publisher notification";
const API_VERSION: &str = "2018-01-01";

/// Event Grid envelope consumed by the notification service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventGridEvent {
    pub id: Uuid,
    pub subject: String,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub data_version: String,
    pub data: NotificationData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub activity_title: String,
    pub mode: String,
    pub text: String,
}

impl EventGridEvent {
    pub fn error(notification: &Notification) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: SUBJECT.to_string(),
            event_type: EVENT_TYPE.to_string(),
            event_time: Utc::now(),
            data_version: "1.0".to_string(),
            data: NotificationData {
                activity_title: notification.title.clone(),
                mode: "error".to_string(),
                text: notification.text.clone(),
            },
        }
    }
}

/// Publishes notifications to an Event Grid topic.
#[derive(Debug, Clone)]
pub struct EventGridNotifier {
    endpoint: String,
    key: String,
    client: Client,
}

impl EventGridNotifier {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for EventGridNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), ClientError> {
        let events = vec![EventGridEvent::error(notification)];
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("api-version", API_VERSION)])
            .header("aeg-sas-key", &self.key)
            .json(&events)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }
}
