use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::cascade::{CascadePublisher, CascadeReport};
use crate::models::WorkflowEventData;

/// Event Grid handshake sent when a subscription is created.
pub const SUBSCRIPTION_VALIDATION_EVENT: &str = "Microsoft.EventGrid.SubscriptionValidationEvent";

/// An Event Grid event as delivered to the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default)]
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

// ============================================================
// Error Handling
// ============================================================

/// Log a failed run and return a sanitized response.
///
/// The full error chain is logged so the host's alerting picks it up;
/// callers only learn that the run failed.
fn internal_error(e: impl std::error::Error) -> (StatusCode, String) {
    let mut chain = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    tracing::error!("Cascade failed: {}", chain);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Cascade publish failed".to_string(),
    )
}

fn bad_request(msg: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = msg.to_string();
    tracing::warn!("Rejected event: {}", msg);
    (StatusCode::BAD_REQUEST, msg)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Triggers
// ============================================================

pub async fn run_cascade(
    State(publisher): State<CascadePublisher>,
) -> Result<Json<CascadeReport>, (StatusCode, String)> {
    publisher.run_scan().await.map(Json).map_err(internal_error)
}

/// Cascade every transition carried by a batch of Event Grid events.
///
/// Transitions are processed one after another; the first failure aborts the
/// batch so Event Grid redelivers it.
pub async fn receive_events(
    State(publisher): State<CascadePublisher>,
    Json(events): Json<Vec<InboundEvent>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let mut report = CascadeReport::default();

    for event in events {
        if event.event_type == SUBSCRIPTION_VALIDATION_EVENT {
            let code = event
                .data
                .get("validationCode")
                .and_then(|v| v.as_str())
                .ok_or_else(|| bad_request("validation event without validationCode"))?;
            tracing::info!("Answering Event Grid subscription validation");
            return Ok(Json(serde_json::json!({ "validationResponse": code })));
        }

        let data: WorkflowEventData = serde_json::from_value(event.data)
            .map_err(|e| bad_request(format!("event {}: {}", event.id, e)))?;

        for transition in &data.webhook.items {
            let run = publisher
                .run_transition(transition)
                .await
                .map_err(internal_error)?;
            report.merge(run);
        }
    }

    Ok(Json(serde_json::json!(report)))
}
