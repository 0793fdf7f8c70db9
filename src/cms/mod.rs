//! CMS collaborators of the cascade.
//!
//! The walker only sees the traits below. [`KontentClient`] implements all of
//! them over HTTP; tests substitute in-memory fakes.

mod client;
mod delivery;
pub mod retry;

pub use client::{ClientError, KontentClient, KontentEndpoints};
pub use delivery::{DeliveryElement, DeliveryItem, DeliveryListing, DeliverySystem};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ScheduleData, Snapshot};

/// Read access to the item graph.
#[async_trait]
pub trait ContentSnapshotProvider: Send + Sync {
    /// All items of the project with linked items resolved `depth` hops deep.
    async fn fetch_snapshot(&self, depth: u32) -> Result<Snapshot, ClientError>;

    /// A single item by id with its linked items resolved `depth` hops deep.
    async fn fetch_item_snapshot(&self, item_id: Uuid, depth: u32)
        -> Result<Snapshot, ClientError>;
}

/// Current workflow step of an item's default language variant.
#[async_trait]
pub trait WorkflowStepProvider: Send + Sync {
    async fn workflow_step(&self, codename: &str) -> Result<String, ClientError>;
}

#[async_trait]
pub trait ScheduleTimeProvider: Send + Sync {
    /// Scheduled publish time of an item, if one is set.
    async fn scheduled_time(&self, item_id: Uuid) -> Result<Option<DateTime<Utc>>, ClientError>;
}

/// Workflow mutations on an item's default language variant.
#[async_trait]
pub trait PublishMutator: Send + Sync {
    async fn publish(&self, item_id: Uuid) -> Result<(), ClientError>;

    async fn schedule(&self, item_id: Uuid, data: &ScheduleData) -> Result<(), ClientError>;
}
