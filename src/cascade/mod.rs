//! Cascade publishing of an item and everything it depends on.
//!
//! When an editor moves an item into the cascade-publish step (or schedules
//! it), every item the root references must go live with it, so a published
//! page never links to an unpublished fragment.
//!
//! # Walk
//!
//! Children are published before the item embedding them. Components are
//! walked for their own children but never published on their own. Composite
//! items (code sample bundles) are the exception: the bundle goes first, then
//! its samples in declared order, without descending into them.
//!
//! # Key Invariants
//!
//! 1. **Exactly once**: a [`ProcessedSet`] scoped to one run guarantees at
//!    most one mutation per codename, which also terminates cycles.
//!
//! 2. **Strictly sequential**: every CMS call is awaited before the next one
//!    starts. This keeps the walk inside the API rate limit and makes the
//!    processed-set check-then-insert race free.
//!
//! 3. **Re-evaluated per item**: each item's own workflow step decides
//!    publish, schedule or skip at the moment it is reached. Scheduling always
//!    uses the root's scheduled time.
//!
//! 4. **Notify, then abort**: a failed mutation notifies operators and aborts
//!    the run. Nothing is rolled back; a re-run skips what already went live.

pub mod decision;
pub mod graph;
pub mod processed;
pub mod walker;

pub use decision::{decide_dependency, decide_trigger, Decision, DueWindow};
pub use graph::{extract_children, parse_embedded_references, ChildCodenames, EmbeddedReference, Relation};
pub use processed::ProcessedSet;
pub use walker::{CascadePublisher, Collaborators};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cms::ClientError;

#[derive(Debug, Error)]
pub enum CascadeError {
    /// A read failed. Not notified.
    #[error("CMS lookup failed: {0}")]
    Lookup(#[from] ClientError),

    #[error("Publishing of content item {codename} ({item_id}) failed: {source}")]
    Publish {
        codename: String,
        item_id: Uuid,
        source: ClientError,
    },

    #[error("Content item {0} is scheduled but has no scheduled publish time")]
    MissingScheduleTime(String),
}

/// What a run did, in call order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CascadeReport {
    pub published: Vec<String>,
    pub scheduled: Vec<String>,
    pub skipped: Vec<String>,
}

impl CascadeReport {
    pub fn record(&mut self, decision: Decision, codename: &str) {
        let bucket = match decision {
            Decision::Publish => &mut self.published,
            Decision::Schedule => &mut self.scheduled,
            Decision::Skip => &mut self.skipped,
        };
        bucket.push(codename.to_string());
    }

    /// Fold another run's report into this one.
    pub fn merge(&mut self, other: CascadeReport) {
        self.published.extend(other.published);
        self.scheduled.extend(other.scheduled);
        self.skipped.extend(other.skipped);
    }
}
