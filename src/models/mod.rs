//! Domain models for the cascade publisher.
//!
//! # Core Concepts
//!
//! - [`ContentItem`]: Immutable snapshot of a CMS item, fetched once per run.
//!   Its [`ItemKind`] decides how the item exposes its children.
//! - [`Snapshot`]: Root items plus the pool of linked items they reference.
//! - [`WorkflowStep`]: Where an item sits in the CMS publishing workflow.
//! - [`WorkflowTransition`]: An editor moving an item between workflow steps.
//! - [`ScheduleData`]: Payload for scheduling instead of publishing now.

mod item;
mod publish;
mod snapshot;
mod transition;
mod workflow;

pub use item::*;
pub use publish::*;
pub use snapshot::*;
pub use transition::*;
pub use workflow::*;
