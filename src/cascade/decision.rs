//! Publish/schedule/skip decisions.
//!
//! Two tables share the same inputs. [`decide_trigger`] answers "should a
//! cascade start at this item at all" and also decides for the root itself
//! once the walk gets back to it; [`decide_dependency`] answers "what do we do
//! with this item now that the walk has reached it". Due scheduled items are
//! scheduled when they are the root and published when they are dependents.
//! Steps outside the four the cascade knows never start a cascade, but are
//! swept along with their root.

use chrono::{DateTime, Duration, Utc};

use crate::models::WorkflowStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Publish,
    Schedule,
    Skip,
}

impl Decision {
    pub fn is_eligible(&self) -> bool {
        !matches!(self, Self::Skip)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Schedule => "schedule",
            Self::Skip => "skip",
        }
    }
}

/// How far ahead of now a scheduled publish time still counts as due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow(pub Duration);

impl DueWindow {
    pub fn minutes(minutes: i64) -> Self {
        Self(Duration::minutes(minutes))
    }

    /// Past times are due; items without a scheduled time never are.
    ///
    /// A window reaching past the end of representable time covers everything.
    pub fn is_due(&self, scheduled_to: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        scheduled_to.is_some_and(|at| match now.checked_add_signed(self.0) {
            Some(horizon) => at <= horizon,
            None => true,
        })
    }
}

/// Whether an item starts a cascade, and with which action.
pub fn decide_trigger(step: &WorkflowStep, due: bool) -> Decision {
    match step {
        WorkflowStep::CascadePublish => Decision::Publish,
        WorkflowStep::Scheduled if due => Decision::Schedule,
        _ => Decision::Skip,
    }
}

/// What to do with an item reached during a walk started with `root`.
///
/// Items already live, archived or waiting for their own later schedule are
/// left alone. Items in the cascade step or due for their own schedule are
/// published now; everything else follows the root.
pub fn decide_dependency(step: &WorkflowStep, due: bool, root: Decision) -> Decision {
    match step {
        WorkflowStep::Published | WorkflowStep::Archived => Decision::Skip,
        WorkflowStep::Scheduled if !due => Decision::Skip,
        WorkflowStep::Scheduled | WorkflowStep::CascadePublish => Decision::Publish,
        WorkflowStep::Other(_) => root,
    }
}
