use serde::{Deserialize, Serialize};

/// Language variant id of the default language.
pub const DEFAULT_LANGUAGE_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Position of an item in the CMS publishing workflow.
///
/// Only four steps matter to the cascade; any other step id is carried
/// through as `Other` so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStep {
    CascadePublish,
    Scheduled,
    Published,
    Archived,
    Other(String),
}

impl WorkflowStep {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CascadePublish => "cascade_publish",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Other(id) => id,
        }
    }
}

/// Project-specific ids of the workflow steps the cascade distinguishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowStepIds {
    pub cascade_publish: String,
    pub scheduled: String,
    pub published: String,
    pub archived: String,
}

impl WorkflowStepIds {
    /// Map a raw step id from the management API onto a [`WorkflowStep`].
    pub fn classify(&self, step_id: &str) -> WorkflowStep {
        if step_id == self.cascade_publish {
            WorkflowStep::CascadePublish
        } else if step_id == self.scheduled {
            WorkflowStep::Scheduled
        } else if step_id == self.published {
            WorkflowStep::Published
        } else if step_id == self.archived {
            WorkflowStep::Archived
        } else {
            WorkflowStep::Other(step_id.to_string())
        }
    }
}
