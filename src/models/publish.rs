use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a schedule request.
///
/// Dependents always carry the root item's time so the whole graph goes live
/// at the same moment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleData {
    pub scheduled_to: DateTime<Utc>,
}
