use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a CMS object by id, as used in webhook payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identifier {
    pub id: String,
}

/// A workflow webhook entry: `item` moved from one step to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowTransition {
    pub item: ItemIdentifier,
    pub language: Identifier,
    pub transition_from: Identifier,
    pub transition_to: Identifier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemIdentifier {
    pub id: Uuid,
}

/// `data` of a workflow webhook event forwarded through Event Grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowEventData {
    pub webhook: WorkflowWebhook,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowWebhook {
    #[serde(default)]
    pub items: Vec<WorkflowTransition>,
}
