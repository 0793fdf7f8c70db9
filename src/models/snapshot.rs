use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ContentItem;

/// One read of the content graph: the requested items plus every item they
/// reference, keyed by codename.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<ContentItem>,
    pub linked_items: HashMap<String, ContentItem>,
}

impl Snapshot {
    pub fn new(items: Vec<ContentItem>, linked_items: Vec<ContentItem>) -> Self {
        Self {
            items,
            linked_items: linked_items
                .into_iter()
                .map(|item| (item.codename.clone(), item))
                .collect(),
        }
    }
}
