//! Wire types of the delivery (preview) API item listing.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{ContentItem, Element, ElementKind, ElementValue, Snapshot};

/// Response of `GET /{project}/items`.
#[derive(Debug, Deserialize)]
pub struct DeliveryListing {
    pub items: Vec<DeliveryItem>,
    #[serde(default)]
    pub modular_content: HashMap<String, DeliveryItem>,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryItem {
    pub system: DeliverySystem,
    #[serde(default)]
    pub elements: BTreeMap<String, DeliveryElement>,
}

#[derive(Debug, Deserialize)]
pub struct DeliverySystem {
    pub id: Uuid,
    pub name: String,
    pub codename: String,
    #[serde(rename = "type")]
    pub type_codename: String,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl From<DeliveryElement> for Element {
    fn from(raw: DeliveryElement) -> Self {
        let value = match raw.value {
            serde_json::Value::String(s) => ElementValue::Text(s),
            serde_json::Value::Array(values) if values.iter().all(|v| v.is_string()) => {
                ElementValue::List(
                    values
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                )
            }
            other => ElementValue::Other(other),
        };
        Element {
            kind: ElementKind::from_type(&raw.element_type),
            value,
        }
    }
}

impl From<DeliveryItem> for ContentItem {
    fn from(raw: DeliveryItem) -> Self {
        ContentItem {
            id: raw.system.id,
            codename: raw.system.codename,
            name: raw.system.name,
            type_codename: raw.system.type_codename,
            elements: raw
                .elements
                .into_iter()
                .map(|(codename, element)| (codename, element.into()))
                .collect(),
        }
    }
}

impl From<DeliveryListing> for Snapshot {
    fn from(listing: DeliveryListing) -> Self {
        Snapshot {
            items: listing.items.into_iter().map(Into::into).collect(),
            linked_items: listing
                .modular_content
                .into_iter()
                .map(|(codename, item)| (codename, item.into()))
                .collect(),
        }
    }
}
