use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type codename of the code sample bundle, the only composite item type.
pub const COMPOSITE_TYPE: &str = "code_samples";

/// Element of a composite item holding its ordered children.
pub const COMPOSITE_CHILDREN_ELEMENT: &str = "code_samples";

/// Substring identifying the legacy API reference type family.
pub const LEGACY_TYPE_MARKER: &str = "zapi";

/// A content item as returned by the delivery API.
///
/// Items are snapshots: they are fetched once at the start of a run and never
/// refreshed while the cascade walks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: Uuid,
    /// Human-readable key, unique within a project and language.
    pub codename: String,
    pub name: String,
    /// Codename of the content type this item was created from.
    pub type_codename: String,
    pub elements: BTreeMap<String, Element>,
}

impl ContentItem {
    pub fn new(id: Uuid, codename: impl Into<String>, type_codename: impl Into<String>) -> Self {
        let codename = codename.into();
        Self {
            id,
            name: codename.clone(),
            codename,
            type_codename: type_codename.into(),
            elements: BTreeMap::new(),
        }
    }

    /// Add or replace an element.
    pub fn with_element(mut self, codename: impl Into<String>, element: Element) -> Self {
        self.elements.insert(codename.into(), element);
        self
    }

    pub fn kind(&self) -> ItemKind {
        ItemKind::from_type_codename(&self.type_codename)
    }

    /// Raw markup of every rich-text element, concatenated in element order.
    pub fn rich_text(&self) -> String {
        self.elements
            .values()
            .filter(|e| e.kind == ElementKind::RichText)
            .filter_map(|e| e.value.as_text())
            .collect()
    }

    /// Codenames listed in the composite children element, in declared order.
    ///
    /// Empty for items that are not composite or lack the element.
    pub fn ordered_children(&self) -> Vec<String> {
        if self.kind() != ItemKind::Composite {
            return Vec::new();
        }
        self.elements
            .get(COMPOSITE_CHILDREN_ELEMENT)
            .map(|e| e.value.codenames())
            .unwrap_or_default()
    }
}

/// How an item exposes its children to the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Children come from rich-text embedded objects only.
    Regular,
    /// Rich text plus every modular-content element (`zapi_*` types).
    Legacy,
    /// Ordered bundle whose children are published as leaves.
    Composite,
}

impl ItemKind {
    pub fn from_type_codename(type_codename: &str) -> Self {
        if type_codename == COMPOSITE_TYPE {
            Self::Composite
        } else if type_codename.contains(LEGACY_TYPE_MARKER) {
            Self::Legacy
        } else {
            Self::Regular
        }
    }
}

/// A single named element of a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub value: ElementValue,
}

impl Element {
    pub fn rich_text(markup: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::RichText,
            value: ElementValue::Text(markup.into()),
        }
    }

    pub fn linked_items<I, S>(codenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ElementKind::ModularContent,
            value: ElementValue::List(codenames.into_iter().map(Into::into).collect()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Other,
            value: ElementValue::Text(value.into()),
        }
    }
}

/// Element types the cascade cares about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    RichText,
    ModularContent,
    Other,
}

impl ElementKind {
    pub fn from_type(element_type: &str) -> Self {
        match element_type {
            "rich_text" => Self::RichText,
            "modular_content" => Self::ModularContent,
            _ => Self::Other,
        }
    }
}

/// Raw element value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ElementValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl ElementValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Codenames held by a list value or a comma-joined text value.
    pub fn codenames(&self) -> Vec<String> {
        match self {
            Self::List(values) => values
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Text(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}
