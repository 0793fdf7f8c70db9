//! Extraction of an item's children from its elements.
//!
//! Rich text embeds other items as `<object>` markers:
//!
//! ```text
//! <object type="application/kenticocloud" data-type="item"
//!         data-rel="component" data-codename="n270aa43a_0910"></object>
//! ```
//!
//! `data-rel="link"` references a standalone item, `data-rel="component"` an
//! inline fragment. Markers from other producers or with another `data-type`
//! are ignored.
//!
//! The scanner expects markup as the CMS emits it: attribute values are always
//! quoted and never contain `>`. Unquoted attributes are not recognized.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ContentItem, ElementKind, ItemKind};

/// Producer tag of embedded objects written by the CMS editor.
pub const EMBEDDED_OBJECT_TYPE: &str = "application/kenticocloud";

static OBJECT_RE: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE_RE: OnceLock<Regex> = OnceLock::new();

fn object_re() -> &'static Regex {
    OBJECT_RE.get_or_init(|| Regex::new(r"(?is)<object\b([^>]*)>").unwrap())
}

fn attribute_re() -> &'static Regex {
    ATTRIBUTE_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// How an embedded item is related to the rich text containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Link,
    Component,
}

impl Relation {
    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "link" => Some(Self::Link),
            "component" => Some(Self::Component),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedReference {
    pub relation: Relation,
    pub codename: String,
}

/// Every recognized embedded item reference in `markup`, in document order.
pub fn parse_embedded_references(markup: &str) -> Vec<EmbeddedReference> {
    object_re()
        .captures_iter(markup)
        .filter_map(|object| {
            let attributes: HashMap<String, &str> = attribute_re()
                .captures_iter(object.get(1)?.as_str())
                .filter_map(|attr| {
                    let name = attr.get(1)?.as_str().to_ascii_lowercase();
                    let value = attr.get(2).or_else(|| attr.get(3))?.as_str();
                    Some((name, value))
                })
                .collect();

            if attributes.get("type").copied() != Some(EMBEDDED_OBJECT_TYPE)
                || attributes.get("data-type").copied() != Some("item")
            {
                return None;
            }
            let relation = Relation::from_attribute(attributes.get("data-rel")?)?;
            let codename = attributes.get("data-codename")?.trim();
            if codename.is_empty() {
                return None;
            }
            Some(EmbeddedReference {
                relation,
                codename: codename.to_string(),
            })
        })
        .collect()
}

/// Codenames of an item's children, split by relation.
///
/// Each bucket is free of duplicates and keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildCodenames {
    pub linked_items: Vec<String>,
    pub components: Vec<String>,
}

impl ChildCodenames {
    fn push(bucket: &mut Vec<String>, seen: &mut HashSet<String>, codename: String) {
        if seen.insert(codename.clone()) {
            bucket.push(codename);
        }
    }

    /// Look the codenames up in `pool`, silently dropping unknown ones.
    pub fn resolve<'a>(&self, pool: &'a HashMap<String, ContentItem>) -> ResolvedChildren<'a> {
        let lookup = |codenames: &[String]| -> Vec<&'a ContentItem> {
            codenames
                .iter()
                .filter_map(|codename| {
                    let found = pool.get(codename);
                    if found.is_none() {
                        tracing::debug!(codename = %codename, "referenced item not in snapshot, skipping");
                    }
                    found
                })
                .collect()
        };
        ResolvedChildren {
            linked_items: lookup(&self.linked_items),
            components: lookup(&self.components),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedChildren<'a> {
    pub linked_items: Vec<&'a ContentItem>,
    pub components: Vec<&'a ContentItem>,
}

/// Children of `item` as seen by the cascade.
///
/// Legacy (`zapi`) items additionally contribute every modular-content
/// element to the linked bucket.
pub fn extract_children(item: &ContentItem) -> ChildCodenames {
    let mut children = ChildCodenames::default();
    let mut seen_linked = HashSet::new();
    let mut seen_components = HashSet::new();

    for reference in parse_embedded_references(&item.rich_text()) {
        match reference.relation {
            Relation::Link => {
                ChildCodenames::push(&mut children.linked_items, &mut seen_linked, reference.codename)
            }
            Relation::Component => ChildCodenames::push(
                &mut children.components,
                &mut seen_components,
                reference.codename,
            ),
        }
    }

    if item.kind() == ItemKind::Legacy {
        for element in item
            .elements
            .values()
            .filter(|e| e.kind == ElementKind::ModularContent)
        {
            for codename in element.value.codenames() {
                ChildCodenames::push(&mut children.linked_items, &mut seen_linked, codename);
            }
        }
    }

    children
}
