//! In-memory CMS used by the integration specs.
//!
//! One `FakeCms` plays every collaborator role and records each mutation and
//! notification so tests can assert on call order.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cascade_publisher::cascade::{CascadePublisher, Collaborators};
use cascade_publisher::cms::{
    ClientError, ContentSnapshotProvider, PublishMutator, ScheduleTimeProvider,
    WorkflowStepProvider,
};
use cascade_publisher::config::CascadeSettings;
use cascade_publisher::models::*;
use cascade_publisher::notify::{Notification, Notifier};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use uuid::Uuid;

pub const CASCADE: &str = "step-cascade";
pub const SCHEDULED: &str = "step-scheduled";
pub const PUBLISHED: &str = "step-published";
pub const ARCHIVED: &str = "step-archived";
pub const DRAFT: &str = "step-draft";

pub const PROJECT_ID: &str = "test-project";

pub fn step_ids() -> WorkflowStepIds {
    WorkflowStepIds {
        cascade_publish: CASCADE.to_string(),
        scheduled: SCHEDULED.to_string(),
        published: PUBLISHED.to_string(),
        archived: ARCHIVED.to_string(),
    }
}

// ============================================================
// Item builders
// ============================================================

pub fn link(codename: &str) -> String {
    format!(
        r#"<object type="application/kenticocloud" data-type="item" data-rel="link" data-codename="{}"></object>"#,
        codename
    )
}

pub fn component(codename: &str) -> String {
    format!(
        r#"<object type="application/kenticocloud" data-type="item" data-rel="component" data-codename="{}"></object>"#,
        codename
    )
}

/// A regular item whose body embeds `markup`.
pub fn article(codename: &str, markup: &str) -> ContentItem {
    ContentItem::new(Uuid::new_v4(), codename, "article").with_element("body", Element::rich_text(markup))
}

/// An article linking to each of `children`.
pub fn linking(codename: &str, children: &[&str]) -> ContentItem {
    let markup: String = children.iter().map(|c| link(c)).collect();
    article(codename, &markup)
}

pub fn code_samples(codename: &str, samples: &[&str]) -> ContentItem {
    ContentItem::new(Uuid::new_v4(), codename, COMPOSITE_TYPE)
        .with_element(COMPOSITE_CHILDREN_ELEMENT, Element::linked_items(samples.iter().copied()))
}

// ============================================================
// Recorded calls
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Publish(String),
    Schedule(String, DateTime<Utc>),
}

impl Mutation {
    pub fn codename(&self) -> &str {
        match self {
            Self::Publish(c) | Self::Schedule(c, _) => c,
        }
    }
}

// ============================================================
// FakeCms
// ============================================================

#[derive(Default)]
pub struct FakeCms {
    items: Vec<ContentItem>,
    linked: Vec<ContentItem>,
    steps: HashMap<String, String>,
    schedule_times: HashMap<String, DateTime<Utc>>,
    failing_mutations: HashSet<String>,
    failing_lookups: HashSet<String>,
    notifier_fails: bool,
    codenames: Mutex<HashMap<Uuid, String>>,
    pub mutations: Mutex<Vec<Mutation>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub step_lookups: Mutex<Vec<String>>,
}

impl FakeCms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level item of the project listing.
    pub fn root(mut self, item: ContentItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add an item to the linked-item pool.
    pub fn linked(mut self, item: ContentItem) -> Self {
        self.linked.push(item);
        self
    }

    pub fn step(mut self, codename: &str, step_id: &str) -> Self {
        self.steps.insert(codename.to_string(), step_id.to_string());
        self
    }

    pub fn scheduled_at(mut self, codename: &str, at: DateTime<Utc>) -> Self {
        self.schedule_times.insert(codename.to_string(), at);
        self
    }

    pub fn failing_mutation(mut self, codename: &str) -> Self {
        self.failing_mutations.insert(codename.to_string());
        self
    }

    pub fn failing_lookup(mut self, codename: &str) -> Self {
        self.failing_lookups.insert(codename.to_string());
        self
    }

    pub fn failing_notifier(mut self) -> Self {
        self.notifier_fails = true;
        self
    }

    pub fn id_of(&self, codename: &str) -> Uuid {
        self.items
            .iter()
            .chain(self.linked.iter())
            .find(|i| i.codename == codename)
            .map(|i| i.id)
            .expect("unknown codename")
    }

    /// Finish building and wire a publisher with a 10 minute due window.
    pub fn build(self) -> (Arc<FakeCms>, CascadePublisher) {
        {
            let mut codenames = self.codenames.lock().unwrap();
            for item in self.items.iter().chain(self.linked.iter()) {
                codenames.insert(item.id, item.codename.clone());
            }
        }
        let cms = Arc::new(self);
        let services = Collaborators {
            content: cms.clone(),
            workflow: cms.clone(),
            schedule: cms.clone(),
            mutator: cms.clone(),
            notifier: cms.clone(),
        };
        let publisher =
            CascadePublisher::new(services, step_ids(), CascadeSettings::default(), PROJECT_ID);
        (cms, publisher)
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn mutated_codenames(&self) -> Vec<String> {
        self.mutations()
            .iter()
            .map(|m| m.codename().to_string())
            .collect()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    fn codename_of(&self, id: Uuid) -> String {
        self.codenames
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn mutate(&self, item_id: Uuid, mutation: Mutation) -> Result<(), ClientError> {
        if self.failing_mutations.contains(mutation.codename()) {
            return Err(ClientError::Status {
                status: StatusCode::BAD_REQUEST,
                body: format!("cannot publish {}", self.codename_of(item_id)),
            });
        }
        self.mutations.lock().unwrap().push(mutation);
        Ok(())
    }
}

#[async_trait]
impl ContentSnapshotProvider for FakeCms {
    async fn fetch_snapshot(&self, _depth: u32) -> Result<Snapshot, ClientError> {
        Ok(Snapshot::new(self.items.clone(), self.linked.clone()))
    }

    async fn fetch_item_snapshot(
        &self,
        item_id: Uuid,
        _depth: u32,
    ) -> Result<Snapshot, ClientError> {
        let items = self
            .items
            .iter()
            .filter(|i| i.id == item_id)
            .cloned()
            .collect();
        Ok(Snapshot::new(items, self.linked.clone()))
    }
}

#[async_trait]
impl WorkflowStepProvider for FakeCms {
    async fn workflow_step(&self, codename: &str) -> Result<String, ClientError> {
        self.step_lookups.lock().unwrap().push(codename.to_string());
        if self.failing_lookups.contains(codename) {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "management API unavailable".to_string(),
            });
        }
        Ok(self
            .steps
            .get(codename)
            .cloned()
            .unwrap_or_else(|| DRAFT.to_string()))
    }
}

#[async_trait]
impl ScheduleTimeProvider for FakeCms {
    async fn scheduled_time(&self, item_id: Uuid) -> Result<Option<DateTime<Utc>>, ClientError> {
        let codename = self.codename_of(item_id);
        Ok(self.schedule_times.get(&codename).copied())
    }
}

#[async_trait]
impl PublishMutator for FakeCms {
    async fn publish(&self, item_id: Uuid) -> Result<(), ClientError> {
        self.mutate(item_id, Mutation::Publish(self.codename_of(item_id)))
    }

    async fn schedule(&self, item_id: Uuid, data: &ScheduleData) -> Result<(), ClientError> {
        self.mutate(
            item_id,
            Mutation::Schedule(self.codename_of(item_id), data.scheduled_to),
        )
    }
}

#[async_trait]
impl Notifier for FakeCms {
    async fn notify(&self, notification: &Notification) -> Result<(), ClientError> {
        self.notifications.lock().unwrap().push(notification.clone());
        if self.notifier_fails {
            return Err(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "notifier down".to_string(),
            });
        }
        Ok(())
    }
}
