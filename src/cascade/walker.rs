use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, error, info, warn};

use super::decision::{decide_dependency, decide_trigger, Decision, DueWindow};
use super::graph::extract_children;
use super::processed::ProcessedSet;
use super::{CascadeError, CascadeReport};
use crate::cms::{
    ClientError, ContentSnapshotProvider, KontentClient, PublishMutator, ScheduleTimeProvider,
    WorkflowStepProvider,
};
use crate::config::{CascadeSettings, Config};
use crate::models::{
    ContentItem, ItemKind, ScheduleData, WorkflowStep, WorkflowStepIds, WorkflowTransition,
};
use crate::notify::{EventGridNotifier, Notification, Notifier};

/// The external services a cascade talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub content: Arc<dyn ContentSnapshotProvider>,
    pub workflow: Arc<dyn WorkflowStepProvider>,
    pub schedule: Arc<dyn ScheduleTimeProvider>,
    pub mutator: Arc<dyn PublishMutator>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Use one Kontent.ai client for every CMS role.
    pub fn kontent(client: KontentClient, notifier: impl Notifier + 'static) -> Self {
        let client = Arc::new(client);
        Self {
            content: client.clone(),
            workflow: client.clone(),
            schedule: client.clone(),
            mutator: client,
            notifier: Arc::new(notifier),
        }
    }
}

/// The item a walk started from and what was decided for it.
#[derive(Debug, Clone)]
struct Root {
    codename: String,
    action: Decision,
    scheduled_to: Option<DateTime<Utc>>,
}

impl Root {
    fn new(
        item: &ContentItem,
        action: Decision,
        scheduled_to: Option<DateTime<Utc>>,
    ) -> Result<Self, CascadeError> {
        if action == Decision::Schedule && scheduled_to.is_none() {
            return Err(CascadeError::MissingScheduleTime(item.codename.clone()));
        }
        Ok(Self {
            codename: item.codename.clone(),
            action,
            scheduled_to,
        })
    }
}

/// State of one run. Dropped when the run ends.
#[derive(Debug, Default)]
struct Run {
    processed: ProcessedSet,
    report: CascadeReport,
}

type Pool = HashMap<String, ContentItem>;

/// Drives cascades against a set of [`Collaborators`].
#[derive(Clone)]
pub struct CascadePublisher {
    services: Collaborators,
    steps: WorkflowStepIds,
    settings: CascadeSettings,
    project_id: String,
}

impl CascadePublisher {
    pub fn new(
        services: Collaborators,
        steps: WorkflowStepIds,
        settings: CascadeSettings,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            services,
            steps,
            settings,
            project_id: project_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let services = Collaborators::kontent(
            KontentClient::from_config(config),
            EventGridNotifier::new(&config.notifier_endpoint, &config.notifier_key),
        );
        Self::new(
            services,
            config.steps.clone(),
            config.cascade.clone(),
            &config.project_id,
        )
    }

    fn due_window(&self) -> DueWindow {
        DueWindow(self.settings.due_window)
    }

    // ============================================================
    // Entry points
    // ============================================================

    /// Cascade every item of the project that is due for it.
    ///
    /// One processed set spans the whole scan, so an item reached from an
    /// earlier root is not touched again as a root of its own.
    pub async fn run_scan(&self) -> Result<CascadeReport, CascadeError> {
        let snapshot = self
            .services
            .content
            .fetch_snapshot(self.settings.scan_depth)
            .await?;
        info!(
            items = snapshot.items.len(),
            linked_items = snapshot.linked_items.len(),
            "scanning project for cascade roots"
        );

        let mut run = Run::default();
        for item in &snapshot.items {
            let step = self.step_of(item).await?;
            let scheduled_to = self.scheduled_time_if_scheduled(item, &step).await?;
            let due = self.due_window().is_due(scheduled_to, Utc::now());

            let action = decide_trigger(&step, due);
            if !action.is_eligible() {
                continue;
            }
            let root = Root::new(item, action, scheduled_to)?;
            info!(codename = %item.codename, action = action.as_str(), "starting cascade");
            self.cascade_root(item, &snapshot.linked_items, &root, &mut run)
                .await?;
        }

        Ok(run.report)
    }

    /// Cascade a single item that just moved to another workflow step.
    ///
    /// An item that was just scheduled counts as due: its dependents are
    /// scheduled for the same moment right away.
    pub async fn run_transition(
        &self,
        transition: &WorkflowTransition,
    ) -> Result<CascadeReport, CascadeError> {
        let step = self.steps.classify(&transition.transition_to.id);
        let action = decide_trigger(&step, true);
        if !action.is_eligible() {
            debug!(
                item_id = %transition.item.id,
                step = step.as_str(),
                "transition does not start a cascade"
            );
            return Ok(CascadeReport::default());
        }

        let snapshot = self
            .services
            .content
            .fetch_item_snapshot(transition.item.id, self.settings.event_depth)
            .await?;
        let Some(item) = snapshot.items.first() else {
            warn!(item_id = %transition.item.id, "transitioned item not found in delivery API");
            return Ok(CascadeReport::default());
        };

        let scheduled_to = match action {
            Decision::Schedule => self.services.schedule.scheduled_time(item.id).await?,
            _ => None,
        };
        let root = Root::new(item, action, scheduled_to)?;
        info!(codename = %item.codename, action = action.as_str(), "starting cascade");

        let mut run = Run::default();
        self.cascade_root(item, &snapshot.linked_items, &root, &mut run)
            .await?;
        Ok(run.report)
    }

    // ============================================================
    // Walk
    // ============================================================

    async fn cascade_root(
        &self,
        item: &ContentItem,
        pool: &Pool,
        root: &Root,
        run: &mut Run,
    ) -> Result<(), CascadeError> {
        match item.kind() {
            ItemKind::Composite => self.publish_composite(item, pool, root, run).await,
            ItemKind::Regular | ItemKind::Legacy => {
                self.cascade_item(item, pool, root, run, false).await
            }
        }
    }

    /// Publish `item`'s children, then `item` itself unless it is a component.
    fn cascade_item<'a>(
        &'a self,
        item: &'a ContentItem,
        pool: &'a Pool,
        root: &'a Root,
        run: &'a mut Run,
        is_component: bool,
    ) -> BoxFuture<'a, Result<(), CascadeError>> {
        async move {
            if !run.processed.insert(&item.codename) {
                return Ok(());
            }

            let children = extract_children(item).resolve(pool);

            for child in children.linked_items {
                if run.processed.contains(&child.codename) {
                    continue;
                }
                match child.kind() {
                    ItemKind::Composite => self.publish_composite(child, pool, root, run).await?,
                    ItemKind::Regular | ItemKind::Legacy => {
                        self.cascade_item(child, pool, root, run, false).await?
                    }
                }
            }

            for component in children.components {
                self.cascade_item(component, pool, root, run, true).await?;
            }

            if !is_component {
                self.publish_single(item, root, run).await?;
            }
            Ok(())
        }
        .boxed()
    }

    /// Publish a composite item, then each of its children as a leaf.
    async fn publish_composite(
        &self,
        item: &ContentItem,
        pool: &Pool,
        root: &Root,
        run: &mut Run,
    ) -> Result<(), CascadeError> {
        if !run.processed.insert(&item.codename) {
            return Ok(());
        }
        self.publish_single(item, root, run).await?;

        for codename in item.ordered_children() {
            let Some(child) = pool.get(&codename) else {
                debug!(codename = %codename, composite = %item.codename, "child not in snapshot, skipping");
                continue;
            };
            if run.processed.insert(&child.codename) {
                self.publish_single(child, root, run).await?;
            }
        }
        Ok(())
    }

    /// Decide for `item` and issue the matching mutation.
    ///
    /// The root is decided like a trigger, so a due scheduled root keeps its
    /// own time while its due scheduled dependents go live now.
    async fn publish_single(
        &self,
        item: &ContentItem,
        root: &Root,
        run: &mut Run,
    ) -> Result<(), CascadeError> {
        let step = self.step_of(item).await?;
        let scheduled_to = self.scheduled_time_if_scheduled(item, &step).await?;
        let due = self.due_window().is_due(scheduled_to, Utc::now());
        let decision = if item.codename == root.codename {
            decide_trigger(&step, due)
        } else {
            decide_dependency(&step, due, root.action)
        };

        let result = match decision {
            Decision::Skip => {
                debug!(codename = %item.codename, step = step.as_str(), "skipping");
                run.report.record(decision, &item.codename);
                return Ok(());
            }
            Decision::Publish => self.services.mutator.publish(item.id).await,
            Decision::Schedule => {
                let scheduled_to = root
                    .scheduled_to
                    .ok_or_else(|| CascadeError::MissingScheduleTime(root.codename.clone()))?;
                self.services
                    .mutator
                    .schedule(item.id, &ScheduleData { scheduled_to })
                    .await
            }
        };

        match result {
            Ok(()) => {
                info!(
                    codename = %item.codename,
                    item_id = %item.id,
                    action = decision.as_str(),
                    "variant updated"
                );
                run.report.record(decision, &item.codename);
                Ok(())
            }
            Err(source) => {
                self.notify_failure(item, &source).await;
                Err(CascadeError::Publish {
                    codename: item.codename.clone(),
                    item_id: item.id,
                    source,
                })
            }
        }
    }

    // ============================================================
    // Helpers
    // ============================================================

    async fn step_of(&self, item: &ContentItem) -> Result<WorkflowStep, CascadeError> {
        let step_id = self.services.workflow.workflow_step(&item.codename).await?;
        Ok(self.steps.classify(&step_id))
    }

    async fn scheduled_time_if_scheduled(
        &self,
        item: &ContentItem,
        step: &WorkflowStep,
    ) -> Result<Option<DateTime<Utc>>, CascadeError> {
        if *step != WorkflowStep::Scheduled {
            return Ok(None);
        }
        Ok(self.services.schedule.scheduled_time(item.id).await?)
    }

    /// Best effort: a failing notifier must not hide the publish error.
    async fn notify_failure(&self, item: &ContentItem, error: &ClientError) {
        error!(codename = %item.codename, item_id = %item.id, error = %error, "publish failed");
        let notification =
            Notification::publish_failed(&self.project_id, &item.codename, item.id, &error.to_string());
        if let Err(notify_error) = self.services.notifier.notify(&notification).await {
            warn!(
                codename = %item.codename,
                error = %notify_error,
                "failed to send failure notification"
            );
        }
    }
}
