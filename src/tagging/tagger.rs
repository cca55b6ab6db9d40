//! Snapshot tagging passes
//!
//! Two passes over the caller's snapshots:
//! 1. Snapshots created by CreateImage get the name of the instance they
//!    came from, if that instance still exists.
//! 2. Snapshots backing an owned AMI get the AMI's ID, description, and
//!    location, plus a Name if they still have none.
//!
//! Each snapshot gets its own outcome in the report. Only failing to resolve
//! the account or to enumerate snapshots/images aborts the run.

use super::composer::{
    compose_ami_tags, compose_instance_name_tag, has_name_tag, instance_id_from_description,
    merge_tags,
};
use crate::error::Result;
use crate::provider::{IdentityProvider, Image, ResourceEnumerator, ResourceId, Tag, TagWriter};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct TaggerOptions {
    /// Compose tags and report them without writing
    pub dry_run: bool,
}

/// Where a snapshot's tags were derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TagSource {
    Instance(ResourceId),
    Image(ResourceId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TagOutcome {
    Tagged { tags: Vec<Tag>, dry_run: bool },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAction {
    pub snapshot_id: ResourceId,
    pub source: TagSource,
    #[serde(flatten)]
    pub outcome: TagOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaggingReport {
    pub account_id: String,
    pub snapshots_seen: usize,
    pub actions: Vec<TagAction>,
}

impl TaggingReport {
    fn count(&self, pred: impl Fn(&TagOutcome) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(&a.outcome)).count()
    }

    pub fn tagged(&self) -> usize {
        self.count(|o| matches!(o, TagOutcome::Tagged { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TagOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TagOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

pub struct SnapshotTagger<'a> {
    identity: &'a dyn IdentityProvider,
    resources: &'a dyn ResourceEnumerator,
    writer: &'a dyn TagWriter,
    options: TaggerOptions,
    /// Current tags per snapshot, kept in sync with what we write
    known_tags: HashMap<ResourceId, Vec<Tag>>,
}

impl<'a> SnapshotTagger<'a> {
    pub fn new(
        identity: &'a dyn IdentityProvider,
        resources: &'a dyn ResourceEnumerator,
        writer: &'a dyn TagWriter,
        options: TaggerOptions,
    ) -> Self {
        Self {
            identity,
            resources,
            writer,
            options,
            known_tags: HashMap::new(),
        }
    }

    /// Run both passes.
    ///
    /// # Errors
    /// Returns an error only if the account, snapshot list, or image list
    /// cannot be fetched.
    pub async fn run(mut self) -> Result<TaggingReport> {
        let account_id = self.identity.account_id().await?;
        info!("Currently running in account {}", account_id);

        let snapshots = self.resources.list_owned_snapshots(&account_id).await?;
        let mut report = TaggingReport {
            account_id,
            snapshots_seen: snapshots.len(),
            actions: Vec::new(),
        };

        for snapshot in &snapshots {
            self.known_tags
                .insert(snapshot.snapshot_id.clone(), snapshot.tags.clone());
        }

        for snapshot in &snapshots {
            debug!("Found snapshot {} ({})", snapshot.snapshot_id, snapshot.description);
            if let Some(instance_id) = instance_id_from_description(&snapshot.description) {
                let outcome = self.tag_from_instance(&snapshot.snapshot_id, instance_id).await;
                report.actions.push(TagAction {
                    snapshot_id: snapshot.snapshot_id.clone(),
                    source: TagSource::Instance(instance_id.to_string()),
                    outcome,
                });
            }
        }

        let images = self.resources.list_owned_images().await?;
        for image in &images {
            debug!("Processing {}", image.image_id);
            for snapshot_id in &image.snapshot_ids {
                let outcome = self.tag_from_image(snapshot_id, image).await;
                report.actions.push(TagAction {
                    snapshot_id: snapshot_id.clone(),
                    source: TagSource::Image(image.image_id.clone()),
                    outcome,
                });
            }
        }

        info!(
            "Tagging finished: {} tagged, {} skipped, {} failed",
            report.tagged(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }

    async fn tag_from_instance(&mut self, snapshot_id: &str, instance_id: &str) -> TagOutcome {
        let instance = match self.resources.describe_instance(instance_id).await {
            Ok(Some(instance)) => instance,
            Ok(None) => {
                debug!("Snapshot {} came from {} which no longer exists", snapshot_id, instance_id);
                return TagOutcome::Skipped {
                    reason: format!("instance {} no longer exists", instance_id),
                };
            }
            Err(e) => {
                error!("Unknown error occurred looking up {}: {}", instance_id, e);
                return TagOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let Some(instance_name) = instance.name() else {
            debug!("No Name tag found for instance {}", instance_id);
            return TagOutcome::Skipped {
                reason: format!("instance {} has no Name tag", instance_id),
            };
        };
        info!("Found Name tag with value {}", instance_name);

        let existing = self.known_tags.get(snapshot_id).cloned().unwrap_or_default();
        let tag = compose_instance_name_tag(&existing, instance_name);
        warn!("Adding tag to snapshot {} {} = {}", snapshot_id, tag.0, tag.1);
        self.write(snapshot_id, vec![tag]).await
    }

    async fn tag_from_image(&mut self, snapshot_id: &str, image: &Image) -> TagOutcome {
        let existing = match self.current_tags(snapshot_id).await {
            Ok(Some(tags)) => tags,
            Ok(None) => {
                debug!("Image {} references missing snapshot {}", image.image_id, snapshot_id);
                return TagOutcome::Skipped {
                    reason: format!("snapshot {} not found", snapshot_id),
                };
            }
            Err(e) => {
                error!("Failed to read tags of snapshot {}: {}", snapshot_id, e);
                return TagOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        debug!(
            "Image {} uses snapshot {} with image location {} and description {}",
            image.image_id, snapshot_id, image.image_location, image.description
        );
        let tags = compose_ami_tags(&existing, image);
        if !has_name_tag(&existing) {
            info!("No Name tag found on {}, setting Name tag", snapshot_id);
        }
        debug!("Tagging snapshot {} with {:?}", snapshot_id, tags);
        self.write(snapshot_id, tags).await
    }

    /// Tags we already know about, else fetched from the snapshot itself
    async fn current_tags(&self, snapshot_id: &str) -> Result<Option<Vec<Tag>>> {
        if let Some(tags) = self.known_tags.get(snapshot_id) {
            return Ok(Some(tags.clone()));
        }
        Ok(self
            .resources
            .describe_snapshot(snapshot_id)
            .await?
            .map(|snapshot| snapshot.tags))
    }

    async fn write(&mut self, snapshot_id: &str, tags: Vec<Tag>) -> TagOutcome {
        if !self.options.dry_run {
            if let Err(e) = self.writer.apply_tags(snapshot_id, &tags).await {
                error!("Failed to tag snapshot {}: {}", snapshot_id, e);
                return TagOutcome::Failed {
                    error: e.to_string(),
                };
            }
        }

        merge_tags(
            self.known_tags.entry(snapshot_id.to_string()).or_default(),
            &tags,
        );
        TagOutcome::Tagged {
            tags,
            dry_run: self.options.dry_run,
        }
    }
}

/// Convenience wrapper used by the CLI
pub async fn tag_snapshots(
    identity: &dyn IdentityProvider,
    resources: &dyn ResourceEnumerator,
    writer: &dyn TagWriter,
    options: TaggerOptions,
) -> Result<TaggingReport> {
    SnapshotTagger::new(identity, resources, writer, options).run().await
}

