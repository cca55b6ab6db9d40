//! EC2 snapshots, images, instances, and tags

use super::helpers::{
    find_instance_in_response, image_from_sdk, instance_from_sdk, snapshot_from_sdk, tags_to_sdk,
};
use super::AwsSession;
use crate::error::{HygieneError, Result};
use crate::provider::{Image, Instance, ResourceEnumerator, Snapshot, Tag, TagWriter};
use async_trait::async_trait;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

/// Error codes EC2 returns for IDs that do not (or no longer) exist
const INSTANCE_NOT_FOUND_CODES: &[&str] =
    &["InvalidInstanceID.NotFound", "InvalidInstanceID.Malformed"];
const SNAPSHOT_NOT_FOUND_CODES: &[&str] =
    &["InvalidSnapshot.NotFound", "InvalidSnapshotID.Malformed"];

pub struct Ec2Resources {
    client: Ec2Client,
}

impl Ec2Resources {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: Ec2Client::new(session.sdk_config()),
        }
    }
}

fn ec2_error(operation: &str, err: impl std::error::Error) -> HygieneError {
    HygieneError::provider("ec2", operation, DisplayErrorContext(err))
}

fn next_page(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(|t| t.to_string())
}

#[async_trait]
impl ResourceEnumerator for Ec2Resources {
    async fn list_owned_snapshots(&self, owner_account_id: &str) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_snapshots()
                .owner_ids(owner_account_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| ec2_error("DescribeSnapshots", e))?;

            snapshots.extend(response.snapshots().iter().filter_map(snapshot_from_sdk));

            match next_page(response.next_token()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!("Found {} snapshots owned by {}", snapshots.len(), owner_account_id);
        Ok(snapshots)
    }

    async fn describe_snapshot(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        match self.client.describe_snapshots().snapshot_ids(snapshot_id).send().await {
            Ok(response) => Ok(response
                .snapshots()
                .iter()
                .filter_map(snapshot_from_sdk)
                .find(|s| s.snapshot_id == snapshot_id)),
            Err(e) => {
                let code = e.as_service_error().and_then(|se| se.code());
                if code.map(|c| SNAPSHOT_NOT_FOUND_CODES.contains(&c)).unwrap_or(false) {
                    Ok(None)
                } else {
                    Err(ec2_error("DescribeSnapshots", e))
                }
            }
        }
    }

    async fn list_owned_images(&self) -> Result<Vec<Image>> {
        let mut images = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_images()
                .owners("self")
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| ec2_error("DescribeImages", e))?;

            images.extend(response.images().iter().filter_map(image_from_sdk));

            match next_page(response.next_token()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!("Found {} owned images", images.len());
        Ok(images)
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<Instance>> {
        match self.client.describe_instances().instance_ids(instance_id).send().await {
            Ok(response) => {
                Ok(find_instance_in_response(&response, instance_id).and_then(instance_from_sdk))
            }
            Err(e) => {
                let code = e.as_service_error().and_then(|se| se.code());
                if code.map(|c| INSTANCE_NOT_FOUND_CODES.contains(&c)).unwrap_or(false) {
                    Ok(None)
                } else {
                    Err(ec2_error("DescribeInstances", e))
                }
            }
        }
    }
}

#[async_trait]
impl TagWriter for Ec2Resources {
    async fn apply_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<()> {
        if tags.is_empty() {
            return Ok(());
        }
        self.client
            .create_tags()
            .resources(resource_id)
            .set_tags(Some(tags_to_sdk(tags)))
            .send()
            .await
            .map_err(|e| ec2_error("CreateTags", e))?;
        Ok(())
    }
}
