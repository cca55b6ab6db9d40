//! AWS-backed implementations of the collaborator traits
//!
//! ## Module Organization
//!
//! - `ec2`: snapshots, images, instances, and tag writes
//! - `sts`: caller identity
//! - `cloudwatch`: daily DynamoDB table metrics
//! - `dynamodb`: table listing and billing mode
//! - `helpers`: SDK type to crate type conversions
//!
//! Every call is awaited in sequence. Errors are mapped into
//! `HygieneError::Provider` (or `ResourceNotFound` where the service says
//! the resource is gone) and returned to the caller; nothing here retries.

mod cloudwatch;
mod dynamodb;
mod ec2;
mod helpers;
mod sts;

pub use cloudwatch::CloudWatchMetrics;
pub use dynamodb::DynamoCatalog;
pub use ec2::Ec2Resources;
pub use sts::StsIdentity;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Shared SDK configuration for every client in a run
#[derive(Clone, Debug)]
pub struct AwsSession {
    config: SdkConfig,
}

impl AwsSession {
    /// Resolve credentials and region from the default chain, with optional overrides
    pub async fn load(region: Option<&str>, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;
        debug!(
            "Loaded AWS config for region {}",
            config.region().map(|r| r.as_ref()).unwrap_or("<unset>")
        );
        Self { config }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }
}
