//! Collaborator traits and the plain data types that cross them
//!
//! The tagger and the advisor only talk to AWS through these traits. The
//! real implementations live in `crate::aws`; tests substitute in-memory
//! fakes so the decision logic runs without credentials.

use crate::cost::window::{DailySeries, LookbackWindow};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Resource identifier (snapshot ID, instance ID, table name, etc.)
pub type ResourceId = String;

/// A `(key, value)` tag pair
pub type Tag = (String, String);

/// EBS snapshot as seen by the tagger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: ResourceId,
    pub description: String,
    pub tags: Vec<Tag>,
}

/// AMI owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub image_id: ResourceId,
    pub description: String,
    pub image_location: String,
    /// Snapshot IDs referenced by the image's EBS block device mappings
    pub snapshot_ids: Vec<ResourceId>,
}

/// EC2 instance, reduced to what tagging needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: ResourceId,
    pub tags: Vec<Tag>,
}

impl Instance {
    pub fn name(&self) -> Option<&str> {
        tag_value(&self.tags, "Name")
    }
}

/// Look up a tag value by key
pub fn tag_value<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// DynamoDB billing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingMode {
    OnDemand,
    Provisioned,
}

impl BillingMode {
    /// Infer the mode from provisioned throughput when no billing summary exists.
    ///
    /// On-demand tables report zero provisioned capacity on both sides.
    pub fn from_capacity(read_capacity_units: i64, write_capacity_units: i64) -> Self {
        if read_capacity_units == 0 && write_capacity_units == 0 {
            BillingMode::OnDemand
        } else {
            BillingMode::Provisioned
        }
    }
}

impl std::fmt::Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingMode::OnDemand => write!(f, "on-demand"),
            BillingMode::Provisioned => write!(f, "provisioned"),
        }
    }
}

/// DynamoDB table, reduced to what the advisor needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescription {
    pub table_name: String,
    pub billing_mode: BillingMode,
}

/// DynamoDB CloudWatch metrics the advisor reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamoMetric {
    ConsumedWriteCapacityUnits,
    ConsumedReadCapacityUnits,
    ProvisionedWriteCapacityUnits,
    ProvisionedReadCapacityUnits,
}

impl DynamoMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DynamoMetric::ConsumedWriteCapacityUnits => "ConsumedWriteCapacityUnits",
            DynamoMetric::ConsumedReadCapacityUnits => "ConsumedReadCapacityUnits",
            DynamoMetric::ProvisionedWriteCapacityUnits => "ProvisionedWriteCapacityUnits",
            DynamoMetric::ProvisionedReadCapacityUnits => "ProvisionedReadCapacityUnits",
        }
    }
}

/// Daily statistic to request from the metrics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyStatistic {
    Sum,
    Average,
}

/// Enumerates EC2 snapshots, images, and instances
#[async_trait]
pub trait ResourceEnumerator: Send + Sync {
    /// Snapshots owned by `owner_account_id`
    async fn list_owned_snapshots(&self, owner_account_id: &str) -> Result<Vec<Snapshot>>;

    /// Single snapshot by ID, `None` when it does not exist
    async fn describe_snapshot(&self, snapshot_id: &str) -> Result<Option<Snapshot>>;

    /// Images owned by the caller
    async fn list_owned_images(&self) -> Result<Vec<Image>>;

    /// Single instance by ID, `None` when it no longer exists
    async fn describe_instance(&self, instance_id: &str) -> Result<Option<Instance>>;
}

/// Writes tags onto a resource. Upserts by key.
#[async_trait]
pub trait TagWriter: Send + Sync {
    async fn apply_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<()>;
}

/// Resolves the caller's AWS account
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn account_id(&self) -> Result<String>;
}

/// Enumerates DynamoDB tables
#[async_trait]
pub trait TableCatalog: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<String>>;

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription>;
}

/// Daily CloudWatch statistics for a DynamoDB table
///
/// Returned series are sparse: days with no datapoint are absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn daily_statistic(
        &self,
        table_name: &str,
        metric: DynamoMetric,
        statistic: DailyStatistic,
        window: &LookbackWindow,
    ) -> Result<DailySeries>;
}
