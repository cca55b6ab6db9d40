//! In-memory stand-ins for the AWS collaborators
//!
//! Each integration test builds a `FakeAccount` with the resources it needs
//! and inspects `written_tags()` afterwards.

#![allow(dead_code)]

use async_trait::async_trait;
use hygienectl::cost::window::{DailySeries, LookbackWindow};
use hygienectl::error::{HygieneError, Result};
use hygienectl::provider::{
    BillingMode, DailyStatistic, DynamoMetric, IdentityProvider, Image, Instance, MetricsProvider,
    ResourceEnumerator, Snapshot, TableCatalog, TableDescription, Tag, TagWriter,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn tag(k: &str, v: &str) -> Tag {
    (k.to_string(), v.to_string())
}

#[derive(Default)]
pub struct FakeAccount {
    pub account_id: String,
    pub snapshots: Vec<Snapshot>,
    pub images: Vec<Image>,
    pub instances: HashMap<String, Instance>,
    /// Instance IDs whose lookup fails with a provider error
    pub broken_instances: HashSet<String>,
    pub fail_image_listing: bool,
    pub fail_snapshot_listing: bool,
    /// Snapshot IDs whose next tag write is rejected
    failing_writes: Mutex<HashSet<String>>,
    writes: Mutex<Vec<(String, Vec<Tag>)>>,
}

impl FakeAccount {
    pub fn new(account_id: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_snapshot(mut self, id: &str, description: &str, tags: Vec<Tag>) -> Self {
        self.snapshots.push(Snapshot {
            snapshot_id: id.to_string(),
            description: description.to_string(),
            tags,
        });
        self
    }

    pub fn with_instance(mut self, id: &str, tags: Vec<Tag>) -> Self {
        self.instances.insert(
            id.to_string(),
            Instance {
                instance_id: id.to_string(),
                tags,
            },
        );
        self
    }

    pub fn with_image(
        mut self,
        id: &str,
        description: &str,
        location: &str,
        snapshots: &[&str],
    ) -> Self {
        self.images.push(Image {
            image_id: id.to_string(),
            description: description.to_string(),
            image_location: location.to_string(),
            snapshot_ids: snapshots.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Reject the first tag write to `snapshot_id`; later writes succeed
    pub fn fail_first_write(self, snapshot_id: &str) -> Self {
        self.failing_writes
            .lock()
            .unwrap()
            .insert(snapshot_id.to_string());
        self
    }

    pub fn written_tags(&self) -> Vec<(String, Vec<Tag>)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeAccount {
    async fn account_id(&self) -> Result<String> {
        Ok(self.account_id.clone())
    }
}

#[async_trait]
impl ResourceEnumerator for FakeAccount {
    async fn list_owned_snapshots(&self, owner_account_id: &str) -> Result<Vec<Snapshot>> {
        if self.fail_snapshot_listing {
            return Err(HygieneError::provider("ec2", "DescribeSnapshots", "unreachable"));
        }
        assert_eq!(owner_account_id, self.account_id);
        Ok(self.snapshots.clone())
    }

    async fn describe_snapshot(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        Ok(self
            .snapshots
            .iter()
            .find(|s| s.snapshot_id == snapshot_id)
            .cloned())
    }

    async fn list_owned_images(&self) -> Result<Vec<Image>> {
        if self.fail_image_listing {
            return Err(HygieneError::provider("ec2", "DescribeImages", "unreachable"));
        }
        Ok(self.images.clone())
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<Instance>> {
        if self.broken_instances.contains(instance_id) {
            return Err(HygieneError::provider("ec2", "DescribeInstances", "internal error"));
        }
        Ok(self.instances.get(instance_id).cloned())
    }
}

#[async_trait]
impl TagWriter for FakeAccount {
    async fn apply_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<()> {
        if self.failing_writes.lock().unwrap().remove(resource_id) {
            return Err(HygieneError::provider("ec2", "CreateTags", "request limit exceeded"));
        }
        self.writes
            .lock()
            .unwrap()
            .push((resource_id.to_string(), tags.to_vec()));
        Ok(())
    }
}

/// Metrics for one fake table
#[derive(Default, Clone)]
pub struct TableMetrics {
    pub consumed_writes: DailySeries,
    pub consumed_reads: DailySeries,
    pub provisioned_writes: DailySeries,
    pub provisioned_reads: DailySeries,
}

#[derive(Default)]
pub struct FakeDynamo {
    pub tables: Vec<(TableDescription, TableMetrics)>,
    pub fail_listing: bool,
    /// Tables whose metric requests fail
    pub broken_tables: HashSet<String>,
}

impl FakeDynamo {
    pub fn with_table(mut self, name: &str, mode: BillingMode, metrics: TableMetrics) -> Self {
        self.tables.push((
            TableDescription {
                table_name: name.to_string(),
                billing_mode: mode,
            },
            metrics,
        ));
        self
    }

    fn metrics(&self, name: &str) -> Option<&TableMetrics> {
        self.tables
            .iter()
            .find(|(t, _)| t.table_name == name)
            .map(|(_, m)| m)
    }
}

#[async_trait]
impl TableCatalog for FakeDynamo {
    async fn list_tables(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(HygieneError::provider("dynamodb", "ListTables", "unreachable"));
        }
        Ok(self.tables.iter().map(|(t, _)| t.table_name.clone()).collect())
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription> {
        self.tables
            .iter()
            .find(|(t, _)| t.table_name == table_name)
            .map(|(t, _)| t.clone())
            .ok_or_else(|| HygieneError::ResourceNotFound {
                resource_type: "table".to_string(),
                resource_id: table_name.to_string(),
            })
    }
}

#[async_trait]
impl MetricsProvider for FakeDynamo {
    async fn daily_statistic(
        &self,
        table_name: &str,
        metric: DynamoMetric,
        _statistic: DailyStatistic,
        _window: &LookbackWindow,
    ) -> Result<DailySeries> {
        if self.broken_tables.contains(table_name) {
            return Err(HygieneError::provider("cloudwatch", "GetMetricStatistics", "throttled"));
        }
        let Some(metrics) = self.metrics(table_name) else {
            return Ok(DailySeries::new());
        };
        Ok(match metric {
            DynamoMetric::ConsumedWriteCapacityUnits => metrics.consumed_writes.clone(),
            DynamoMetric::ConsumedReadCapacityUnits => metrics.consumed_reads.clone(),
            DynamoMetric::ProvisionedWriteCapacityUnits => metrics.provisioned_writes.clone(),
            DynamoMetric::ProvisionedReadCapacityUnits => metrics.provisioned_reads.clone(),
        })
    }
}
