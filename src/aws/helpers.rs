//! Conversions from AWS SDK types to the crate's provider types
//!
//! Resources missing their ID are dropped rather than surfaced with a
//! placeholder; the tagger has nothing to write to without one.

use crate::provider::{BillingMode, Image, Instance, Snapshot, Tag};
use aws_sdk_dynamodb::types::{BillingMode as SdkBillingMode, TableDescription as SdkTable};
use aws_sdk_ec2::types::{
    Image as Ec2Image, Instance as Ec2Instance, Snapshot as Ec2Snapshot, Tag as Ec2Tag,
};
use chrono::NaiveDate;

pub(crate) fn tags_from_sdk(tags: &[Ec2Tag]) -> Vec<Tag> {
    tags.iter()
        .filter_map(|tag| {
            tag.key()
                .zip(tag.value())
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}

pub(crate) fn tags_to_sdk(tags: &[Tag]) -> Vec<Ec2Tag> {
    tags.iter()
        .map(|(k, v)| Ec2Tag::builder().key(k).value(v).build())
        .collect()
}

pub(crate) fn snapshot_from_sdk(snapshot: &Ec2Snapshot) -> Option<Snapshot> {
    Some(Snapshot {
        snapshot_id: snapshot.snapshot_id()?.to_string(),
        description: snapshot.description().unwrap_or_default().to_string(),
        tags: tags_from_sdk(snapshot.tags()),
    })
}

pub(crate) fn image_from_sdk(image: &Ec2Image) -> Option<Image> {
    let snapshot_ids = image
        .block_device_mappings()
        .iter()
        .filter_map(|mapping| mapping.ebs().and_then(|ebs| ebs.snapshot_id()))
        .map(|id| id.to_string())
        .collect();

    Some(Image {
        image_id: image.image_id()?.to_string(),
        description: image.description().unwrap_or_default().to_string(),
        image_location: image.image_location().unwrap_or_default().to_string(),
        snapshot_ids,
    })
}

pub(crate) fn instance_from_sdk(instance: &Ec2Instance) -> Option<Instance> {
    Some(Instance {
        instance_id: instance.instance_id()?.to_string(),
        tags: tags_from_sdk(instance.tags()),
    })
}

/// Find an instance in a DescribeInstances response
pub(crate) fn find_instance_in_response<'a>(
    response: &'a aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput,
    instance_id: &str,
) -> Option<&'a Ec2Instance> {
    response
        .reservations()
        .iter()
        .flat_map(|r| r.instances())
        .find(|i| i.instance_id().map(|id| id == instance_id).unwrap_or(false))
}

/// UTC date of a CloudWatch datapoint timestamp
pub(crate) fn date_from_sdk(
    timestamp: &aws_sdk_cloudwatch::primitives::DateTime,
) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(timestamp.secs(), 0).map(|dt| dt.date_naive())
}

/// Billing mode from the table summary, else inferred from capacity.
///
/// Tables created before billing modes existed have no summary and are
/// provisioned unless both capacities are zero.
pub(crate) fn billing_mode_from_sdk(table: &SdkTable) -> BillingMode {
    match table.billing_mode_summary().and_then(|s| s.billing_mode()) {
        Some(SdkBillingMode::PayPerRequest) => BillingMode::OnDemand,
        Some(SdkBillingMode::Provisioned) => BillingMode::Provisioned,
        _ => {
            let throughput = table.provisioned_throughput();
            BillingMode::from_capacity(
                throughput.and_then(|t| t.read_capacity_units()).unwrap_or(0),
                throughput.and_then(|t| t.write_capacity_units()).unwrap_or(0),
            )
        }
    }
}
