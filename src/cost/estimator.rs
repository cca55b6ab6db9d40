//! Monthly cost of the capacity a table actually had provisioned

use super::pricing::{PricingModel, HOURS_PER_MONTH};
use crate::error::{HygieneError, Result};
use crate::provider::DynamoMetric;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProvisionedEstimate {
    pub read_units: u64,
    pub write_units: u64,
    pub monthly_cost: f64,
}

/// Mean rounded up to whole capacity units, `None` for an empty slice
fn ceil_mean(values: &[f64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(mean.max(0.0).ceil() as u64)
}

/// Estimate a month of provisioned spend from daily average capacity.
///
/// Either series being empty is `InsufficientData`.
pub fn estimate_provisioned(
    table_name: &str,
    read_averages: &[f64],
    write_averages: &[f64],
    pricing: &PricingModel,
) -> Result<ProvisionedEstimate> {
    let insufficient = |metric: DynamoMetric| HygieneError::InsufficientData {
        resource_id: table_name.to_string(),
        metric: metric.as_str().to_string(),
    };

    let read_units = ceil_mean(read_averages)
        .ok_or_else(|| insufficient(DynamoMetric::ProvisionedReadCapacityUnits))?;
    let write_units = ceil_mean(write_averages)
        .ok_or_else(|| insufficient(DynamoMetric::ProvisionedWriteCapacityUnits))?;

    let hourly = read_units as f64 * pricing.provisioned_read_unit_hour
        + write_units as f64 * pricing.provisioned_write_unit_hour;

    Ok(ProvisionedEstimate {
        read_units,
        write_units,
        monthly_cost: hourly * HOURS_PER_MONTH,
    })
}
