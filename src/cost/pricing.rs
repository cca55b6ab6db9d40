//! DynamoDB unit prices
//!
//! Prices are loaded from the `[pricing]` config section and passed by
//! reference; nothing here is global.

use crate::error::{ConfigError, HygieneError, Result};
use serde::{Deserialize, Serialize};

/// Billing hours in a month, as AWS prices provisioned capacity
pub const HOURS_PER_MONTH: f64 = 720.0;

/// Unit prices for both billing modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingModel {
    /// Price of one provisioned write capacity unit for one hour
    pub provisioned_write_unit_hour: f64,
    /// Price of one provisioned read capacity unit for one hour
    pub provisioned_read_unit_hour: f64,
    /// Price of a single on-demand write request unit
    pub on_demand_write_request: f64,
    /// Price of a single on-demand read request unit
    pub on_demand_read_request: f64,
}

impl Default for PricingModel {
    fn default() -> Self {
        // us-east-1 list prices
        Self {
            provisioned_write_unit_hour: 0.00065,
            provisioned_read_unit_hour: 0.00013,
            on_demand_write_request: 1.25 / 1_000_000.0,
            on_demand_read_request: 0.25 / 1_000_000.0,
        }
    }
}

impl PricingModel {
    /// Cost of serving `writes` and `reads` request units on demand
    pub fn on_demand_cost(&self, writes: f64, reads: f64) -> f64 {
        writes * self.on_demand_write_request + reads * self.on_demand_read_request
    }

    /// Hourly cost of holding one provisioned write unit and one read unit
    pub fn minimum_provisioned_price(&self) -> f64 {
        self.provisioned_write_unit_hour + self.provisioned_read_unit_hour
    }

    /// `minimum_provisioned_price` over a 720-hour month
    pub fn minimum_provisioned_monthly(&self) -> f64 {
        self.minimum_provisioned_price() * HOURS_PER_MONTH
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pricing.provisioned_write_unit_hour", self.provisioned_write_unit_hour),
            ("pricing.provisioned_read_unit_hour", self.provisioned_read_unit_hour),
            ("pricing.on_demand_write_request", self.on_demand_write_request),
            ("pricing.on_demand_read_request", self.on_demand_read_request),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HygieneError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("must be a non-negative number, got {}", value),
                }));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_demand_cost_one_million_each() {
        let pricing = PricingModel::default();
        let cost = pricing.on_demand_cost(1_000_000.0, 1_000_000.0);
        assert!((cost - 1.50).abs() < 1e-9, "cost was {}", cost);
    }

    #[test]
    fn test_minimum_provisioned_price() {
        let pricing = PricingModel::default();
        assert!((pricing.minimum_provisioned_price() - 0.00078).abs() < 1e-12);
        assert!((pricing.minimum_provisioned_monthly() - 0.5616).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let mut pricing = PricingModel::default();
        assert!(pricing.validate().is_ok());

        pricing.on_demand_read_request = -1.0;
        assert!(pricing.validate().is_err());

        pricing.on_demand_read_request = f64::NAN;
        assert!(pricing.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let pricing: PricingModel = toml::from_str("on_demand_write_request = 0.000002").unwrap();
        assert_eq!(pricing.on_demand_write_request, 0.000002);
        assert_eq!(pricing.provisioned_read_unit_hour, 0.00013);
    }
}
