//! Error types for hygienectl
//!
//! Library code returns `crate::error::Result<T>` carrying `HygieneError`.
//! The CLI uses `anyhow::Result<T>` and converts at the boundary, the same
//! split the rest of the crate follows.
//!
//! ## When to Use Which Error
//!
//! - `ResourceNotFound`: the resource referenced by another resource is gone
//!   (e.g. the instance a snapshot was created from was terminated).
//!   Expected; callers log it at debug and skip the item.
//!
//! - `InsufficientData`: a metric window came back empty, so an average
//!   cannot be formed. Short-circuits the provisioned estimate.
//!
//! - `Provider`: any other failure from an AWS collaborator. Fatal only when
//!   it happens during top-level enumeration; per-item failures are recorded
//!   in the batch report instead.
//!
//! - `Config` / `Validation`: user-supplied configuration or arguments are
//!   unusable.

use crate::provider::ResourceId;
use thiserror::Error;

/// Main error type for hygienectl
#[derive(Error, Debug)]
pub enum HygieneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resource not found: {resource_type} - {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: ResourceId,
    },

    #[error("Insufficient data: no {metric} datapoints for {resource_id}")]
    InsufficientData {
        resource_id: ResourceId,
        metric: String,
    },

    #[error("AWS {service} error during {operation}: {message}")]
    Provider {
        service: String,
        operation: String,
        message: String,
    },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HygieneError {
    /// Build a `Provider` error from any displayable SDK failure.
    pub fn provider(
        service: impl Into<String>,
        operation: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        HygieneError::Provider {
            service: service.into(),
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// True for the errors that describe a skipped item rather than a failure.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            HygieneError::ResourceNotFound { .. } | HygieneError::InsufficientData { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HygieneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = HygieneError::provider("ec2", "DescribeSnapshots", "throttled");
        let msg = err.to_string();
        assert!(msg.contains("ec2"));
        assert!(msg.contains("DescribeSnapshots"));
        assert!(msg.contains("throttled"));
    }

    #[test]
    fn test_expected_errors() {
        let not_found = HygieneError::ResourceNotFound {
            resource_type: "instance".to_string(),
            resource_id: "i-123".to_string(),
        };
        assert!(not_found.is_expected());

        let no_data = HygieneError::InsufficientData {
            resource_id: "orders".to_string(),
            metric: "ProvisionedReadCapacityUnits".to_string(),
        };
        assert!(no_data.is_expected());

        assert!(!HygieneError::provider("sts", "GetCallerIdentity", "denied").is_expected());
    }
}
