//! hygienectl library
//!
//! Snapshot tagging and DynamoDB billing-mode advice for an AWS account.
//! The decision logic (`cost`, `tagging::composer`) is pure; AWS access goes
//! through the traits in `provider` so it can be swapped out in tests.

pub mod aws;
pub mod config;
pub mod cost;
pub mod error;
pub mod exit_codes;
pub mod provider;
pub mod report;
pub mod tagging;

// Re-export commonly used types
pub use cost::{PricingModel, Recommendation, Verdict};
pub use error::{HygieneError, Result};
pub use tagging::{TaggingReport, TaggerOptions};
