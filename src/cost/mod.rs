//! DynamoDB billing-mode advisor
//!
//! Reads three months of consumed and provisioned capacity from CloudWatch
//! and reports whether on-demand or provisioned billing would have been
//! cheaper for each table.

pub mod advisor;
pub mod aggregation;
pub mod estimator;
pub mod pricing;
pub mod recommender;
pub mod window;

pub use advisor::{advise_tables, AdvisorOptions, AdvisoryReport, TableOutcome};
pub use pricing::PricingModel;
pub use recommender::{recommend, Recommendation, Verdict, UNIT_THRESHOLD};
pub use window::LookbackWindow;

use crate::aws::{AwsSession, CloudWatchMetrics, DynamoCatalog};
use crate::config::Config;
use crate::error::{HygieneError, Result};
use crate::report::{self, OutputFormat};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;

#[derive(Subcommand, Clone)]
pub enum DynamoCommands {
    /// Recommend on-demand or provisioned billing from the last 90 days
    Advise {
        /// Table to analyze (repeatable, default: all tables)
        #[arg(long = "table")]
        tables: Vec<String>,
        /// Exclusive end of the lookback window
        /// (YYYY-MM-DD, default: today minus the configured offset)
        #[arg(long)]
        end_date: Option<String>,
    },
}

fn parse_end_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| HygieneError::Validation {
        field: "end_date".to_string(),
        reason: format!("expected YYYY-MM-DD, got '{}': {}", value, e),
    })
}

/// Run a dynamo subcommand; returns whether every table was analyzed
pub async fn handle_command(
    cmd: DynamoCommands,
    config: &Config,
    session: &AwsSession,
    output: OutputFormat,
) -> Result<bool> {
    match cmd {
        DynamoCommands::Advise { tables, end_date } => {
            let window = match end_date {
                Some(value) => LookbackWindow::ending_at(parse_end_date(&value)?),
                None => LookbackWindow::ending_days_before(
                    Utc::now().date_naive(),
                    config.advisor.end_date_offset_days,
                ),
            };
            let options = AdvisorOptions {
                tables: if tables.is_empty() {
                    config.advisor.tables.clone()
                } else {
                    tables
                },
                window,
            };

            let catalog = DynamoCatalog::new(session);
            let metrics = CloudWatchMetrics::new(session);
            let report = advise_tables(&catalog, &metrics, &config.pricing, &options).await?;
            report::print_advisory_report(&report, output)?;
            Ok(!report.has_failures())
        }
    }
}
