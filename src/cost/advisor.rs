//! Billing-mode advice across DynamoDB tables
//!
//! Tables are processed one after another. A failure on one table is
//! recorded in the report and the run moves on; only failing to list the
//! tables aborts. A table that disappears mid-run is skipped.

use super::aggregation::aggregate;
use super::estimator::estimate_provisioned;
use super::pricing::PricingModel;
use super::recommender::{recommend, Recommendation, RecommendationInput};
use super::window::LookbackWindow;
use crate::error::{HygieneError, Result};
use crate::provider::{DailyStatistic, DynamoMetric, MetricsProvider, TableCatalog};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct AdvisorOptions {
    /// Tables to analyze; empty means every table in the region
    pub tables: Vec<String>,
    pub window: LookbackWindow,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Advised(Recommendation),
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table_name: String,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvisoryReport {
    pub tables: Vec<TableReport>,
}

impl AdvisoryReport {
    pub fn failed(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t.outcome, TableOutcome::Failed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t.outcome, TableOutcome::Skipped { .. }))
            .count()
    }

    pub fn needing_attention(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| match &t.outcome {
                TableOutcome::Advised(rec) => rec.verdict.needs_attention(),
                TableOutcome::Skipped { .. } | TableOutcome::Failed { .. } => false,
            })
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Analyze every selected table.
///
/// # Errors
/// Returns an error only if the table list itself cannot be fetched.
pub async fn advise_tables(
    catalog: &dyn TableCatalog,
    metrics: &dyn MetricsProvider,
    pricing: &PricingModel,
    options: &AdvisorOptions,
) -> Result<AdvisoryReport> {
    info!(
        "Using lookback window {} (start {}, end {})",
        options.window,
        options.window.start(),
        options.window.end()
    );

    let tables = if options.tables.is_empty() {
        catalog.list_tables().await?
    } else {
        options.tables.clone()
    };

    let mut report = AdvisoryReport::default();
    for table_name in tables {
        info!("Looking up info for {}", table_name);
        let result = advise_table(catalog, metrics, pricing, &options.window, &table_name).await;
        let outcome = match result {
            Ok(recommendation) => {
                log_recommendation(&table_name, &recommendation);
                TableOutcome::Advised(recommendation)
            }
            Err(e) if e.is_expected() => {
                debug!("Skipping table {}: {}", table_name, e);
                TableOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                warn!("Failed to analyze table {}: {}", table_name, e);
                TableOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.tables.push(TableReport { table_name, outcome });
    }

    Ok(report)
}

/// Fetch metrics for one table and run the decision procedure
pub async fn advise_table(
    catalog: &dyn TableCatalog,
    metrics: &dyn MetricsProvider,
    pricing: &PricingModel,
    window: &LookbackWindow,
    table_name: &str,
) -> Result<Recommendation> {
    let table = catalog.describe_table(table_name).await?;

    let writes = metrics
        .daily_statistic(
            table_name,
            DynamoMetric::ConsumedWriteCapacityUnits,
            DailyStatistic::Sum,
            window,
        )
        .await?;
    let reads = metrics
        .daily_statistic(
            table_name,
            DynamoMetric::ConsumedReadCapacityUnits,
            DailyStatistic::Sum,
            window,
        )
        .await?;

    let usage = aggregate(window, &writes, &reads);
    debug!(
        "{}: three month consumed writes {} reads {}",
        table_name, usage.window.writes, usage.window.reads
    );

    let provisioned_reads: Vec<f64> = metrics
        .daily_statistic(
            table_name,
            DynamoMetric::ProvisionedReadCapacityUnits,
            DailyStatistic::Average,
            window,
        )
        .await?
        .into_values()
        .collect();
    let provisioned_writes: Vec<f64> = metrics
        .daily_statistic(
            table_name,
            DynamoMetric::ProvisionedWriteCapacityUnits,
            DailyStatistic::Average,
            window,
        )
        .await?
        .into_values()
        .collect();

    let provisioned_monthly_estimate =
        match estimate_provisioned(table_name, &provisioned_reads, &provisioned_writes, pricing) {
            Ok(estimate) => {
                debug!(
                    "{}: provisioned {} read / {} write units, ${:.4}/month",
                    table_name, estimate.read_units, estimate.write_units, estimate.monthly_cost
                );
                Some(estimate.monthly_cost)
            }
            Err(e @ HygieneError::InsufficientData { .. }) => {
                debug!("{}", e);
                None
            }
            Err(e) => return Err(e),
        };

    Ok(recommend(
        &RecommendationInput {
            usage,
            provisioned_monthly_estimate,
            current_mode: table.billing_mode,
        },
        pricing,
    ))
}

fn log_recommendation(table_name: &str, rec: &Recommendation) {
    if rec.verdict.needs_attention() {
        warn!(
            "{}: {} ({}): writes({}) reads({})",
            table_name, rec.verdict, rec.basis, rec.sum_writes, rec.sum_reads
        );
    } else {
        info!(
            "{}: {} ({}): writes({}) reads({})",
            table_name, rec.verdict, rec.basis, rec.sum_writes, rec.sum_reads
        );
    }

    if let Some(costs) = &rec.costs {
        info!(
            "    minimum provisioned monthly price: {:.4}",
            costs.minimum_provisioned_monthly
        );
        match costs.provisioned_monthly_estimate {
            Some(estimate) => info!("    calculated monthly provisioned price: {:.4}", estimate),
            None => info!("    calculated monthly provisioned price: unavailable"),
        }
        for (i, cost) in costs.monthly_on_demand.iter().enumerate() {
            info!("    month {} price (on-demand): {:.4}", i + 1, cost);
        }
    }
}
