//! Run output: JSON lines or a text summary table
//!
//! Per-resource decisions are already logged as they happen; this module
//! prints the end-of-run view on stdout.

use crate::cost::{AdvisoryReport, TableOutcome};
use crate::error::Result;
use crate::tagging::{TagOutcome, TagSource, TaggingReport};
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use console::style;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// JSON lines for an advisory run: one per table, then a summary
pub fn advisory_json_lines(report: &AdvisoryReport) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(report.tables.len() + 1);
    for table in &report.tables {
        lines.push(serde_json::to_string(table)?);
    }
    lines.push(serde_json::to_string(&json!({
        "summary": {
            "tables": report.tables.len(),
            "needing_attention": report.needing_attention(),
            "skipped": report.skipped(),
            "failed": report.failed(),
        }
    }))?);
    Ok(lines)
}

/// JSON lines for a tagging run: one per action, then a summary
pub fn tagging_json_lines(report: &TaggingReport) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(report.actions.len() + 1);
    for action in &report.actions {
        lines.push(serde_json::to_string(action)?);
    }
    lines.push(serde_json::to_string(&json!({
        "summary": {
            "account_id": report.account_id,
            "snapshots_seen": report.snapshots_seen,
            "tagged": report.tagged(),
            "skipped": report.skipped(),
            "failed": report.failed(),
        }
    }))?);
    Ok(lines)
}

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn print_advisory_report(report: &AdvisoryReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        for line in advisory_json_lines(report)? {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Table",
        "Mode",
        "Verdict",
        "Basis",
        "Writes (90d)",
        "Reads (90d)",
        "On-demand/month",
        "Provisioned/month",
    ]);

    for entry in &report.tables {
        match &entry.outcome {
            TableOutcome::Advised(rec) => {
                let (on_demand, provisioned) = match &rec.costs {
                    Some(costs) => (
                        costs
                            .monthly_on_demand
                            .iter()
                            .map(|c| money(*c))
                            .collect::<Vec<_>>()
                            .join(" / "),
                        costs
                            .provisioned_monthly_estimate
                            .map(money)
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    None => ("-".to_string(), "-".to_string()),
                };
                table.add_row(vec![
                    Cell::new(&entry.table_name),
                    Cell::new(rec.current_mode),
                    Cell::new(rec.verdict),
                    Cell::new(rec.basis),
                    Cell::new(format!("{:.0}", rec.sum_writes)),
                    Cell::new(format!("{:.0}", rec.sum_reads)),
                    Cell::new(on_demand),
                    Cell::new(provisioned),
                ]);
            }
            TableOutcome::Skipped { reason } => {
                table.add_row(vec![
                    Cell::new(&entry.table_name),
                    Cell::new("-"),
                    Cell::new("skipped"),
                    Cell::new(reason),
                ]);
            }
            TableOutcome::Failed { error } => {
                table.add_row(vec![
                    Cell::new(&entry.table_name),
                    Cell::new("-"),
                    Cell::new("failed"),
                    Cell::new(error),
                ]);
            }
        }
    }

    println!("{table}");
    println!(
        "{} tables analyzed, {} need attention, {} skipped, {} failed",
        report.tables.len(),
        style(report.needing_attention()).yellow(),
        report.skipped(),
        style(report.failed()).red()
    );
    Ok(())
}

pub fn print_tagging_report(report: &TaggingReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        for line in tagging_json_lines(report)? {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Snapshot", "Source", "Result", "Details"]);
    for action in &report.actions {
        let source = match &action.source {
            TagSource::Instance(id) => format!("instance {}", id),
            TagSource::Image(id) => format!("image {}", id),
        };
        let (result, details) = match &action.outcome {
            TagOutcome::Tagged { tags, dry_run } => (
                if *dry_run { "would tag" } else { "tagged" },
                tags.iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            TagOutcome::Skipped { reason } => ("skipped", reason.clone()),
            TagOutcome::Failed { error } => ("failed", error.clone()),
        };
        table.add_row(vec![
            Cell::new(&action.snapshot_id),
            Cell::new(source),
            Cell::new(result),
            Cell::new(details),
        ]);
    }

    println!("{table}");
    println!(
        "Account {}: {} snapshots, {} tagged, {} skipped, {} failed",
        report.account_id,
        report.snapshots_seen,
        style(report.tagged()).green(),
        report.skipped(),
        style(report.failed()).red()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::advisor::TableReport;
    use crate::tagging::TagAction;

    #[test]
    fn test_tagging_json_lines_end_with_summary() {
        let report = TaggingReport {
            account_id: "123456789012".to_string(),
            snapshots_seen: 2,
            actions: vec![TagAction {
                snapshot_id: "snap-1".to_string(),
                source: TagSource::Instance("i-1".to_string()),
                outcome: TagOutcome::Tagged {
                    tags: vec![("Name".to_string(), "web".to_string())],
                    dry_run: false,
                },
            }],
        };

        let lines = tagging_json_lines(&report).unwrap();
        assert_eq!(lines.len(), 2);

        let action: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(action["snapshot_id"], "snap-1");
        assert_eq!(action["status"], "tagged");
        assert_eq!(action["source"]["kind"], "instance");

        let summary: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(summary["summary"]["tagged"], 1);
        assert_eq!(summary["summary"]["failed"], 0);
    }

    #[test]
    fn test_skipped_table_is_counted_apart_from_failures() {
        let report = AdvisoryReport {
            tables: vec![TableReport {
                table_name: "gone".to_string(),
                outcome: TableOutcome::Skipped {
                    reason: "Resource not found: table - gone".to_string(),
                },
            }],
        };

        let lines = advisory_json_lines(&report).unwrap();
        let row: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(row["status"], "skipped");
        assert_eq!(row["table_name"], "gone");

        let summary: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(summary["summary"]["skipped"], 1);
        assert_eq!(summary["summary"]["failed"], 0);
    }
}
