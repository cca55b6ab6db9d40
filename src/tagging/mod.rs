//! EBS snapshot tagging
//!
//! Names snapshots after the instances and AMIs they came from so that
//! stale snapshots are easier to recognize and clean up.

pub mod composer;
pub mod tagger;

pub use tagger::{tag_snapshots, TagAction, TagOutcome, TagSource, TaggerOptions, TaggingReport};

use crate::aws::{AwsSession, Ec2Resources, StsIdentity};
use crate::config::Config;
use crate::error::Result;
use crate::report::{self, OutputFormat};
use clap::Subcommand;

#[derive(Subcommand, Clone)]
pub enum SnapshotCommands {
    /// Tag owned snapshots with instance names and AMI metadata
    Tag {
        /// Show the tags that would be written without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run a snapshots subcommand; returns whether every snapshot was handled
pub async fn handle_command(
    cmd: SnapshotCommands,
    config: &Config,
    session: &AwsSession,
    output: OutputFormat,
) -> Result<bool> {
    match cmd {
        SnapshotCommands::Tag { dry_run } => {
            let options = TaggerOptions {
                dry_run: dry_run || config.tagging.dry_run,
            };
            let identity = StsIdentity::new(session);
            let ec2 = Ec2Resources::new(session);
            let report = tag_snapshots(&identity, &ec2, &ec2, options).await?;
            report::print_tagging_report(&report, output)?;
            Ok(!report.has_failures())
        }
    }
}
