use anyhow::Result;
use clap::{Parser, Subcommand};
use hygienectl::aws::AwsSession;
use hygienectl::config::{self, Config};
use hygienectl::exit_codes::{codes, exit_code_for_anyhow};
use hygienectl::report::OutputFormat;
use hygienectl::{cost, tagging};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hygienectl")]
#[command(
    about = "AWS account hygiene: snapshot tagging and DynamoDB billing advice",
    long_about = "hygienectl inspects resources in the current AWS account.\n\nCommands:\n  - snapshots tag: name snapshots after the instances and AMIs they came from\n  - dynamo advise: compare on-demand and provisioned billing over the last 90 days"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// AWS region (overrides config and environment)
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS profile (overrides config)
    #[arg(long, global = true)]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// EBS snapshot tagging
    Snapshots {
        #[command(subcommand)]
        subcommand: tagging::SnapshotCommands,
    },
    /// DynamoDB billing-mode advice
    Dynamo {
        #[command(subcommand)]
        subcommand: cost::DynamoCommands,
    },
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".hygienectl.toml")]
        output: PathBuf,
    },
}

async fn run(cli: Cli, config: Config) -> Result<bool> {
    let region = cli.region.as_deref().or(config.aws.region.as_deref());
    let profile = cli.profile.as_deref().or(config.aws.profile.as_deref());

    match cli.command {
        Commands::Init { output } => {
            config::init_config(&output)?;
            Ok(true)
        }
        Commands::Snapshots { subcommand } => {
            let session = AwsSession::load(region, profile).await;
            Ok(tagging::handle_command(subcommand, &config, &session, cli.output).await?)
        }
        Commands::Dynamo { subcommand } => {
            let session = AwsSession::load(region, profile).await;
            Ok(cost::handle_command(subcommand, &config, &session, cli.output).await?)
        }
    }
}

/// Install the stderr subscriber. JSON runs log JSON lines too.
fn init_logging(verbose: bool, output: OutputFormat) {
    // RUST_LOG wins; otherwise info, or debug with --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match output {
        OutputFormat::Json => builder.json().init(),
        OutputFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.output);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(codes::CONFIG_ERROR);
        }
    };

    let code = match run(cli, config).await {
        Ok(true) => codes::SUCCESS,
        Ok(false) => {
            tracing::warn!("Run completed with failed items");
            codes::RUN_FAILURE
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            exit_code_for_anyhow(&e)
        }
    };
    std::process::exit(code);
}
