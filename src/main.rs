// ABOUTME: CLI entry point for ddbm, the DynamoDB migrator
// ABOUTME: Parses flags, connects to DynamoDB, and runs export or import

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dynamodb_migrator::commands::{self, ImportOutcome, RunOutcome};
use dynamodb_migrator::config::{AwsConfig, MigratorConfig};
use dynamodb_migrator::interactive::{AssumeYes, Confirmer, TerminalConfirmer};
use dynamodb_migrator::store::DynamoDbStore;

const USAGE: &str = "\
DynamoDB Migrator
=================

To export:

ddbm --table foo

This will print to STDOUT, so direct the output to a file:

ddbm --table foo > /path/to/file.json

To import:

ddbm --table foo --import /path/to/file.json
";

#[derive(Parser)]
#[command(name = "ddbm")]
#[command(about = "Export a DynamoDB table to JSON and import it back", long_about = None)]
#[command(version, after_help = USAGE)]
struct Cli {
    /// Table to export from or import into
    #[arg(long)]
    table: Option<String>,
    /// Import items from a JSON file produced by an export
    #[arg(long = "import", value_name = "PATH")]
    import_path: Option<PathBuf>,
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
    /// AWS region (defaults to the provider chain)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
    /// Custom endpoint URL, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,
    /// Named profile from the shared AWS config files
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,
}

impl Cli {
    fn into_config(self) -> Option<MigratorConfig> {
        let table = self.table.filter(|t| !t.is_empty())?;

        let mut config = MigratorConfig::new(table)
            .with_assume_yes(self.yes)
            .with_aws(AwsConfig {
                region: self.region,
                endpoint_url: self.endpoint_url,
                profile: self.profile,
            });
        if let Some(path) = self.import_path {
            config = config.with_import_path(path);
        }
        Some(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the exported document
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits 2 on parse errors; usage errors here exit 1
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let Some(config) = cli.into_config() else {
        println!("{}", USAGE);
        return ExitCode::from(1);
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(config: &MigratorConfig) -> anyhow::Result<()> {
    let store = DynamoDbStore::connect(&config.aws).await?;

    let confirmer: &dyn Confirmer = if config.assume_yes {
        &AssumeYes
    } else {
        &TerminalConfirmer
    };

    match commands::run(config, &store, confirmer).await? {
        RunOutcome::Exported(json) => println!("{}", json),
        RunOutcome::Imported(ImportOutcome::Declined) => {
            tracing::info!("Nothing imported");
        }
        RunOutcome::Imported(ImportOutcome::Completed { written }) => {
            tracing::info!("✅ Import complete ({} item(s))", written);
        }
    }

    Ok(())
}
