//! Shopdoc Migrate - relational to document store migration

use anyhow::Result;
use clap::Parser;
use shopdoc_common::logging::{init_logging, LogConfig, LogLevel};
use shopdoc_migrate::{handle, Envelope, MigrateError, MigrationConfig, MigrationRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "shopdoc-migrate")]
#[command(author, version, about = "Migrate the shop database into the document store")]
struct Cli {
    /// Collections to migrate, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    collections: Option<Vec<String>>,

    /// Do not create indexes after loading
    #[arg(long)]
    skip_indexes: bool,

    /// Do not compare source and destination counts
    #[arg(long)]
    skip_validation: bool,

    /// Read the request from a JSON file; other request flags are ignored
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the result envelope on one line
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn request(&self) -> shopdoc_migrate::Result<MigrationRequest> {
        match &self.event {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    MigrateError::InvalidRequest(format!("cannot read {}: {}", path.display(), e))
                })?;
                MigrationRequest::from_json(&json)
            },
            None => Ok(MigrationRequest {
                collections: self.collections.clone(),
                create_indexes: !self.skip_indexes,
                validate: !self.skip_validation,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("shopdoc-migrate")
        .build()
        .with_env_overrides()?;

    let _guard = init_logging(&log_config)?;

    let envelope = match cli.request() {
        Ok(request) => {
            info!(?request, "Starting shopdoc migration");
            handle(&request, MigrationConfig::from_env()).await
        },
        Err(e) => {
            error!(error = %e, "Rejected invocation request");
            Envelope::failed(Uuid::new_v4(), &e)
        },
    };
    print_envelope(&envelope, cli.compact)?;

    Ok(if envelope.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_envelope(envelope: &Envelope, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(envelope)?
    } else {
        serde_json::to_string_pretty(envelope)?
    };
    println!("{}", json);
    Ok(())
}
