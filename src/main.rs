use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod error;
mod services;

use cli::Cli;
use commands::{run_sync, SyncRequest};
use domain::models::SyncReport;
use services::config::load_config;
use services::output::{print_error, print_one};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, destination: &std::path::Path, source: &str) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let report = run_sync(
        &SyncRequest {
            destination,
            source,
            dry_run: cli.dry_run,
            json: cli.json,
        },
        &config,
    )?;
    print_one(cli.json, report, summary)
}

fn summary(r: &SyncReport) -> String {
    let action = if r.written {
        "updated"
    } else if r.dry_run && (r.inserted + r.updated + r.removed) > 0 {
        "would update"
    } else {
        "unchanged"
    };
    format!(
        "{} {}: {} inserted, {} updated, {} removed",
        action, r.destination, r.inserted, r.updated, r.removed
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (Some(destination), Some(source)) = (cli.destination.as_deref(), cli.source.as_deref())
    else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(&cli, destination, source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "sync failed");
            print_error(cli.json, &e);
            ExitCode::FAILURE
        }
    }
}
