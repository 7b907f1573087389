mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ypipe_core::PipelineConfig;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries JSON; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = pipeline_config(cli);
    let data = commands::run(cli, config).await?;
    output::render(&data, cli.pretty)
}

fn pipeline_config(cli: &Cli) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    if let Some(limit) = cli.concurrency {
        config = config.with_max_concurrency(limit);
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_request_timeout(Duration::from_millis(ms));
    }
    config
}
