mod params;
mod prices;

use serde_json::Value;
use ypipe_core::{BatchQuery, PipelineConfig};

use crate::cli::{Cli, Command, QueryArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli, config: PipelineConfig) -> Result<Value, CliError> {
    tracing::debug!(?config, "pipeline configuration");
    match &cli.command {
        Command::Prices(args) => prices::run(parse_query(args)?, config).await,
        Command::Params(args) => params::run(&parse_query(args)?, &config),
    }
}

fn parse_query(args: &QueryArgs) -> Result<BatchQuery, CliError> {
    Ok(BatchQuery::parse(
        args.symbols.as_slice(),
        args.period.as_deref(),
        &args.interval,
        args.start.as_deref(),
        args.end.as_deref(),
    )?)
}
