use ypipe_core::{BatchQuery, FetchOrchestrator, PipelineConfig};

use crate::error::CliError;

pub async fn run(query: BatchQuery, config: PipelineConfig) -> Result<serde_json::Value, CliError> {
    let orchestrator = FetchOrchestrator::from_config(config);
    let batch = orchestrator.get(query).await?;
    Ok(serde_json::to_value(batch.as_slice())?)
}
