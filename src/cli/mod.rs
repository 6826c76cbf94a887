pub mod commands;
pub mod progress;
pub mod tools;
pub mod compare;
pub mod benchmark;
pub mod validate;

pub use commands::{Cli, Commands};

use std::path::Path;
use std::sync::Arc;

use crate::adapters::AdapterRegistry;
use crate::config::{self, ContractBenchConfig};
use crate::errors::ContractBenchError;
use crate::pipeline::ComparisonOrchestrator;

/// Load config (or defaults) and wire the registry into an orchestrator.
pub async fn load_context(
    config_path: Option<&Path>,
) -> Result<(ContractBenchConfig, ComparisonOrchestrator), ContractBenchError> {
    let config = config::load_config(config_path).await?;
    let registry = Arc::new(AdapterRegistry::from_config(&config)?);
    let orchestrator = ComparisonOrchestrator::new(registry, config.analysis_settings());
    Ok((config, orchestrator))
}

pub async fn build_orchestrator(config_path: Option<&Path>) -> Result<ComparisonOrchestrator, ContractBenchError> {
    Ok(load_context(config_path).await?.1)
}
