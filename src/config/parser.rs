use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use super::schema::CONFIG_SCHEMA;
use super::types::ContractBenchConfig;
use crate::adapters::{AiBinaryAdapter, AiMulticlassAdapter};
use crate::errors::ContractBenchError;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<ContractBenchConfig, ContractBenchError> {
    if !path.exists() {
        return Err(ContractBenchError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ContractBenchError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Parse config text. An empty document yields the defaults.
pub fn parse_config_str(content: &str) -> Result<ContractBenchConfig, ContractBenchError> {
    if content.trim().is_empty() {
        return Ok(ContractBenchConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: ContractBenchConfig = serde_yaml::from_value(yaml)
        .map_err(|e| ContractBenchError::Config(format!("Invalid config: {}", e)))?;

    validate_conflicts(&config)?;

    Ok(config)
}

/// Load the config at `path`, or the defaults when no path is given.
pub async fn load_config(path: Option<&Path>) -> Result<ContractBenchConfig, ContractBenchError> {
    match path {
        Some(p) => parse_config(p).await,
        None => {
            debug!("No config file given, using defaults");
            Ok(ContractBenchConfig::default())
        }
    }
}

/// Structural check against the JSON schema. Violations are logged, the
/// typed parse and conflict checks decide acceptance.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ContractBenchError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| ContractBenchError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ContractBenchError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &ContractBenchConfig) -> Result<(), ContractBenchError> {
    if let Some(analysis) = &config.analysis {
        if analysis.timeout_secs == Some(0) {
            return Err(ContractBenchError::Config("analysis.timeout_secs must be at least 1".into()));
        }
        if analysis.max_concurrency == Some(0) {
            return Err(ContractBenchError::Config("analysis.max_concurrency must be at least 1".into()));
        }
    }

    let models = config.models();
    if models.binary.trim().is_empty() || models.multiclass.trim().is_empty() {
        return Err(ContractBenchError::Config("Model names must not be empty".into()));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for tool in config.external_tools() {
        let name = tool.name.trim();
        if name.is_empty() {
            return Err(ContractBenchError::Config("Tool name must not be empty".into()));
        }
        if name != tool.name {
            return Err(ContractBenchError::Config(format!(
                "Tool name '{}' has surrounding whitespace",
                tool.name
            )));
        }
        if tool.program.trim().is_empty() {
            return Err(ContractBenchError::Config(format!("Tool '{}' has no program", name)));
        }
        if name == AiBinaryAdapter::NAME || name == AiMulticlassAdapter::NAME {
            return Err(ContractBenchError::Config(format!(
                "Tool name '{}' is reserved for a built-in classifier",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(ContractBenchError::Config(format!("Duplicate tool name '{}'", name)));
        }
        if tool.success_exit_codes.is_empty() {
            warn!(tool = %name, "success_exit_codes is empty, every run will be reported as failed");
        }
    }

    Ok(())
}
