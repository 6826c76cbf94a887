use std::path::Path;

use console::style;
use crate::adapters::{ModelInfo, ModelStore};
use crate::cli::commands::ToolsArgs;
use crate::errors::ContractBenchError;

pub async fn handle_tools(args: ToolsArgs, config_path: Option<&Path>) -> Result<(), ContractBenchError> {
    let (config, orchestrator) = super::load_context(config_path).await?;
    let models = ModelStore::open(&config.models().directory).info();

    if args.json {
        let report = serde_json::json!({
            "tools": orchestrator.get_available_tools(),
            "models": models,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let registry = orchestrator.registry();
    if registry.is_empty() {
        println!("No tools registered");
    }
    for adapter in registry.all() {
        let status = if adapter.is_available() {
            style("available").green()
        } else {
            style("unavailable").red()
        };
        println!("  {:<20} {:<18} {}", adapter.name(), adapter.kind(), status);
    }
    println!();
    print!("{}", format_model_info(&models));
    Ok(())
}

pub fn format_model_info(info: &ModelInfo) -> String {
    let mut out = format!("Models: {}\n", info.directory.display());
    if !info.metadata_found {
        out.push_str("  no metadata.json found\n");
        return out;
    }
    out.push_str(&format!(
        "  created: {}\n  features ({}): {}\n",
        info.created_at.as_deref().unwrap_or("unknown"),
        info.features.len(),
        info.features.join(", "),
    ));
    for (name, status) in &info.models {
        match &status.error {
            None => out.push_str(&format!("  {:<24} loaded ({})\n", name, status.file.display())),
            Some(e) => out.push_str(&format!("  {:<24} not loaded: {}\n", name, e)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use crate::adapters::ModelStatus;

    #[test]
    fn test_format_model_info() {
        let info = ModelInfo {
            directory: PathBuf::from("models"),
            metadata_found: true,
            created_at: Some("2024-05-01".to_string()),
            features: vec!["a".to_string(), "b".to_string()],
            models: BTreeMap::from([
                ("binary_classifier".to_string(), ModelStatus { file: PathBuf::from("binary.json"), loaded: true, error: None }),
                (
                    "multiclass_classifier".to_string(),
                    ModelStatus { file: PathBuf::from("multi.json"), loaded: false, error: Some("model file not found".to_string()) },
                ),
            ]),
        };
        let text = format_model_info(&info);
        assert!(text.contains("created: 2024-05-01"));
        assert!(text.contains("features (2): a, b"));
        assert!(text.contains("binary_classifier        loaded (binary.json)"));
        assert!(text.contains("multiclass_classifier    not loaded: model file not found"));
    }

    #[test]
    fn test_format_missing_metadata() {
        let info = ModelInfo {
            directory: PathBuf::from("models"),
            metadata_found: false,
            created_at: None,
            features: Vec::new(),
            models: BTreeMap::new(),
        };
        assert!(format_model_info(&info).contains("no metadata.json found"));
    }
}
