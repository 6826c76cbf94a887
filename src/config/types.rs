use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use crate::pipeline::state::AnalysisSettings;

pub const DEFAULT_MODELS_DIR: &str = "models";
pub const DEFAULT_BINARY_MODEL: &str = "binary_classifier";
pub const DEFAULT_MULTICLASS_MODEL: &str = "multiclass_classifier";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ContractBenchConfig {
    pub models: Option<ModelsConfig>,
    pub analysis: Option<AnalysisConfig>,
    pub tools: Option<Vec<ExternalToolConfig>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    pub directory: Option<PathBuf>,
    /// Metadata key of the binary classifier
    pub binary: Option<String>,
    /// Metadata key of the multi-class classifier
    pub multiclass: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutputFormat {
    #[default]
    Normalized,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalToolConfig {
    pub name: String,
    pub program: String,
    /// Arguments; `{contract_path}` and `{contract_name}` are substituted.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub format: ToolOutputFormat,
    #[serde(default = "default_success_exit_codes")]
    pub success_exit_codes: Vec<i32>,
}

fn default_success_exit_codes() -> Vec<i32> {
    vec![0]
}

/// Model settings with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModels {
    pub directory: PathBuf,
    pub binary: String,
    pub multiclass: String,
}

impl ContractBenchConfig {
    pub fn models(&self) -> ResolvedModels {
        let m = self.models.clone().unwrap_or_default();
        ResolvedModels {
            directory: m.directory.unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR)),
            binary: m.binary.unwrap_or_else(|| DEFAULT_BINARY_MODEL.to_string()),
            multiclass: m.multiclass.unwrap_or_else(|| DEFAULT_MULTICLASS_MODEL.to_string()),
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        let a = self.analysis.clone().unwrap_or_default();
        AnalysisSettings {
            timeout: Duration::from_secs(a.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            max_concurrency: a.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
        }
    }

    pub fn external_tools(&self) -> &[ExternalToolConfig] {
        self.tools.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_resolves() {
        let config = ContractBenchConfig::default();
        let models = config.models();
        assert_eq!(models.directory, PathBuf::from("models"));
        assert_eq!(models.binary, "binary_classifier");
        assert_eq!(models.multiclass, "multiclass_classifier");
        assert!(config.external_tools().is_empty());
    }

    #[test]
    fn test_analysis_defaults() {
        let settings = ContractBenchConfig::default().analysis_settings();
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert_eq!(settings.max_concurrency, 4);
    }

    #[test]
    fn test_tool_config_defaults() {
        let tool: ExternalToolConfig = serde_yaml::from_str("name: slither\nprogram: slither-wrapper\n").unwrap();
        assert!(tool.args.is_empty());
        assert_eq!(tool.format, ToolOutputFormat::Normalized);
        assert_eq!(tool.success_exit_codes, vec![0]);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(serde_yaml::from_str::<ContractBenchConfig>("plots:\n  enabled: true\n").is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let yaml = "name: x\nprogram: y\nformat: sarif\n";
        assert!(serde_yaml::from_str::<ExternalToolConfig>(yaml).is_err());
    }
}
