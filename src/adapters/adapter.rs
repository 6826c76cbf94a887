use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::errors::ContractBenchError;
use crate::models::finding::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// In-process classifier over extracted features
    AiModel,
    /// Analyzer executed as a child process
    ExternalProcess,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiModel => "ai-model",
            Self::ExternalProcess => "external-process",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform capability every detection backend implements.
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// Registry key, also used as the tool tag on findings.
    fn name(&self) -> &str;

    fn kind(&self) -> ToolKind;

    /// Cheap, side-effect-free readiness probe.
    fn is_available(&self) -> bool;

    /// Analyze one contract. Failures are returned, never panicked.
    async fn analyze(
        &self,
        source: &str,
        contract_name: &str,
    ) -> Result<Vec<Finding>, ContractBenchError>;
}
