use std::sync::Arc;

use async_trait::async_trait;
use crate::errors::ContractBenchError;
use crate::models::finding::{Finding, Severity};
use super::adapter::{ToolAdapter, ToolKind};
use super::classifier::ClassifierBackend;
use super::features::FeatureExtractor;
use super::model::ModelStore;

/// Vulnerable/safe classifier. It cannot name a vulnerability, so a positive
/// prediction is reported as the generic `vulnerable` type.
pub struct AiBinaryAdapter {
    backend: ClassifierBackend,
}

impl AiBinaryAdapter {
    pub const NAME: &'static str = "ai_binary";
    pub const FINDING_TYPE: &'static str = "vulnerable";

    pub fn new(backend: ClassifierBackend) -> Self {
        Self { backend }
    }

    pub fn from_store(store: &ModelStore, model_name: &str, extractor: Arc<dyn FeatureExtractor>) -> Self {
        Self::new(ClassifierBackend::from_store(store, model_name, extractor))
    }
}

fn is_positive(label: &str) -> bool {
    matches!(label.trim().to_lowercase().as_str(), "vulnerable" | "1" | "true")
}

#[async_trait]
impl ToolAdapter for AiBinaryAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> ToolKind {
        ToolKind::AiModel
    }

    fn is_available(&self) -> bool {
        self.backend.is_loaded()
    }

    async fn analyze(&self, source: &str, _contract_name: &str) -> Result<Vec<Finding>, ContractBenchError> {
        let prediction = self.backend.predict(source).await?;
        if !is_positive(&prediction.label) {
            return Ok(Vec::new());
        }

        let finding = Finding::new(Self::NAME, Self::FINDING_TYPE, Severity::Medium, prediction.confidence)?
            .with_description("Classifier predicts the contract is vulnerable")
            .with_recommendation("Run a type-specific analyzer to locate the issue");
        Ok(vec![finding])
    }
}
