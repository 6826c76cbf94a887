use std::sync::Arc;

use async_trait::async_trait;
use crate::errors::ContractBenchError;
use crate::models::finding::Finding;
use super::adapter::{ToolAdapter, ToolKind};
use super::catalog::profile_for;
use super::classifier::ClassifierBackend;
use super::features::FeatureExtractor;
use super::model::ModelStore;

/// Classifier over vulnerability types, with `safe` as the negative class.
pub struct AiMulticlassAdapter {
    backend: ClassifierBackend,
}

impl AiMulticlassAdapter {
    pub const NAME: &'static str = "ai_multiclass";
    pub const SAFE_LABEL: &'static str = "safe";

    pub fn new(backend: ClassifierBackend) -> Self {
        Self { backend }
    }

    pub fn from_store(store: &ModelStore, model_name: &str, extractor: Arc<dyn FeatureExtractor>) -> Self {
        Self::new(ClassifierBackend::from_store(store, model_name, extractor))
    }
}

#[async_trait]
impl ToolAdapter for AiMulticlassAdapter {
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
        let label = prediction.label.trim().to_lowercase();
        if label == Self::SAFE_LABEL {
            return Ok(Vec::new());
        }

        let profile = profile_for(&label);
        let finding = Finding::new(Self::NAME, &label, profile.severity, prediction.confidence)?
            .with_description(profile.description)
            .with_recommendation(profile.recommendation);
        Ok(vec![finding])
    }
}
