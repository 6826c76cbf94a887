use std::sync::Arc;

use crate::errors::ContractBenchError;
use super::features::{feature_vector, FeatureExtractor};
use super::model::{ModelStore, Prediction, Predictor};
use tracing::{debug, error};

/// Feature extraction plus a loaded predictor, shared by the AI adapters.
#[derive(Clone)]
pub struct ClassifierBackend {
    extractor: Arc<dyn FeatureExtractor>,
    predictor: Option<Arc<dyn Predictor>>,
    feature_names: Arc<[String]>,
}

impl ClassifierBackend {
    pub fn new(
        extractor: Arc<dyn FeatureExtractor>,
        predictor: Option<Arc<dyn Predictor>>,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            extractor,
            predictor,
            feature_names: feature_names.into(),
        }
    }

    /// Load `model_name` from the store. A model that cannot be loaded leaves
    /// the backend unloaded rather than failing construction.
    pub fn from_store(store: &ModelStore, model_name: &str, extractor: Arc<dyn FeatureExtractor>) -> Self {
        let predictor = match store.load_predictor(model_name) {
            Ok(p) => Some(p),
            Err(e) => {
                error!(model = model_name, error = %e, "Failed to load model");
                None
            }
        };
        Self::new(extractor, predictor, store.feature_names().to_vec())
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// Run extraction and prediction on the blocking pool so a slow backend
    /// stays subject to the caller's timeout.
    pub async fn predict(&self, source: &str) -> Result<Prediction, ContractBenchError> {
        let predictor = self.predictor.clone()
            .ok_or_else(|| ContractBenchError::AdapterUnavailable("model not loaded".into()))?;
        let extractor = Arc::clone(&self.extractor);
        let feature_names = Arc::clone(&self.feature_names);
        let source = source.to_string();

        let prediction = tokio::task::spawn_blocking(move || {
            let features = extractor.extract(&source);
            let vector = feature_vector(&features, &feature_names);
            predictor.predict(&vector)
        })
        .await
        .map_err(|e| ContractBenchError::AdapterExecution(format!("inference task failed: {}", e)))??;

        debug!(label = %prediction.label, confidence = prediction.confidence, "Model prediction");
        Ok(prediction)
    }
}
