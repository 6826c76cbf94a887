use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use crate::errors::ContractBenchError;
use tracing::{info, warn};

/// Output of a trained classifier for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Probability of the predicted label.
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
}

/// A trained classifier over a fixed-shape feature vector.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<Prediction, ContractBenchError>;

    fn classes(&self) -> &[String];
}

/// Multinomial linear classifier with optional feature standardization,
/// persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearModel {
    pub classes: Vec<String>,
    /// One weight row per class.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self, ContractBenchError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContractBenchError::Model(format!("Failed to read {}: {}", path.display(), e)))?;
        let model: LinearModel = serde_json::from_str(&content)
            .map_err(|e| ContractBenchError::Model(format!("Invalid model {}: {}", path.display(), e)))?;
        model.validate()?;
        Ok(model)
    }

    pub fn input_width(&self) -> usize {
        self.weights.first().map(|w| w.len()).unwrap_or(0)
    }

    fn validate(&self) -> Result<(), ContractBenchError> {
        if self.classes.len() < 2 {
            return Err(ContractBenchError::Model("model needs at least two classes".into()));
        }
        if self.weights.len() != self.classes.len() || self.bias.len() != self.classes.len() {
            return Err(ContractBenchError::Model(format!(
                "expected {} weight rows and biases, found {} and {}",
                self.classes.len(), self.weights.len(), self.bias.len()
            )));
        }
        let width = self.input_width();
        if self.weights.iter().any(|row| row.len() != width) {
            return Err(ContractBenchError::Model("weight rows have differing widths".into()));
        }
        for (label, v) in [("mean", &self.mean), ("scale", &self.scale)] {
            if let Some(v) = v {
                if v.len() != width {
                    return Err(ContractBenchError::Model(format!(
                        "{} has {} entries, expected {}", label, v.len(), width
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<Prediction, ContractBenchError> {
        let width = self.input_width();
        if features.len() != width {
            return Err(ContractBenchError::Model(format!(
                "feature vector has {} values, model expects {}", features.len(), width
            )));
        }

        let x: Vec<f64> = features
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let centered = v - self.mean.as_ref().map_or(0.0, |m| m[i]);
                let s = self.scale.as_ref().map_or(1.0, |s| s[i]);
                if s == 0.0 { centered } else { centered / s }
            })
            .collect();

        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(&x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect();

        // Numerically stable softmax
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        let probs: Vec<f64> = exps.iter().map(|e| e / total).collect();

        let (best, confidence) = probs
            .iter()
            .cloned()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, p)| if p > acc.1 { (i, p) } else { acc });

        Ok(Prediction {
            label: self.classes[best].clone(),
            confidence,
            probabilities: self.classes.iter().cloned().zip(probs).collect(),
        })
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub file: PathBuf,
}

/// Descriptor written next to the model artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub created_at: Option<String>,
    /// Feature order every model expects.
    pub features: Vec<String>,
    pub models: BTreeMap<String, ModelEntry>,
}

/// Load status of one model listed in the metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub file: PathBuf,
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a models directory for display.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub directory: PathBuf,
    pub metadata_found: bool,
    pub created_at: Option<String>,
    pub features: Vec<String>,
    pub models: BTreeMap<String, ModelStatus>,
}

/// Loads classifier artifacts described by `metadata.json` in a models directory.
///
/// Constructed once and handed to the adapters that need it; absence of the
/// directory or metadata is not an error, it only leaves the models unavailable.
pub struct ModelStore {
    dir: PathBuf,
    metadata: Option<ModelMetadata>,
}

impl ModelStore {
    pub fn open(dir: &Path) -> Self {
        let metadata_path = dir.join("metadata.json");
        let metadata = match std::fs::read_to_string(&metadata_path) {
            Ok(content) => match serde_json::from_str::<ModelMetadata>(&content) {
                Ok(m) => {
                    info!(path = %metadata_path.display(), models = m.models.len(), "Model metadata loaded");
                    Some(m)
                }
                Err(e) => {
                    warn!(path = %metadata_path.display(), error = %e, "Invalid model metadata");
                    None
                }
            },
            Err(_) => {
                warn!(path = %metadata_path.display(), "No model metadata found");
                None
            }
        };
        Self { dir: dir.to_path_buf(), metadata }
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        self.metadata.as_ref().map(|m| m.features.as_slice()).unwrap_or(&[])
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Which listed models load, plus the metadata's creation time and features.
    pub fn info(&self) -> ModelInfo {
        let models = self
            .metadata
            .iter()
            .flat_map(|m| m.models.iter())
            .map(|(name, entry)| {
                let (loaded, error) = match self.load_predictor(name) {
                    Ok(_) => (true, None),
                    Err(e) => (false, Some(e.to_string())),
                };
                (name.clone(), ModelStatus { file: entry.file.clone(), loaded, error })
            })
            .collect();

        ModelInfo {
            directory: self.dir.clone(),
            metadata_found: self.metadata.is_some(),
            created_at: self.metadata.as_ref().and_then(|m| m.created_at.clone()),
            features: self.feature_names().to_vec(),
            models,
        }
    }

    /// Load the named model. Relative artifact paths resolve against the models directory.
    pub fn load_predictor(&self, model_name: &str) -> Result<Arc<dyn Predictor>, ContractBenchError> {
        let metadata = self.metadata.as_ref()
            .ok_or_else(|| ContractBenchError::AdapterUnavailable("no model metadata available".into()))?;
        let entry = metadata.models.get(model_name)
            .ok_or_else(|| ContractBenchError::AdapterUnavailable(format!("model {} not found in metadata", model_name)))?;

        let path = if entry.file.is_absolute() {
            entry.file.clone()
        } else {
            self.dir.join(&entry.file)
        };
        if !path.exists() {
            return Err(ContractBenchError::AdapterUnavailable(format!("model file not found: {}", path.display())));
        }

        let model = LinearModel::load(&path)?;
        if model.input_width() != metadata.features.len() {
            return Err(ContractBenchError::Model(format!(
                "model {} expects {} features but metadata lists {}",
                model_name, model.input_width(), metadata.features.len()
            )));
        }
        info!(model = model_name, path = %path.display(), "Model loaded");
        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_model() -> LinearModel {
        LinearModel {
            classes: vec!["safe".into(), "vulnerable".into()],
            weights: vec![vec![0.0, 0.0], vec![2.0, 1.0]],
            bias: vec![0.0, -1.0],
            mean: None,
            scale: None,
        }
    }

    #[test]
    fn test_predict_picks_highest_probability() {
        let m = binary_model();
        let p = m.predict(&[3.0, 0.0]).unwrap();
        assert_eq!(p.label, "vulnerable");
        assert!(p.confidence > 0.5);
        let total: f64 = p.probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let p = m.predict(&[0.0, 0.0]).unwrap();
        assert_eq!(p.label, "safe");
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        assert!(binary_model().predict(&[1.0]).is_err());
    }

    #[test]
    fn test_standardization_applied() {
        let mut m = binary_model();
        m.mean = Some(vec![3.0, 0.0]);
        m.scale = Some(vec![1.0, 0.0]);
        // Centered input is all zeros, so the bias decides
        let p = m.predict(&[3.0, 0.0]).unwrap();
        assert_eq!(p.label, "safe");
    }

    #[test]
    fn test_validate_rejects_shape_mismatch() {
        let mut m = binary_model();
        m.bias.pop();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_store_without_metadata_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::open(dir.path());
        assert!(store.metadata().is_none());
        assert!(store.feature_names().is_empty());
        let err = store.load_predictor("binary_classifier").err().unwrap();
        assert!(matches!(err, ContractBenchError::AdapterUnavailable(_)));
    }

    #[test]
    fn test_store_loads_relative_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"features":["a","b"],"models":{"binary_classifier":{"file":"binary.json"}}}"#,
        ).unwrap();
        std::fs::write(
            dir.path().join("binary.json"),
            serde_json::to_string(&binary_model()).unwrap(),
        ).unwrap();

        let store = ModelStore::open(dir.path());
        assert_eq!(store.feature_names(), &["a".to_string(), "b".to_string()]);
        let predictor = store.load_predictor("binary_classifier").unwrap();
        assert_eq!(predictor.classes().len(), 2);
    }

    #[test]
    fn test_info_reports_load_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"created_at":"2024-05-01","features":["a","b"],"models":{"binary_classifier":{"file":"binary.json"},"multiclass_classifier":{"file":"gone.json"}}}"#,
        ).unwrap();
        std::fs::write(
            dir.path().join("binary.json"),
            serde_json::to_string(&binary_model()).unwrap(),
        ).unwrap();

        let info = ModelStore::open(dir.path()).info();
        assert!(info.metadata_found);
        assert_eq!(info.created_at.as_deref(), Some("2024-05-01"));
        assert_eq!(info.features, vec!["a", "b"]);
        assert!(info.models["binary_classifier"].loaded);
        assert!(info.models["binary_classifier"].error.is_none());
        assert!(!info.models["multiclass_classifier"].loaded);
        assert!(info.models["multiclass_classifier"].error.as_deref().unwrap().contains("gone.json"));
    }

    #[test]
    fn test_info_without_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let info = ModelStore::open(dir.path()).info();
        assert!(!info.metadata_found);
        assert!(info.models.is_empty());
        assert!(info.created_at.is_none());
    }

    #[test]
    fn test_store_missing_artifact_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"features":["a"],"models":{"binary_classifier":{"file":"gone.json"}}}"#,
        ).unwrap();
        let store = ModelStore::open(dir.path());
        assert!(store.load_predictor("binary_classifier").is_err());
        assert!(store.load_predictor("multiclass_classifier").is_err());
    }
}
