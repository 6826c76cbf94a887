use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ContractBenchConfig;
use crate::errors::ContractBenchError;
use super::adapter::ToolAdapter;
use super::ai_binary::AiBinaryAdapter;
use super::ai_multiclass::AiMulticlassAdapter;
use super::external::ExternalAnalyzerAdapter;
use super::features::{FeatureExtractor, KeywordFeatureExtractor};
use super::model::ModelStore;
use tracing::{debug, info};

/// Insertion-ordered set of adapters keyed by tool name.
///
/// Built once at startup and shared behind an `Arc`; it is never mutated
/// after construction.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ToolAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self { adapters: Vec::new() }
    }

    /// Build the default tool set: both classifiers from the configured models
    /// directory, followed by every configured external analyzer.
    pub fn from_config(config: &ContractBenchConfig) -> Result<Self, ContractBenchError> {
        let extractor: Arc<dyn FeatureExtractor> = Arc::new(KeywordFeatureExtractor::new());
        Self::from_config_with_extractor(config, extractor)
    }

    pub fn from_config_with_extractor(
        config: &ContractBenchConfig,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Result<Self, ContractBenchError> {
        let models = config.models();
        let store = ModelStore::open(&models.directory);

        let mut registry = Self::new();
        registry.register(Arc::new(AiBinaryAdapter::from_store(
            &store, &models.binary, Arc::clone(&extractor),
        )))?;
        registry.register(Arc::new(AiMulticlassAdapter::from_store(
            &store, &models.multiclass, Arc::clone(&extractor),
        )))?;
        for tool in config.external_tools() {
            registry.register(Arc::new(ExternalAnalyzerAdapter::from_config(tool)))?;
        }

        info!(
            tools = ?registry.names(),
            available = registry.available_names().len(),
            "Tool registry initialized"
        );
        Ok(registry)
    }

    pub fn register(&mut self, adapter: Arc<dyn ToolAdapter>) -> Result<(), ContractBenchError> {
        if self.contains(adapter.name()) {
            return Err(ContractBenchError::Config(format!(
                "tool '{}' is registered twice", adapter.name()
            )));
        }
        self.adapters.push(adapter);
        Ok(())
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ToolAdapter>) -> Result<Self, ContractBenchError> {
        self.register(adapter)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolAdapter>> {
        self.adapters.iter().find(|a| a.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adapters.iter().any(|a| a.name() == name)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn all(&self) -> &[Arc<dyn ToolAdapter>] {
        &self.adapters
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Names of tools whose availability probe currently passes, in registration order.
    pub fn available_names(&self) -> Vec<String> {
        self.adapters
            .iter()
            .filter(|a| a.is_available())
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Point-in-time copy of every tool's availability.
    pub fn availability(&self) -> BTreeMap<String, bool> {
        self.adapters
            .iter()
            .map(|a| (a.name().to_string(), a.is_available()))
            .collect()
    }

    /// Re-probe every tool and log the result.
    pub fn refresh_availability(&self) -> BTreeMap<String, bool> {
        let snapshot = self.availability();
        for (tool, available) in &snapshot {
            debug!(tool = %tool, available, "Availability probed");
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::adapters::adapter::ToolKind;
    use crate::models::finding::Finding;

    struct Stub {
        name: &'static str,
        available: bool,
    }

    #[async_trait]
    impl ToolAdapter for Stub {
        fn name(&self) -> &str { self.name }
        fn kind(&self) -> ToolKind { ToolKind::ExternalProcess }
        fn is_available(&self) -> bool { self.available }
        async fn analyze(&self, _: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
            Ok(Vec::new())
        }
    }

    fn registry() -> AdapterRegistry {
        AdapterRegistry::new()
            .with_adapter(Arc::new(Stub { name: "zeta", available: true })).unwrap()
            .with_adapter(Arc::new(Stub { name: "alpha", available: false })).unwrap()
            .with_adapter(Arc::new(Stub { name: "mid", available: true })).unwrap()
    }

    #[test]
    fn test_names_keep_registration_order() {
        assert_eq!(registry().names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry().available_names(), vec!["zeta", "mid"]);
    }

    #[test]
    fn test_availability_snapshot() {
        let snapshot = registry().availability();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["alpha"], false);
        assert_eq!(snapshot["zeta"], true);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut r = registry();
        let err = r.register(Arc::new(Stub { name: "mid", available: true })).unwrap_err();
        assert!(matches!(err, ContractBenchError::Config(_)));
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let r = registry();
        assert!(r.get("alpha").is_some());
        assert!(r.get("omega").is_none());
        assert!(r.contains("zeta"));
    }

    #[test]
    fn test_from_config_without_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ContractBenchConfig::default();
        config.models.get_or_insert_with(Default::default).directory = Some(dir.path().to_path_buf());
        let r = AdapterRegistry::from_config(&config).unwrap();
        assert_eq!(r.names(), vec!["ai_binary", "ai_multiclass"]);
        assert!(r.available_names().is_empty());
    }
}
