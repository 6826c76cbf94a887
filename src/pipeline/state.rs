use std::time::Duration;

use crate::config::types::{DEFAULT_MAX_CONCURRENCY, DEFAULT_TIMEOUT_SECS};

/// Runtime knobs for one orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Upper bound on a single tool invocation.
    pub timeout: Duration,
    /// Tools run concurrently per contract; 1 means sequential.
    pub max_concurrency: usize,
}

impl AnalysisSettings {
    pub fn new(timeout: Duration, max_concurrency: usize) -> Self {
        Self { timeout, max_concurrency: max_concurrency.max(1) }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
