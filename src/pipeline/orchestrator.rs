use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::adapters::{AdapterRegistry, ToolAdapter};
use crate::errors::ContractBenchError;
use crate::models::finding::normalize_type;
use crate::models::{BenchmarkMetrics, ComparisonResult, ContractSample, ToolPerformance};
use crate::reporting::export::{self, ExportFormat};
use super::consensus;
use super::events::ComparisonEvent;
use super::metrics::compute_metrics;
use super::recorder::PerformanceRecorder;
use super::state::AnalysisSettings;

/// Runs tool subsets against contracts and keeps the run history.
///
/// The orchestrator is the only writer of its history. Readers get
/// point-in-time snapshots of `Arc`ed results.
pub struct ComparisonOrchestrator {
    registry: Arc<AdapterRegistry>,
    settings: AnalysisSettings,
    recorder: PerformanceRecorder,
    history: Arc<RwLock<Vec<Arc<ComparisonResult>>>>,
    event_tx: Option<mpsc::UnboundedSender<ComparisonEvent>>,
}

impl ComparisonOrchestrator {
    pub fn new(registry: Arc<AdapterRegistry>, settings: AnalysisSettings) -> Self {
        let settings = AnalysisSettings::new(settings.timeout, settings.max_concurrency);
        Self {
            registry,
            recorder: PerformanceRecorder::new(settings.timeout),
            settings,
            history: Arc::new(RwLock::new(Vec::new())),
            event_tx: None,
        }
    }

    /// Attach an event channel for streaming progress to a UI consumer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<ComparisonEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: ComparisonEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    pub fn get_available_tools(&self) -> BTreeMap<String, bool> {
        self.registry.refresh_availability()
    }

    /// Map a requested subset onto adapters. `None` selects every tool whose
    /// availability probe passes right now.
    fn resolve_tools(&self, tools: Option<&[String]>) -> Result<Vec<Arc<dyn ToolAdapter>>, ContractBenchError> {
        let Some(requested) = tools else {
            return Ok(self
                .registry
                .all()
                .iter()
                .filter(|a| a.is_available())
                .cloned()
                .collect());
        };

        let unknown: Vec<&str> = requested
            .iter()
            .map(String::as_str)
            .filter(|name| !self.registry.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(ContractBenchError::Config(format!(
                "Unknown tool(s): {} (registered: {})",
                unknown.join(", "),
                self.registry.names().join(", ")
            )));
        }

        let mut seen = HashSet::new();
        Ok(requested
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| self.registry.get(name))
            .collect())
    }

    pub async fn compare_tools(
        &self,
        source: &str,
        contract_name: &str,
        ground_truth: Option<Vec<String>>,
        tools: Option<&[String]>,
    ) -> Result<ComparisonResult, ContractBenchError> {
        let adapters = self.resolve_tools(tools)?;
        let result = self.run_comparison(&adapters, source, contract_name, ground_truth).await;
        Ok(result.as_ref().clone())
    }

    async fn run_comparison(
        &self,
        adapters: &[Arc<dyn ToolAdapter>],
        source: &str,
        contract_name: &str,
        ground_truth: Option<Vec<String>>,
    ) -> Arc<ComparisonResult> {
        if adapters.is_empty() {
            warn!(contract = %contract_name, "No tools selected, comparison will be empty");
        }
        self.emit(ComparisonEvent::ContractStarted { contract: contract_name.to_string() });

        let recorder = &self.recorder;
        let tasks: Vec<_> = adapters
            .iter()
            .map(|adapter| async move {
                let perf = recorder.record(adapter.as_ref(), source, contract_name).await;
                self.emit(ComparisonEvent::ToolFinished {
                    contract: contract_name.to_string(),
                    tool: perf.tool_name().to_string(),
                    success: perf.success(),
                    execution_time: perf.execution_time(),
                });
                perf
            })
            .collect();
        let performances: Vec<ToolPerformance> = stream::iter(tasks)
            .buffer_unordered(self.settings.max_concurrency)
            .collect()
            .await;

        let tool_performances: BTreeMap<String, ToolPerformance> = performances
            .into_iter()
            .map(|p| (p.tool_name().to_string(), p))
            .collect();
        let summary = consensus::analyze(&tool_performances);

        let result = Arc::new(ComparisonResult {
            contract_name: contract_name.to_string(),
            contract_code: source.to_string(),
            ground_truth: ground_truth.map(normalize_ground_truth),
            tool_performances,
            consensus_findings: summary.consensus_findings,
            unique_findings: summary.unique_findings,
            agreement_score: summary.agreement_score,
            timestamp: Utc::now(),
        });

        info!(
            contract = %contract_name,
            tools = result.tool_performances.len(),
            succeeded = result.successful_tools().count(),
            agreement = result.agreement_score,
            consensus = result.consensus_findings.len(),
            "Comparison complete"
        );
        self.emit(ComparisonEvent::ContractCompleted {
            contract: contract_name.to_string(),
            agreement_score: result.agreement_score,
            consensus_findings: result.consensus_findings.len(),
        });

        self.history.write().await.push(Arc::clone(&result));
        result
    }

    /// Compare every contract, then compute metrics per selected tool from
    /// this run's results only.
    pub async fn benchmark_tools(
        &self,
        contracts: &[ContractSample],
        tools: Option<&[String]>,
    ) -> Result<BTreeMap<String, BenchmarkMetrics>, ContractBenchError> {
        let adapters = self.resolve_tools(tools)?;
        let tool_names: Vec<String> = adapters.iter().map(|a| a.name().to_string()).collect();
        info!(contracts = contracts.len(), tools = ?tool_names, "Benchmark started");
        self.emit(ComparisonEvent::BenchmarkStarted {
            total: contracts.len(),
            tools: tool_names.clone(),
        });

        let mut results = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let result = self
                .run_comparison(&adapters, &contract.code, &contract.name, Some(contract.vulnerabilities.clone()))
                .await;
            results.push(result.as_ref().clone());
        }

        let metrics: BTreeMap<String, BenchmarkMetrics> = tool_names
            .iter()
            .map(|name| (name.clone(), compute_metrics(name, &results)))
            .collect();

        for m in metrics.values() {
            info!(
                tool = %m.tool_name,
                accuracy = m.accuracy,
                f1 = m.f1_score,
                success_rate = m.success_rate,
                "Benchmark metrics"
            );
        }
        self.emit(ComparisonEvent::BenchmarkCompleted { contracts: contracts.len() });
        Ok(metrics)
    }

    /// Export a snapshot of the history. Returns the number of records (JSON)
    /// or data rows (CSV) written.
    pub async fn export_results(&self, destination: &Path, format: ExportFormat) -> Result<usize, ContractBenchError> {
        let snapshot = self.history().await;
        let written = export::export(&snapshot, destination, format).await?;
        info!(path = %destination.display(), format = %format, records = written, "Exported results");
        Ok(written)
    }

    pub async fn history(&self) -> Vec<Arc<ComparisonResult>> {
        self.history.read().await.clone()
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}

fn normalize_ground_truth(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|t| normalize_type(t))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
