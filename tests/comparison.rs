use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contract_bench::adapters::{AdapterRegistry, ToolAdapter, ToolKind};
use contract_bench::errors::ContractBenchError;
use contract_bench::models::{ContractSample, Finding, Severity};
use contract_bench::pipeline::{AnalysisSettings, ComparisonOrchestrator};

/// Reports a vulnerability type whenever its keyword appears in the source.
struct KeywordTool {
    name: &'static str,
    rules: Vec<(&'static str, &'static str)>,
}

#[async_trait]
impl ToolAdapter for KeywordTool {
    fn name(&self) -> &str { self.name }
    fn kind(&self) -> ToolKind { ToolKind::ExternalProcess }
    fn is_available(&self) -> bool { true }
    async fn analyze(&self, source: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
        self.rules
            .iter()
            .filter(|(keyword, _)| source.contains(keyword))
            .map(|(_, vuln)| Finding::new(self.name, vuln, Severity::High, 0.9))
            .collect()
    }
}

struct BrokenTool;

#[async_trait]
impl ToolAdapter for BrokenTool {
    fn name(&self) -> &str { "broken" }
    fn kind(&self) -> ToolKind { ToolKind::ExternalProcess }
    fn is_available(&self) -> bool { true }
    async fn analyze(&self, _: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
        Err(ContractBenchError::AdapterExecution("segfault".into()))
    }
}

struct PanickingTool;

#[async_trait]
impl ToolAdapter for PanickingTool {
    fn name(&self) -> &str { "panicky" }
    fn kind(&self) -> ToolKind { ToolKind::AiModel }
    fn is_available(&self) -> bool { true }
    async fn analyze(&self, _: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
        panic!("index out of bounds")
    }
}

struct SlowTool;

#[async_trait]
impl ToolAdapter for SlowTool {
    fn name(&self) -> &str { "slow" }
    fn kind(&self) -> ToolKind { ToolKind::ExternalProcess }
    fn is_available(&self) -> bool { true }
    async fn analyze(&self, _: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

struct OfflineTool {
    calls: AtomicUsize,
}

#[async_trait]
impl ToolAdapter for OfflineTool {
    fn name(&self) -> &str { "offline" }
    fn kind(&self) -> ToolKind { ToolKind::ExternalProcess }
    fn is_available(&self) -> bool { false }
    async fn analyze(&self, _: &str, _: &str) -> Result<Vec<Finding>, ContractBenchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

fn alpha() -> Arc<dyn ToolAdapter> {
    Arc::new(KeywordTool { name: "alpha", rules: vec![(".call", "reentrancy")] })
}

fn beta() -> Arc<dyn ToolAdapter> {
    Arc::new(KeywordTool {
        name: "beta",
        rules: vec![(".call", "reentrancy"), ("block.timestamp", "bad_randomness")],
    })
}

fn settings(concurrency: usize) -> AnalysisSettings {
    AnalysisSettings::new(Duration::from_millis(200), concurrency)
}

fn orchestrator(adapters: Vec<Arc<dyn ToolAdapter>>, concurrency: usize) -> ComparisonOrchestrator {
    let mut registry = AdapterRegistry::new();
    for adapter in adapters {
        registry.register(adapter).unwrap();
    }
    ComparisonOrchestrator::new(Arc::new(registry), settings(concurrency))
}

const VULNERABLE: &str = "contract V { function w() public { msg.sender.call{value: 1}(\"\"); uint seed = block.timestamp; } }";
const CLEAN: &str = "contract C { function f() public pure returns (uint) { return 1; } }";

#[tokio::test]
async fn test_clean_contract_all_tools_agree() {
    let orch = orchestrator(vec![alpha(), beta()], 4);
    let result = orch.compare_tools(CLEAN, "Clean", None, None).await.unwrap();
    assert!(result.consensus_findings.is_empty());
    assert_eq!(result.agreement_score, 1.0);
    assert!(result.unique_findings.values().all(|u| u.is_empty()));
}

#[tokio::test]
async fn test_partial_overlap_consensus_and_unique() {
    let orch = orchestrator(vec![alpha(), beta()], 4);
    let result = orch.compare_tools(VULNERABLE, "V", None, None).await.unwrap();
    assert_eq!(result.consensus_findings, vec!["reentrancy"]);
    assert!(result.unique_findings["alpha"].is_empty());
    assert_eq!(result.unique_findings["beta"], vec!["bad_randomness"]);
    assert!((result.agreement_score - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let orch = orchestrator(
        vec![alpha(), beta(), Arc::new(BrokenTool), Arc::new(PanickingTool), Arc::new(SlowTool)],
        4,
    );
    let result = orch.compare_tools(VULNERABLE, "V", None, None).await.unwrap();

    assert_eq!(result.tool_performances.len(), 5);
    for name in ["broken", "panicky", "slow"] {
        let perf = &result.tool_performances[name];
        assert!(!perf.success(), "{} should fail", name);
        assert!(perf.findings().is_empty());
        assert!(perf.severity_distribution().is_empty());
        assert!(!perf.error_message().unwrap().is_empty());
    }
    assert_eq!(result.tool_performances["slow"].error_message(), Some("Timed out after 0.2s"));
    assert!(result.tool_performances["panicky"].error_message().unwrap().contains("index out of bounds"));

    // Failed tools do not influence the cross-tool view.
    assert_eq!(result.consensus_findings, vec!["reentrancy"]);
    assert!((result.agreement_score - 0.5).abs() < 1e-9);
    assert!(!result.unique_findings.contains_key("broken"));
}

#[tokio::test]
async fn test_sequential_matches_concurrent() {
    let sequential = orchestrator(vec![alpha(), beta()], 1);
    let concurrent = orchestrator(vec![alpha(), beta()], 8);
    let a = sequential.compare_tools(VULNERABLE, "V", None, None).await.unwrap();
    let b = concurrent.compare_tools(VULNERABLE, "V", None, None).await.unwrap();
    assert_eq!(a.consensus_findings, b.consensus_findings);
    assert_eq!(a.unique_findings, b.unique_findings);
    assert_eq!(a.agreement_score, b.agreement_score);
    assert_eq!(
        a.tool_performances.keys().collect::<Vec<_>>(),
        b.tool_performances.keys().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_default_subset_skips_unavailable_tools() {
    let offline = Arc::new(OfflineTool { calls: AtomicUsize::new(0) });
    let orch = orchestrator(vec![alpha(), offline.clone()], 2);

    let result = orch.compare_tools(CLEAN, "C", None, None).await.unwrap();
    assert_eq!(result.tool_performances.keys().collect::<Vec<_>>(), vec!["alpha"]);

    let requested = vec!["alpha".to_string(), "offline".to_string()];
    let result = orch.compare_tools(CLEAN, "C", None, Some(&requested)).await.unwrap();
    let perf = &result.tool_performances["offline"];
    assert!(!perf.success());
    assert_eq!(perf.execution_time(), 0.0);
    assert_eq!(offline.calls.load(Ordering::SeqCst), 0);

    let availability = orch.get_available_tools();
    assert_eq!(availability, BTreeMap::from([("alpha".to_string(), true), ("offline".to_string(), false)]));
}

#[tokio::test]
async fn test_history_is_append_only_snapshot() {
    let orch = orchestrator(vec![alpha()], 1);
    orch.compare_tools(CLEAN, "first", None, None).await.unwrap();
    let snapshot = orch.history().await;
    orch.compare_tools(CLEAN, "second", None, None).await.unwrap();

    assert_eq!(snapshot.len(), 1);
    let names: Vec<String> = orch.history().await.iter().map(|r| r.contract_name.clone()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_keep_every_result() {
    let orch = Arc::new(orchestrator(vec![alpha(), beta()], 2));
    let names: Vec<String> = (0..32).map(|i| format!("contract-{i}")).collect();

    let calls = names.iter().map(|name| {
        let orch = Arc::clone(&orch);
        let name = name.clone();
        tokio::spawn(async move { orch.compare_tools(VULNERABLE, &name, None, None).await })
    });
    for joined in futures::future::join_all(calls).await {
        joined.unwrap().unwrap();
    }

    assert_eq!(orch.history_len().await, 32);
    let mut recorded: Vec<String> = orch.history().await.iter().map(|r| r.contract_name.clone()).collect();
    recorded.sort();
    let mut expected = names.clone();
    expected.sort();
    assert_eq!(recorded, expected);
}

#[tokio::test]
async fn test_benchmark_perfect_detector() {
    let detector: Arc<dyn ToolAdapter> = Arc::new(KeywordTool { name: "detector", rules: vec![("selfdestruct", "access_control")] });
    let orch = orchestrator(vec![detector, Arc::new(BrokenTool)], 2);
    let contracts = vec![
        ContractSample::new("kill1", "contract A { function k() public { selfdestruct(payable(msg.sender)); } }", &["access_control"]),
        ContractSample::new("kill2", "contract B { function k() external { selfdestruct(payable(owner)); } }", &["access_control"]),
        ContractSample::new("safe1", CLEAN, &[]),
        ContractSample::new("safe2", "contract D {}", &[]),
    ];

    let metrics = orch.benchmark_tools(&contracts, None).await.unwrap();
    assert_eq!(metrics.keys().collect::<Vec<_>>(), vec!["broken", "detector"]);

    let m = &metrics["detector"];
    assert_eq!(m.accuracy, 1.0);
    assert_eq!(m.precision, 1.0);
    assert_eq!(m.recall, 1.0);
    assert_eq!(m.false_positive_rate, 0.0);
    assert_eq!(m.false_negative_rate, 0.0);
    assert_eq!(m.success_rate, 1.0);
    assert_eq!(m.vulnerability_detection_rates["access_control"], 1.0);

    let b = &metrics["broken"];
    assert_eq!(b.success_rate, 0.0);
    assert_eq!(b.accuracy, 0.0);
    assert_eq!(b.avg_execution_time, 0.0);
    // Never evaluated, so no per-type rate rather than a 0.0 miss rate.
    assert!(b.vulnerability_detection_rates.is_empty());

    assert_eq!(orch.history_len().await, 4);
}

#[tokio::test]
async fn test_benchmark_rejects_unknown_tool() {
    let orch = orchestrator(vec![alpha()], 1);
    let contracts = vec![ContractSample::new("c", CLEAN, &[])];
    let tools = vec!["slither".to_string()];
    let err = orch.benchmark_tools(&contracts, Some(&tools)).await.unwrap_err();
    assert_eq!(err.classify().error_type, "ConfigurationError");
    assert_eq!(orch.history_len().await, 0);
}
