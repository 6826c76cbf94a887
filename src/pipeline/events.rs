/// Progress messages streamed from the orchestrator to a UI consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonEvent {
    /// A benchmark run over `total` contracts began
    BenchmarkStarted {
        total: usize,
        tools: Vec<String>,
    },
    /// Tools are about to run on a contract
    ContractStarted {
        contract: String,
    },
    /// One tool finished on a contract
    ToolFinished {
        contract: String,
        tool: String,
        success: bool,
        execution_time: f64,
    },
    /// All tools finished on a contract
    ContractCompleted {
        contract: String,
        agreement_score: f64,
        consensus_findings: usize,
    },
    /// Metrics were computed for every tool
    BenchmarkCompleted {
        contracts: usize,
    },
}
