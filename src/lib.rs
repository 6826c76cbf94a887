pub mod adapters;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod reporting;

#[cfg(feature = "cli")]
pub mod cli;

pub use adapters::{AdapterRegistry, ToolAdapter, ToolKind};
pub use errors::ContractBenchError;
pub use models::{BenchmarkMetrics, ComparisonResult, ContractSample, Finding, Severity, ToolPerformance};
pub use pipeline::{AnalysisSettings, ComparisonOrchestrator};
pub use reporting::ExportFormat;

/// Version string with the embedded git hash and build time.
pub fn build_info() -> String {
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");
    format!("{} ({}, built {})", env!("CARGO_PKG_VERSION"), git_hash, build_ts)
}
