use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::performance::ToolPerformance;

/// Aggregate of every tool's outcome on a single contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonResult {
    pub contract_name: String,
    pub contract_code: String,
    /// Known vulnerability types, used only for benchmarking.
    pub ground_truth: Option<Vec<String>>,
    pub tool_performances: BTreeMap<String, ToolPerformance>,
    pub consensus_findings: Vec<String>,
    pub unique_findings: BTreeMap<String, Vec<String>>,
    pub agreement_score: f64,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonResult {
    pub fn successful_tools(&self) -> impl Iterator<Item = &ToolPerformance> {
        self.tool_performances.values().filter(|p| p.success())
    }

    pub fn failed_tools(&self) -> impl Iterator<Item = &ToolPerformance> {
        self.tool_performances.values().filter(|p| !p.success())
    }

    /// True when ground truth was supplied and lists at least one type.
    pub fn is_labeled_vulnerable(&self) -> bool {
        self.ground_truth.as_ref().is_some_and(|g| !g.is_empty())
    }
}
