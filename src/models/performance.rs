use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use super::finding::{Finding, Severity};
use crate::errors::ContractBenchError;

/// Outcome of running a single tool against one contract.
///
/// `error_message` is present (and non-empty) exactly when `success` is false,
/// and an unsuccessful run never carries findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ToolPerformanceRecord", try_from = "ToolPerformanceRecord")]
pub struct ToolPerformance {
    tool_name: String,
    execution_time: f64,
    success: bool,
    findings: Vec<Finding>,
    severity_distribution: BTreeMap<Severity, usize>,
    error_message: Option<String>,
}

impl ToolPerformance {
    pub fn succeeded(tool_name: &str, elapsed: Duration, findings: Vec<Finding>) -> Self {
        let severity_distribution = severity_counts(&findings);
        Self {
            tool_name: tool_name.to_string(),
            execution_time: elapsed.as_secs_f64(),
            success: true,
            findings,
            severity_distribution,
            error_message: None,
        }
    }

    pub fn failed(tool_name: &str, elapsed: Duration, error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };
        Self {
            tool_name: tool_name.to_string(),
            execution_time: elapsed.as_secs_f64(),
            success: false,
            findings: Vec::new(),
            severity_distribution: BTreeMap::new(),
            error_message: Some(error),
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Wall-clock seconds spent in the tool.
    pub fn execution_time(&self) -> f64 {
        self.execution_time
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn findings_count(&self) -> usize {
        self.findings.len()
    }

    pub fn severity_distribution(&self) -> &BTreeMap<Severity, usize> {
        &self.severity_distribution
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Distinct vulnerability types reported by this tool.
    pub fn vulnerability_types(&self) -> BTreeSet<&str> {
        self.findings.iter().map(|f| f.vulnerability_type()).collect()
    }

    /// Vulnerability types in report order, duplicates kept.
    pub fn vulnerabilities_found(&self) -> Vec<String> {
        self.findings.iter().map(|f| f.vulnerability_type().to_string()).collect()
    }
}

fn severity_counts(findings: &[Finding]) -> BTreeMap<Severity, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.severity()).or_insert(0) += 1;
    }
    counts
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolPerformanceRecord {
    tool_name: String,
    execution_time: f64,
    success: bool,
    #[serde(default)]
    findings_count: usize,
    #[serde(default)]
    vulnerabilities_found: Vec<String>,
    #[serde(default)]
    findings: Vec<Finding>,
    #[serde(default)]
    severity_distribution: BTreeMap<Severity, usize>,
    #[serde(default)]
    error_message: Option<String>,
}

impl From<ToolPerformance> for ToolPerformanceRecord {
    fn from(perf: ToolPerformance) -> Self {
        Self {
            findings_count: perf.findings_count(),
            vulnerabilities_found: perf.vulnerabilities_found(),
            tool_name: perf.tool_name,
            execution_time: perf.execution_time,
            success: perf.success,
            findings: perf.findings,
            severity_distribution: perf.severity_distribution,
            error_message: perf.error_message,
        }
    }
}

impl TryFrom<ToolPerformanceRecord> for ToolPerformance {
    type Error = ContractBenchError;

    fn try_from(record: ToolPerformanceRecord) -> Result<Self, Self::Error> {
        if !record.execution_time.is_finite() || record.execution_time < 0.0 {
            return Err(ContractBenchError::InvalidRecord(format!(
                "{}: execution_time must be a non-negative number", record.tool_name
            )));
        }
        let has_error = record.error_message.as_deref().is_some_and(|e| !e.trim().is_empty());
        if record.success == has_error {
            return Err(ContractBenchError::InvalidRecord(format!(
                "{}: error_message must be present exactly when success is false", record.tool_name
            )));
        }
        if !record.success && !record.findings.is_empty() {
            return Err(ContractBenchError::InvalidRecord(format!(
                "{}: failed run cannot carry findings", record.tool_name
            )));
        }

        // Derived fields are recomputed from the findings themselves.
        Ok(Self {
            severity_distribution: severity_counts(&record.findings),
            tool_name: record.tool_name,
            execution_time: record.execution_time,
            success: record.success,
            findings: record.findings,
            error_message: record.error_message,
        })
    }
}
