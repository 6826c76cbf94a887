use std::collections::BTreeMap;

use crate::models::{BenchmarkMetrics, ComparisonResult, Severity};
use crate::pipeline::consensus::consensus_threshold;

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn format_comparison_summary(result: &ComparisonResult) -> String {
    let successful = result.successful_tools().count();
    let mut out = format!(
        "## Comparison: {}\n\n- Tools run: {} ({} succeeded)\n- Agreement score: {:.3}\n- Consensus (threshold {}): {}\n",
        result.contract_name,
        result.tool_performances.len(),
        successful,
        result.agreement_score,
        consensus_threshold(successful),
        list_or_none(&result.consensus_findings),
    );
    if let Some(truth) = &result.ground_truth {
        out.push_str(&format!("- Ground truth: {}\n", list_or_none(truth)));
    }

    out.push_str("\n| Tool | Status | Time (s) | Findings | Critical | High | Medium | Low |\n|---|---|---|---|---|---|---|---|\n");
    for (name, perf) in &result.tool_performances {
        let status = if perf.success() { "ok" } else { "failed" };
        let dist = perf.severity_distribution();
        let count = |s: Severity| dist.get(&s).copied().unwrap_or(0);
        out.push_str(&format!(
            "| {} | {} | {:.3} | {} | {} | {} | {} | {} |\n",
            name,
            status,
            perf.execution_time(),
            perf.findings_count(),
            count(Severity::Critical),
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        ));
    }

    let errors: Vec<String> = result
        .failed_tools()
        .filter_map(|p| p.error_message().map(|e| format!("- {}: {}", p.tool_name(), e)))
        .collect();
    if !errors.is_empty() {
        out.push_str("\n### Errors\n\n");
        out.push_str(&errors.join("\n"));
        out.push('\n');
    }

    if !result.unique_findings.is_empty() {
        out.push_str("\n### Unique findings\n\n");
        for (tool, types) in &result.unique_findings {
            out.push_str(&format!("- {}: {}\n", tool, list_or_none(types)));
        }
    }
    out
}

pub fn format_benchmark_table(metrics: &BTreeMap<String, BenchmarkMetrics>) -> String {
    let mut out = String::from(
        "| Tool | Accuracy | Precision | Recall | F1 | FPR | FNR | Avg time (s) | Success |\n|---|---|---|---|---|---|---|---|---|\n",
    );
    for m in metrics.values() {
        out.push_str(&format!(
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.0}% |\n",
            m.tool_name,
            m.accuracy,
            m.precision,
            m.recall,
            m.f1_score,
            m.false_positive_rate,
            m.false_negative_rate,
            m.avg_execution_time,
            m.success_rate * 100.0,
        ));
    }
    out
}

/// Per-type detection rates, one section per tool.
pub fn format_detection_rates(metrics: &BTreeMap<String, BenchmarkMetrics>) -> String {
    let mut out = String::new();
    for m in metrics.values() {
        if m.vulnerability_detection_rates.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", m.tool_name));
        for (vuln, rate) in &m.vulnerability_detection_rates {
            out.push_str(&format!("- {}: {:.0}%\n", vuln, rate * 100.0));
        }
        out.push('\n');
    }
    out
}
