use std::collections::{BTreeMap, BTreeSet};

use crate::models::{BenchmarkMetrics, ComparisonResult, ConfusionMatrix};

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Supervised metrics for `tool_name` over labeled comparison results.
///
/// Only successful runs enter the confusion matrix and the per-type detection
/// rates; a type seen only where the tool failed has no rate. `success_rate`
/// is taken over every result passed in.
pub fn compute_metrics(tool_name: &str, results: &[ComparisonResult]) -> BenchmarkMetrics {
    let mut confusion = ConfusionMatrix::default();
    let mut successful = 0usize;
    let mut total_time = 0.0;
    // type -> (detected, present)
    let mut per_type: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for result in results {
        let Some(perf) = result.tool_performances.get(tool_name) else {
            continue;
        };
        let truth: BTreeSet<&str> = result
            .ground_truth
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if !perf.success() {
            continue;
        }
        successful += 1;
        total_time += perf.execution_time();

        let detected = perf.vulnerability_types();
        confusion.record(!truth.is_empty(), !detected.is_empty());

        for t in &truth {
            let entry = per_type.entry(t.to_string()).or_insert((0, 0));
            entry.1 += 1;
            if detected.contains(t) {
                entry.0 += 1;
            }
        }
    }

    let tp = confusion.true_positives;
    let fp = confusion.false_positives;
    let tn = confusion.true_negatives;
    let fn_ = confusion.false_negatives;

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    let vulnerability_detection_rates = per_type
        .into_iter()
        .map(|(t, (hit, seen))| (t, ratio(hit, seen)))
        .collect();

    BenchmarkMetrics {
        tool_name: tool_name.to_string(),
        accuracy: ratio(tp + tn, confusion.evaluated()),
        precision,
        recall,
        f1_score,
        false_positive_rate: ratio(fp, fp + tn),
        false_negative_rate: ratio(fn_, fn_ + tp),
        avg_execution_time: if successful == 0 { 0.0 } else { total_time / successful as f64 },
        success_rate: ratio(successful, results.len()),
        vulnerability_detection_rates,
        confusion,
    }
}
