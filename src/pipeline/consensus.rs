use std::collections::{BTreeMap, BTreeSet};

use crate::models::ToolPerformance;

/// Cross-tool view of one contract's results.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusSummary {
    pub consensus_findings: Vec<String>,
    pub unique_findings: BTreeMap<String, Vec<String>>,
    pub agreement_score: f64,
}

/// Minimum number of agreeing tools for a type to reach consensus.
pub fn consensus_threshold(successful_tools: usize) -> usize {
    std::cmp::max(2, successful_tools / 2)
}

fn successful_type_sets(
    performances: &BTreeMap<String, ToolPerformance>,
) -> BTreeMap<&str, BTreeSet<&str>> {
    performances
        .iter()
        .filter(|(_, p)| p.success())
        .map(|(name, p)| (name.as_str(), p.vulnerability_types()))
        .collect()
}

pub fn find_consensus(performances: &BTreeMap<String, ToolPerformance>) -> Vec<String> {
    let sets = successful_type_sets(performances);
    let threshold = consensus_threshold(sets.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for types in sets.values() {
        for t in types {
            *counts.entry(*t).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, n)| *n >= threshold)
        .map(|(t, _)| t.to_string())
        .collect()
}

pub fn find_unique_findings(
    performances: &BTreeMap<String, ToolPerformance>,
) -> BTreeMap<String, Vec<String>> {
    let sets = successful_type_sets(performances);

    sets.iter()
        .map(|(tool, types)| {
            let others: BTreeSet<&str> = sets
                .iter()
                .filter(|(other, _)| *other != tool)
                .flat_map(|(_, s)| s.iter().copied())
                .collect();
            let unique: Vec<String> = types
                .difference(&others)
                .map(|t| t.to_string())
                .collect();
            (tool.to_string(), unique)
        })
        .collect()
}

/// Mean pairwise Jaccard similarity of finding-type sets over successful tools.
pub fn agreement_score(performances: &BTreeMap<String, ToolPerformance>) -> f64 {
    let sets: Vec<BTreeSet<&str>> = successful_type_sets(performances).into_values().collect();
    if sets.len() < 2 {
        return 0.0;
    }
    if sets.iter().all(|s| s.is_empty()) {
        return 1.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            let union = a.union(b).count();
            total += if union == 0 {
                1.0
            } else {
                a.intersection(b).count() as f64 / union as f64
            };
            pairs += 1;
        }
    }
    total / pairs as f64
}

pub fn analyze(performances: &BTreeMap<String, ToolPerformance>) -> ConsensusSummary {
    ConsensusSummary {
        consensus_findings: find_consensus(performances),
        unique_findings: find_unique_findings(performances),
        agreement_score: agreement_score(performances),
    }
}
