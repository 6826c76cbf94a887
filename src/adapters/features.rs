use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Turns contract source into named numeric features.
///
/// Implementations must be deterministic and side-effect free.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, source: &str) -> BTreeMap<String, f64>;
}

static EXTERNAL_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.call\s*[({]").unwrap());
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"block\.timestamp|\bnow\b").unwrap());
static FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfunction\s+([A-Za-z_][A-Za-z0-9_]*)?").unwrap());
static DANGEROUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(selfdestruct|delegatecall)\b").unwrap());
static MODIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bmodifier\s").unwrap());
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brequire\s*\(").unwrap());
static LOOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(for|while)\s*\(").unwrap());
static BRANCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bif\s*\(").unwrap());

/// Keyword-count features matching the layout the bundled models were trained on.
#[derive(Debug, Default, Clone)]
pub struct KeywordFeatureExtractor;

impl KeywordFeatureExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureExtractor for KeywordFeatureExtractor {
    fn extract(&self, source: &str) -> BTreeMap<String, f64> {
        let external_calls = EXTERNAL_CALL.find_iter(source).count();
        let loops = LOOP.find_iter(source).count();
        let branches = BRANCH.find_iter(source).count();

        let public_functions = FUNCTION
            .captures_iter(source)
            .filter(|c| !c.get(1).is_some_and(|name| name.as_str().starts_with('_')))
            .count();

        let mut features = BTreeMap::new();
        features.insert("external_call_count".to_string(), external_calls as f64);
        features.insert("state_change_after_call".to_string(), bool_feature(state_change_after_call(source)));
        features.insert("uses_block_timestamp".to_string(), bool_feature(TIMESTAMP.is_match(source)));
        features.insert("public_function_count".to_string(), public_functions as f64);
        features.insert("payable_function_count".to_string(), source.matches("payable").count() as f64);
        features.insert("dangerous_function_count".to_string(), DANGEROUS.find_iter(source).count() as f64);
        features.insert("modifier_count".to_string(), MODIFIER.find_iter(source).count() as f64);
        features.insert("require_count".to_string(), REQUIRE.find_iter(source).count() as f64);
        features.insert("loop_count".to_string(), loops as f64);
        features.insert("cyclomatic_complexity".to_string(), (branches + loops + 1) as f64);
        features
    }
}

fn bool_feature(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// An assignment within 100 characters after the last low-level call.
fn state_change_after_call(source: &str) -> bool {
    match source.rfind(".call") {
        Some(idx) => source[idx + ".call".len()..].chars().take(100).any(|c| c == '='),
        None => false,
    }
}

/// Order features by the model's expected layout; missing names become 0.
pub fn feature_vector(features: &BTreeMap<String, f64>, names: &[String]) -> Vec<f64> {
    names.iter().map(|n| features.get(n).copied().unwrap_or(0.0)).collect()
}
