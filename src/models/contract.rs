use serde::{Deserialize, Serialize};

/// A labeled contract used as benchmark input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSample {
    pub name: String,
    pub code: String,
    /// Ground-truth vulnerability types; empty means the contract is safe.
    #[serde(default)]
    pub vulnerabilities: Vec<String>,
}

impl ContractSample {
    pub fn new(name: &str, code: &str, vulnerabilities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            vulnerabilities: vulnerabilities.iter().map(|v| v.to_string()).collect(),
        }
    }
}
