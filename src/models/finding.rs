use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use crate::errors::ContractBenchError;

/// Severity level for a finding, ordered Critical > High > Medium > Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Parse a severity label as reported by an external analyzer.
    /// Informational levels collapse into `Low`.
    pub fn parse(label: &str) -> Option<Severity> {
        match label.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" | "moderate" => Some(Severity::Medium),
            "low" | "informational" | "info" | "optimization" | "note" => Some(Severity::Low),
            _ => None,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        other.rank().cmp(&self.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// One normalized vulnerability report from a single tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FindingRecord")]
pub struct Finding {
    vulnerability_type: String,
    severity: Severity,
    confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<SourceLocation>,
    description: String,
    recommendation: String,
    tool: String,
}

impl Finding {
    /// Build a finding, normalizing the type tag to trimmed lowercase.
    pub fn new(
        tool: &str,
        vulnerability_type: &str,
        severity: Severity,
        confidence: f64,
    ) -> Result<Self, ContractBenchError> {
        let vulnerability_type = normalize_type(vulnerability_type);
        if vulnerability_type.is_empty() {
            return Err(ContractBenchError::InvalidRecord(
                format!("finding from {} has an empty vulnerability type", tool)
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ContractBenchError::InvalidRecord(format!(
                "confidence {} for {} is outside [0, 1]",
                confidence, vulnerability_type
            )));
        }
        Ok(Self {
            vulnerability_type,
            severity,
            confidence,
            location: None,
            description: String::new(),
            recommendation: String::new(),
            tool: tool.to_string(),
        })
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    pub fn vulnerability_type(&self) -> &str {
        &self.vulnerability_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }
}

pub(crate) fn normalize_type(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FindingRecord {
    vulnerability_type: String,
    severity: Severity,
    confidence: f64,
    #[serde(default)]
    location: Option<SourceLocation>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    recommendation: String,
    tool: String,
}

impl TryFrom<FindingRecord> for Finding {
    type Error = ContractBenchError;

    fn try_from(record: FindingRecord) -> Result<Self, Self::Error> {
        let mut finding = Finding::new(
            &record.tool,
            &record.vulnerability_type,
            record.severity,
            record.confidence,
        )?
        .with_description(record.description)
        .with_recommendation(record.recommendation);
        finding.location = record.location;
        Ok(finding)
    }
}
