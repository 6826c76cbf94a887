use serde::Deserialize;
use crate::errors::ContractBenchError;
use crate::models::finding::{Finding, Severity, SourceLocation};

/// Converts an external analyzer's stdout into normalized findings.
pub trait OutputParser: Send + Sync {
    fn parse(&self, tool: &str, stdout: &str) -> Result<Vec<Finding>, ContractBenchError>;
}

/// Parses the normalized JSON report: either a bare array of findings or an
/// object carrying `success`, `error` and `findings`. An object with a
/// non-empty `error` or `success: false` is a failed run; any other object
/// must carry `findings`. Fields beyond the ones declared here are ignored.
#[derive(Debug, Default, Clone)]
pub struct NormalizedJsonParser;

#[derive(Deserialize)]
#[serde(untagged)]
enum Report {
    Findings(Vec<RawFinding>),
    Envelope {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        error: Option<String>,
        /// Required for a successful report; absent only when the run failed.
        #[serde(default)]
        findings: Option<Vec<RawFinding>>,
    },
}

#[derive(Deserialize)]
struct RawFinding {
    #[serde(alias = "type")]
    vulnerability_type: String,
    severity: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    recommendation: Option<String>,
}

impl OutputParser for NormalizedJsonParser {
    fn parse(&self, tool: &str, stdout: &str) -> Result<Vec<Finding>, ContractBenchError> {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return Err(ContractBenchError::OutputParse(format!("{} produced no output", tool)));
        }

        let report: Report = serde_json::from_str(trimmed)
            .map_err(|e| ContractBenchError::OutputParse(format!("{} output is not a findings report: {}", tool, e)))?;

        let raw = match report {
            Report::Findings(findings) => findings,
            Report::Envelope { success, error, findings } => {
                let error = error.filter(|e| !e.trim().is_empty());
                if success == Some(false) || error.is_some() {
                    return Err(ContractBenchError::AdapterExecution(
                        error.unwrap_or_else(|| format!("{} reported failure", tool))
                    ));
                }
                findings.ok_or_else(|| {
                    ContractBenchError::OutputParse(format!("{} report has no `findings` list", tool))
                })?
            }
        };

        raw.into_iter().map(|r| to_finding(tool, r)).collect()
    }
}

fn to_finding(tool: &str, raw: RawFinding) -> Result<Finding, ContractBenchError> {
    let severity = Severity::parse(&raw.severity).ok_or_else(|| {
        ContractBenchError::OutputParse(format!("{}: unknown severity '{}'", tool, raw.severity))
    })?;

    let mut finding = Finding::new(tool, &raw.vulnerability_type, severity, raw.confidence.unwrap_or(1.0))
        .map_err(|e| ContractBenchError::OutputParse(e.to_string()))?
        .with_description(raw.description.unwrap_or_default())
        .with_recommendation(raw.recommendation.unwrap_or_default());

    if let Some(line) = raw.line {
        finding = finding.with_location(SourceLocation { line, column: raw.column });
    }
    Ok(finding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_array() {
        let out = r#"[{"type":"Reentrancy","severity":"High","line":12},{"vulnerability_type":"tx_origin","severity":"low","confidence":0.4}]"#;
        let findings = NormalizedJsonParser.parse("slither", out).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].vulnerability_type(), "reentrancy");
        assert_eq!(findings[0].location().map(|l| l.line), Some(12));
        assert_eq!(findings[0].confidence(), 1.0);
        assert_eq!(findings[1].severity(), Severity::Low);
        assert_eq!(findings[1].tool(), "slither");
    }

    #[test]
    fn test_parses_envelope() {
        let out = r#"{"success":true,"findings":[{"type":"dos","severity":"medium"}],"version":"0.10"}"#;
        let findings = NormalizedJsonParser.parse("mythril", out).unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_envelope_failure_is_execution_error() {
        let out = r#"{"success":false,"error":"solc not found"}"#;
        let err = NormalizedJsonParser.parse("mythril", out).unwrap_err();
        assert!(matches!(err, ContractBenchError::AdapterExecution(ref m) if m == "solc not found"));
    }

    #[test]
    fn test_error_without_success_flag_is_execution_error() {
        let out = r#"{"error":"solc not found"}"#;
        let err = NormalizedJsonParser.parse("slither", out).unwrap_err();
        assert!(matches!(err, ContractBenchError::AdapterExecution(ref m) if m == "solc not found"));
    }

    #[test]
    fn test_error_wins_over_success_flag() {
        let out = r#"{"success":true,"error":"compilation failed","findings":[]}"#;
        assert!(matches!(
            NormalizedJsonParser.parse("slither", out).unwrap_err(),
            ContractBenchError::AdapterExecution(_)
        ));
    }

    #[test]
    fn test_object_without_findings_rejected() {
        let native = r#"{"success":true,"error":null,"results":{"detectors":[]}}"#;
        assert!(matches!(
            NormalizedJsonParser.parse("slither", native).unwrap_err(),
            ContractBenchError::OutputParse(_)
        ));
        assert!(matches!(
            NormalizedJsonParser.parse("slither", "{}").unwrap_err(),
            ContractBenchError::OutputParse(_)
        ));
    }

    #[test]
    fn test_empty_output_rejected() {
        assert!(matches!(
            NormalizedJsonParser.parse("x", "  \n").unwrap_err(),
            ContractBenchError::OutputParse(_)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(NormalizedJsonParser.parse("x", "Traceback (most recent call last)").is_err());
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let out = r#"[{"type":"dos","severity":"apocalyptic"}]"#;
        assert!(NormalizedJsonParser.parse("x", out).is_err());
    }

    #[test]
    fn test_clean_report() {
        let findings = NormalizedJsonParser.parse("x", "[]").unwrap();
        assert!(findings.is_empty());
    }
}
