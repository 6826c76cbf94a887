use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::errors::ContractBenchError;
use crate::models::ComparisonResult;

pub const CSV_HEADER: &str = "contract_name,agreement_score,consensus_findings_count,timestamp,tool_name,execution_time,findings_count,success,vulnerabilities_found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write to a uniquely named temp file in the destination directory, then
/// rename it over the destination. Concurrent writers never share a temp file.
pub async fn atomic_write(path: &Path, content: &str) -> Result<(), ContractBenchError> {
    let path = path.to_path_buf();
    let content = content.to_owned();
    tokio::task::spawn_blocking(move || write_replace(&path, content.as_bytes()))
        .await
        .map_err(|e| ContractBenchError::Internal(format!("export writer panicked: {}", e)))?
}

fn write_replace(path: &Path, content: &[u8]) -> Result<(), ContractBenchError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ContractBenchError::Io(e.error))?;
    Ok(())
}

pub fn render_json(results: &[Arc<ComparisonResult>]) -> Result<String, ContractBenchError> {
    let records: Vec<&ComparisonResult> = results.iter().map(|r| r.as_ref()).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// One row per (result, tool) pair, in history order then tool-name order.
pub fn render_csv(results: &[Arc<ComparisonResult>]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for result in results {
        for perf in result.tool_performances.values() {
            let row = [
                csv_field(&result.contract_name),
                result.agreement_score.to_string(),
                result.consensus_findings.len().to_string(),
                csv_field(&result.timestamp.to_rfc3339()),
                csv_field(perf.tool_name()),
                perf.execution_time().to_string(),
                perf.findings_count().to_string(),
                perf.success().to_string(),
                csv_field(&perf.vulnerabilities_found().join(",")),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
    }
    out
}

pub fn csv_row_count(results: &[Arc<ComparisonResult>]) -> usize {
    results.iter().map(|r| r.tool_performances.len()).sum()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render and atomically write `results`. Returns the number of records
/// (JSON) or data rows (CSV) written.
pub async fn export(
    results: &[Arc<ComparisonResult>],
    destination: &Path,
    format: ExportFormat,
) -> Result<usize, ContractBenchError> {
    let (content, count) = match format {
        ExportFormat::Json => (render_json(results)?, results.len()),
        ExportFormat::Csv => (render_csv(results), csv_row_count(results)),
    };
    atomic_write(destination, &content).await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_history_csv_is_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("contract_name,agreement_score"));
    }

    #[tokio::test]
    async fn test_atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        atomic_write(&path, "first").await.unwrap();
        atomic_write(&path, "second").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_same_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let contents: Vec<String> = (0..16).map(|i| format!("writer-{i}\n").repeat(512)).collect();

        let writes = contents.iter().map(|c| atomic_write(&path, c));
        for outcome in futures::future::join_all(writes).await {
            outcome.unwrap();
        }

        let final_content = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&final_content));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = atomic_write(&dir.path().join("missing/out.json"), "x").await.unwrap_err();
        assert!(matches!(err, ContractBenchError::Io(_)));
    }
}
