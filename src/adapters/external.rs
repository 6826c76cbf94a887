use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use crate::config::{ExternalToolConfig, ToolOutputFormat};
use crate::errors::ContractBenchError;
use crate::models::finding::Finding;
use super::adapter::{ToolAdapter, ToolKind};
use super::parser::{NormalizedJsonParser, OutputParser};
use tracing::debug;

const CONTRACT_PATH: &str = "{contract_path}";
const CONTRACT_NAME: &str = "{contract_name}";

/// Runs an out-of-process analyzer against a scratch copy of the contract.
///
/// The child is killed if the analysis future is dropped, so a timeout in the
/// recorder never leaves the process running.
pub struct ExternalAnalyzerAdapter {
    name: String,
    program: String,
    args: Vec<String>,
    success_exit_codes: Vec<i32>,
    parser: Arc<dyn OutputParser>,
}

impl ExternalAnalyzerAdapter {
    pub fn new(name: &str, program: &str, args: Vec<String>, parser: Arc<dyn OutputParser>) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args,
            success_exit_codes: vec![0],
            parser,
        }
    }

    pub fn from_config(config: &ExternalToolConfig) -> Self {
        let parser: Arc<dyn OutputParser> = match config.format {
            ToolOutputFormat::Normalized => Arc::new(NormalizedJsonParser),
        };
        let mut adapter = Self::new(&config.name, &config.program, config.args.clone(), parser);
        adapter.success_exit_codes = config.success_exit_codes.clone();
        adapter
    }

    pub fn with_success_exit_codes(mut self, codes: Vec<i32>) -> Self {
        self.success_exit_codes = codes;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn render_args(&self, contract_path: &Path, contract_name: &str) -> Vec<String> {
        let path = contract_path.display().to_string();
        self.args
            .iter()
            .map(|a| a.replace(CONTRACT_PATH, &path).replace(CONTRACT_NAME, contract_name))
            .collect()
    }
}

/// Locate `program` either as an explicit path or on `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

fn contract_file_name(contract_name: &str) -> String {
    let stem: String = contract_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "contract".to_string() } else { stem };
    format!("{}.sol", stem)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl ToolAdapter for ExternalAnalyzerAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::ExternalProcess
    }

    fn is_available(&self) -> bool {
        resolve_program(&self.program).is_some()
    }

    async fn analyze(&self, source: &str, contract_name: &str) -> Result<Vec<Finding>, ContractBenchError> {
        let workdir = tempfile::tempdir()
            .map_err(|e| ContractBenchError::AdapterExecution(format!("Failed to create scratch directory: {}", e)))?;
        let contract_path = workdir.path().join(contract_file_name(contract_name));
        tokio::fs::write(&contract_path, source).await
            .map_err(|e| ContractBenchError::AdapterExecution(format!("Failed to write contract: {}", e)))?;

        let args = self.render_args(&contract_path, contract_name);
        debug!(tool = %self.name, program = %self.program, args = ?args, "Executing external analyzer");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ContractBenchError::AdapterExecution(format!("Failed to execute {}: {}", self.program, e)))?;

        let exit_ok = output.status.code().is_some_and(|c| self.success_exit_codes.contains(&c));
        if !exit_ok {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = truncate(stderr.trim(), 500);
            return Err(ContractBenchError::AdapterExecution(if detail.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                format!("{} exited with {}: {}", self.program, output.status, detail)
            }));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        self.parser.parse(&self.name, &stdout)
    }
}
