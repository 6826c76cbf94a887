use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::ContractBenchError;
use crate::models::ContractSample;

const MAX_MANIFEST_BYTES: u64 = 16 * 1_048_576;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetEntry {
    /// Defaults to the file stem of `path`.
    pub name: Option<String>,
    pub code: Option<String>,
    /// Relative paths resolve against the manifest's directory.
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub vulnerabilities: Vec<String>,
}

/// Benchmark dataset. Either `{ contracts: [...] }` or a bare list.
/// JSON manifests parse through the same YAML reader.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DatasetManifest {
    Wrapped { contracts: Vec<DatasetEntry> },
    List(Vec<DatasetEntry>),
}

impl DatasetManifest {
    pub fn entries(&self) -> &[DatasetEntry] {
        match self {
            Self::Wrapped { contracts } => contracts,
            Self::List(entries) => entries,
        }
    }
}

pub fn parse_manifest(content: &str) -> Result<DatasetManifest, ContractBenchError> {
    serde_yaml::from_str(content)
        .map_err(|e| ContractBenchError::Config(format!("Invalid dataset manifest: {}", e)))
}

pub async fn load_dataset(path: &Path) -> Result<Vec<ContractSample>, ContractBenchError> {
    if !path.exists() {
        return Err(ContractBenchError::Config(format!("Dataset not found: {}", path.display())));
    }
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_MANIFEST_BYTES {
        return Err(ContractBenchError::Config("Dataset manifest exceeds 16MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let manifest = parse_manifest(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut samples = Vec::with_capacity(manifest.entries().len());
    let mut names = HashSet::new();
    for (index, entry) in manifest.entries().iter().enumerate() {
        let sample = resolve_entry(entry, base, index).await?;
        if !names.insert(sample.name.clone()) {
            warn!(contract = %sample.name, "Duplicate contract name in dataset");
        }
        samples.push(sample);
    }

    let vulnerable = samples.iter().filter(|s| !s.vulnerabilities.is_empty()).count();
    info!(
        path = %path.display(),
        contracts = samples.len(),
        vulnerable,
        "Loaded dataset"
    );
    Ok(samples)
}

async fn resolve_entry(entry: &DatasetEntry, base: &Path, index: usize) -> Result<ContractSample, ContractBenchError> {
    let code = match (&entry.code, &entry.path) {
        (Some(code), None) => code.clone(),
        (None, Some(p)) => {
            let full = if p.is_absolute() { p.clone() } else { base.join(p) };
            tokio::fs::read_to_string(&full).await.map_err(|e| {
                ContractBenchError::Config(format!("Cannot read contract {}: {}", full.display(), e))
            })?
        }
        _ => {
            return Err(ContractBenchError::Config(format!(
                "Dataset entry {} must set exactly one of `code` or `path`",
                index
            )))
        }
    };

    let name = entry
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| {
            entry
                .path
                .as_ref()
                .and_then(|p| p.file_stem())
                .map(|s| s.to_string_lossy().into_owned())
        })
        .ok_or_else(|| ContractBenchError::Config(format!("Dataset entry {} has no name", index)))?;

    Ok(ContractSample {
        name,
        code,
        vulnerabilities: entry.vulnerabilities.clone(),
    })
}
