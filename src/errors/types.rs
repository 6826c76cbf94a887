use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractBenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Tool execution failed: {0}")]
    AdapterExecution(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Output parse error: {0}")]
    OutputParse(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
