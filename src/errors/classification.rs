use super::types::ContractBenchError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Recoverable errors stay inside a single tool's performance record.
    pub recoverable: bool,
}

impl ContractBenchError {
    /// Classify this error to determine whether it is isolated to one tool
    /// run or must be surfaced to the caller.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Isolated to the tool that raised them
            ContractBenchError::AdapterUnavailable(_) => ErrorClassification {
                error_type: "AdapterUnavailable",
                recoverable: true,
            },
            ContractBenchError::AdapterExecution(_) => ErrorClassification {
                error_type: "AdapterExecutionFailure",
                recoverable: true,
            },
            ContractBenchError::Timeout(_) => ErrorClassification {
                error_type: "AdapterExecutionFailure",
                recoverable: true,
            },
            ContractBenchError::OutputParse(_) => ErrorClassification {
                error_type: "AdapterExecutionFailure",
                recoverable: true,
            },
            ContractBenchError::Model(_) => ErrorClassification {
                error_type: "AdapterExecutionFailure",
                recoverable: true,
            },
            ContractBenchError::InvalidRecord(_) => ErrorClassification {
                error_type: "AdapterExecutionFailure",
                recoverable: true,
            },
            ContractBenchError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                recoverable: true,
            },

            // Surfaced to the caller
            ContractBenchError::Config(_) => ErrorClassification {
                error_type: "ConfigurationError",
                recoverable: false,
            },
            ContractBenchError::Io(_) => ErrorClassification {
                error_type: "IoError",
                recoverable: false,
            },
            ContractBenchError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                recoverable: false,
            },
            ContractBenchError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                recoverable: false,
            },
        }
    }
}
