pub mod types;
pub mod classification;

pub use types::ContractBenchError;
pub use classification::ErrorClassification;
