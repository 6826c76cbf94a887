pub mod consensus;
pub mod events;
pub mod metrics;
pub mod orchestrator;
pub mod recorder;
pub mod state;

pub use events::ComparisonEvent;
pub use orchestrator::ComparisonOrchestrator;
pub use recorder::PerformanceRecorder;
pub use state::AnalysisSettings;
