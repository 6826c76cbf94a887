pub mod adapter;
pub mod registry;
pub mod catalog;
pub mod features;
pub mod model;
pub mod classifier;
pub mod ai_binary;
pub mod ai_multiclass;
pub mod parser;
pub mod external;

pub use adapter::{ToolAdapter, ToolKind};
pub use registry::AdapterRegistry;
pub use features::{FeatureExtractor, KeywordFeatureExtractor};
pub use model::{LinearModel, ModelInfo, ModelStatus, ModelStore, Prediction, Predictor};
pub use classifier::ClassifierBackend;
pub use ai_binary::AiBinaryAdapter;
pub use ai_multiclass::AiMulticlassAdapter;
pub use parser::{NormalizedJsonParser, OutputParser};
pub use external::ExternalAnalyzerAdapter;
