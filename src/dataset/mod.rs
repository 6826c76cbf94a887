pub mod loader;

pub use loader::{load_dataset, parse_manifest, DatasetEntry, DatasetManifest};
