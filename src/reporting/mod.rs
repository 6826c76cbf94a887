pub mod export;
pub mod formatter;

pub use export::{export, ExportFormat};
