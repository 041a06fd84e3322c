//! Export functionality
//!
//! Generates the target tool's artifacts from a ModelSpec:
//! - DAX measure files
//! - Power Query data-access expressions
//! - Model-authoring automation scripts
//! - Report layout documents

pub mod dax;
pub mod layout;
pub mod power_query;
pub mod te3;

use crate::models::SourceType;
use std::path::PathBuf;

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),
    #[error("Invalid source config: {0}")]
    InvalidSourceConfig(String),
    #[error("Source config for {source_type} is missing required key '{key}'")]
    MissingConfigKey { source_type: SourceType, key: String },
    #[error("Script template not found: {0}")]
    TemplateNotFound(PathBuf),
    #[error("Generated TE3 script not found in {0}")]
    ScriptNotGenerated(PathBuf),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

// Re-export for convenience
pub use dax::{DaxExporter, DaxFile};
pub use layout::{IdGenerator, LayoutExporter, RandomIds, SequentialIds, StableIds};
pub use power_query::PowerQueryExporter;
pub use te3::{ScriptRender, Te3ScriptExporter};
