//! Import functionality
//!
//! Reads workbook files and extracts normalized metadata:
//! - Archive reading (`.twb` definition files and `.twbx` bundles)
//! - Tolerant, namespace-agnostic XML loading
//! - Metadata extraction (datasources, tables, relationships, worksheets,
//!   dashboards, measures, connections)

pub mod archive;
pub mod extract;
pub mod workbook;
pub mod xml;

use std::path::PathBuf;

pub use archive::{WorkbookKind, read_workbook};
pub use extract::ExtractOptions;
pub use workbook::WorkbookImporter;
pub use xml::{XmlElement, parse_xml};

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Unsupported input (expected .twb or .twbx): {0}")]
    UnsupportedInput(PathBuf),
    #[error("No .twb definition found inside {0}")]
    ArchiveMemberNotFound(PathBuf),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),
}
