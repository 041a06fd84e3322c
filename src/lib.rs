//! BI Migration SDK - Converts workbook-based BI reports into tabular model artifacts
//!
//! Provides unified interfaces for:
//! - Workbook import (`.twb` definitions and `.twbx` bundles)
//! - Metadata extraction into a normalized document
//! - Model spec and visual spec conversion
//! - Artifact export (DAX measures, Power Query sources, authoring scripts, report layouts)
//! - Artifact manifest generation
//! - Conversion event reporting

pub mod artifacts;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod events;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use artifacts::{ArtifactError, ArtifactGenerator, GenerationOptions};
pub use config::{ConfigError, ConverterConfig};
pub use convert::{ModelSpecBuilder, build_visual_spec};
pub use events::{CollectingSink, ConversionEvent, EventKind, EventSink, NullSink, TracingSink};
pub use export::{DaxExporter, ExportError, LayoutExporter, PowerQueryExporter, Te3ScriptExporter};
pub use import::{ExtractOptions, ImportError, WorkbookImporter};
pub use validation::{RelationshipValidationResult, RelationshipValidator, SkipReason};

// Re-export models
pub use models::{
    ArtifactManifest, ColumnType, Measure, ModelSpec, ParsedMetadata, ReportLayout, SourceConfig,
    SourceSelection, SourceType, VisualSpec,
};
