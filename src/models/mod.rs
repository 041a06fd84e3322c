//! Models module for the SDK
//!
//! Defines the documents passed between conversion stages: parsed workbook
//! metadata, the canonical model spec, visual specs and layouts, and the
//! artifact manifest.

pub mod manifest;
pub mod metadata;
pub mod model_spec;
pub mod source;
pub mod visual_spec;

pub use manifest::{ArtifactManifest, SourceSelection};
pub use metadata::{
    ColumnMeta, Connection, Dashboard, DashboardItem, Datasource, Measure, ParsedMetadata,
    RelationshipMeta, TableMeta, UNNAMED_TABLE, Visual, Worksheet,
};
pub use model_spec::{ColumnType, ModelSpec, SpecColumn, SpecTable};
pub use source::{SourceConfig, SourceType};
pub use visual_spec::{
    LayoutSection, Page, PrototypeQuery, QuerySource, ReportLayout, VisualContainer, VisualSpec,
};
