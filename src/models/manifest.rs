//! Artifact manifest and persisted source selection

use super::source::{SourceConfig, SourceType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Write-once summary of the files produced by one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(rename = "reportId")]
    pub report_id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "modelSpec")]
    pub model_spec_path: PathBuf,
    #[serde(rename = "daxFiles")]
    pub dax_file_paths: Vec<PathBuf>,
    #[serde(rename = "visualSpec")]
    pub visual_spec_path: PathBuf,
    #[serde(rename = "powerQueryFiles")]
    pub power_query_file_paths: Vec<PathBuf>,
}

/// The data source a user selected for a report, as saved between stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub report_id: String,
    pub source_type: SourceType,
    pub source_config: SourceConfig,
}

impl SourceSelection {
    /// File name the selection is stored under.
    pub fn file_name(report_id: &str) -> String {
        format!("{}_source.json", report_id)
    }
}
