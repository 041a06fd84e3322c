//! Abstract page/visual description and the target report layout document

use super::metadata::Visual;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pages and their visuals, independent of either reporting tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSpec {
    #[serde(rename = "reportId", default)]
    pub report_id: String,
    #[serde(rename = "generatedAt", default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub visuals: Vec<Visual>,
}

/// Report layout document consumed by the target report designer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub version: String,
    pub config: Value,
    pub sections: Vec<LayoutSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSection {
    /// Generated identifier
    pub name: String,
    /// Page name
    pub display_name: String,
    pub visual_containers: Vec<VisualContainer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualContainer {
    pub name: String,
    pub visual_type: String,
    pub title: String,
    pub prototype_query: PrototypeQuery,
}

/// Query clause binding a visual's fields to a dataset entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrototypeQuery {
    pub from: Vec<QuerySource>,
    pub select: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuerySource {
    pub name: String,
    pub entity: String,
}
