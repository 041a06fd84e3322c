//! Parsed workbook metadata
//!
//! Records produced by the metadata extractors. JSON key spelling matches the
//! documents the converter has always written: document-level keys are
//! camelCase, record-level keys are snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel table name for columns whose owning table cannot be inferred.
pub const UNNAMED_TABLE: &str = "_unnamed";

/// Aggregate metadata extracted from one workbook.
///
/// Produced once per input workbook and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMetadata {
    /// Report identifier (the workbook file stem)
    #[serde(rename = "reportId")]
    pub report_id: String,
    /// Human-readable workbook title
    pub report_name: String,
    /// Extraction timestamp
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub datasources: Vec<Datasource>,
    #[serde(default)]
    pub tables: Vec<TableMeta>,
    #[serde(default)]
    pub relationships: Vec<RelationshipMeta>,
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,
    #[serde(default)]
    pub dashboards: Vec<Dashboard>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl ParsedMetadata {
    /// Create an empty metadata document.
    pub fn new(
        report_id: impl Into<String>,
        report_name: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            report_name: report_name.into(),
            generated_at,
            datasources: Vec::new(),
            tables: Vec::new(),
            relationships: Vec::new(),
            worksheets: Vec::new(),
            dashboards: Vec::new(),
            measures: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Look up a table by its extracted name.
    pub fn table(&self, name: &str) -> Option<&TableMeta> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// A datasource declaration with its first connection block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Unique within a document; synthesized as `datasource_<n>` when absent
    pub id: String,
    pub name: Option<String>,
    pub connection_type: Option<String>,
    #[serde(default)]
    pub connection: BTreeMap<String, String>,
    /// Custom SQL / native query text, if any
    pub query: Option<String>,
}

/// A table and the columns attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
}

impl TableMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
}

/// A column with its raw, extractor-reported type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, data_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.map(str::to_string),
        }
    }
}

/// Directional join/relationship record. Any endpoint may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMeta {
    pub from_table: Option<String>,
    pub from_column: Option<String>,
    pub to_table: Option<String>,
    pub to_column: Option<String>,
    pub cardinality: Option<String>,
}

impl RelationshipMeta {
    /// Relationship with all four endpoints set.
    pub fn between(from_table: &str, from_column: &str, to_table: &str, to_column: &str) -> Self {
        Self {
            from_table: Some(from_table.to_string()),
            from_column: Some(from_column.to_string()),
            to_table: Some(to_table.to_string()),
            to_column: Some(to_column.to_string()),
            cardinality: None,
        }
    }

    /// True when every endpoint field is present and non-empty.
    pub fn is_complete(&self) -> bool {
        [
            &self.from_table,
            &self.from_column,
            &self.to_table,
            &self.to_column,
        ]
        .iter()
        .all(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// A worksheet and a bounded list of visual definitions found inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    #[serde(default)]
    pub visuals: Vec<Visual>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub visual_type: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Column / measure names referenced by the visual
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub name: String,
    #[serde(default)]
    pub items: Vec<DashboardItem>,
}

/// A zone or object placed on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardItem {
    pub id: Option<String>,
    /// Referenced worksheet / zone
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// A calculated field. A missing expression means "define later".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub name: Option<String>,
    pub expression: Option<String>,
}

impl Measure {
    pub fn new(name: &str, expression: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            expression: expression.map(str::to_string),
        }
    }
}

/// Raw connection attributes, keyed by attribute or child element name.
pub type Connection = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_completeness() {
        assert!(RelationshipMeta::between("A", "id", "B", "a_id").is_complete());

        let mut rel = RelationshipMeta::between("A", "id", "B", "a_id");
        rel.to_column = None;
        assert!(!rel.is_complete());

        rel.to_column = Some(String::new());
        assert!(!rel.is_complete());
    }

    #[test]
    fn test_parsed_metadata_json_keys() {
        let meta = ParsedMetadata::new("sales", "Sales Overview", Utc::now());
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["reportId"], "sales");
        assert_eq!(value["report_name"], "Sales Overview");
        assert!(value.get("generatedAt").is_some());
        assert!(value["tables"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let json = r#"{"reportId":"r","report_name":"R","generatedAt":"2024-01-01T00:00:00Z"}"#;
        let meta: ParsedMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.measures.is_empty());
        assert!(meta.relationships.is_empty());
    }
}
