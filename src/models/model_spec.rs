//! Canonical model specification
//!
//! The ModelSpec is the single input of the DAX, Power Query and authoring
//! script generators. Table and column names in a ModelSpec are already
//! sanitized identifiers.

use super::metadata::{Measure, RelationshipMeta};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column types understood by the target modeling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Double,
    DateTime,
    Boolean,
    String,
}

/// Exact (lowercased) spellings that map to `Int64`.
const INT_SPELLINGS: &[&str] = &["int", "integer", "long"];

/// Exact (lowercased) spellings that map to `Double`.
const DOUBLE_SPELLINGS: &[&str] = &["float", "double", "decimal", "real"];

impl ColumnType {
    /// Normalize a raw, extractor-reported type string.
    ///
    /// Total: unknown, empty and missing types map to `String`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::models::ColumnType;
    ///
    /// assert_eq!(ColumnType::normalize(Some("integer")), ColumnType::Int64);
    /// assert_eq!(ColumnType::normalize(Some("datetime")), ColumnType::DateTime);
    /// assert_eq!(ColumnType::normalize(None), ColumnType::String);
    /// ```
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return ColumnType::String;
        };
        let t = raw.trim().to_lowercase();
        if t.is_empty() {
            return ColumnType::String;
        }
        if INT_SPELLINGS.contains(&t.as_str()) {
            return ColumnType::Int64;
        }
        if DOUBLE_SPELLINGS.contains(&t.as_str()) {
            return ColumnType::Double;
        }
        if t.contains("date") {
            return ColumnType::DateTime;
        }
        if t.contains("bool") {
            return ColumnType::Boolean;
        }
        ColumnType::String
    }

    /// The `DataType` member used by the authoring script.
    pub fn script_data_type(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "DataType.Int64",
            ColumnType::Double => "DataType.Double",
            ColumnType::DateTime => "DataType.DateTime",
            ColumnType::Boolean => "DataType.Boolean",
            ColumnType::String => "DataType.String",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::Int64 => "Int64",
            ColumnType::Double => "Double",
            ColumnType::DateTime => "DateTime",
            ColumnType::Boolean => "Boolean",
            ColumnType::String => "String",
        };
        f.write_str(name)
    }
}

/// A sanitized column with its normalized type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecTable {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<SpecColumn>,
}

/// Canonical model specification for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(rename = "reportId")]
    pub report_id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub tables: Vec<SpecTable>,
    /// Passed through from the extraction unmodified
    #[serde(default)]
    pub relationships: Vec<RelationshipMeta>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl ModelSpec {
    /// Names of the declared tables, in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_integer_spellings() {
        for raw in ["int", "INTEGER", "Long", " int "] {
            assert_eq!(ColumnType::normalize(Some(raw)), ColumnType::Int64, "{}", raw);
        }
    }

    #[test]
    fn test_normalize_double_spellings() {
        for raw in ["float", "Double", "decimal", "REAL"] {
            assert_eq!(ColumnType::normalize(Some(raw)), ColumnType::Double, "{}", raw);
        }
    }

    #[test]
    fn test_normalize_substring_rules() {
        assert_eq!(ColumnType::normalize(Some("date")), ColumnType::DateTime);
        assert_eq!(ColumnType::normalize(Some("datetime")), ColumnType::DateTime);
        assert_eq!(ColumnType::normalize(Some("boolean")), ColumnType::Boolean);
        // "integer" substring does not count, only exact spellings do
        assert_eq!(ColumnType::normalize(Some("bigintegerish")), ColumnType::String);
    }

    #[test]
    fn test_normalize_unknown_is_string() {
        assert_eq!(ColumnType::normalize(None), ColumnType::String);
        assert_eq!(ColumnType::normalize(Some("")), ColumnType::String);
        assert_eq!(ColumnType::normalize(Some("   ")), ColumnType::String);
        assert_eq!(ColumnType::normalize(Some("spatial")), ColumnType::String);
    }

    #[test]
    fn test_unlisted_numeric_spellings_are_string() {
        assert_eq!(ColumnType::normalize(Some("number")), ColumnType::String);
        assert_eq!(ColumnType::normalize(Some("int64")), ColumnType::String);
        assert_eq!(ColumnType::normalize(Some("bigint")), ColumnType::String);
    }

    #[test]
    fn test_normalize_is_a_fixed_point_on_its_output() {
        // Int64 is excluded: "int64" is not one of the integer spellings
        for ty in [
            ColumnType::Double,
            ColumnType::DateTime,
            ColumnType::Boolean,
            ColumnType::String,
        ] {
            assert_eq!(ColumnType::normalize(Some(&ty.to_string())), ty);
        }
    }

    #[test]
    fn test_column_type_serializes_as_name() {
        let col = SpecColumn {
            name: "Amount".to_string(),
            column_type: ColumnType::Double,
        };
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Amount", "type": "Double"}));
    }
}
