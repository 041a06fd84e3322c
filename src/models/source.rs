//! Data source selection types

use crate::export::ExportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Connector family of the report's data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Excel,
    SharePoint,
    Sql,
    Fabric,
}

impl SourceType {
    /// Config keys each connector template requires.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            SourceType::Excel => &["url", "sheet"],
            SourceType::SharePoint => &["site", "file", "sheet"],
            SourceType::Sql => &["server", "database", "schema", "table"],
            SourceType::Fabric => &["workspace", "lakehouse", "table"],
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excel" => Ok(SourceType::Excel),
            "sharepoint" => Ok(SourceType::SharePoint),
            "sql" => Ok(SourceType::Sql),
            "fabric" => Ok(SourceType::Fabric),
            other => Err(ExportError::UnsupportedSourceType(other.to_string())),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Excel => write!(f, "excel"),
            SourceType::SharePoint => write!(f, "sharepoint"),
            SourceType::Sql => write!(f, "sql"),
            SourceType::Fabric => write!(f, "fabric"),
        }
    }
}

/// Connector settings, trusted to already be expression-safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceConfig(pub BTreeMap<String, Value>);

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object string, as passed on the command line.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        serde_json::from_str(json)
            .map_err(|e| ExportError::InvalidSourceConfig(format!("expected a JSON object: {}", e)))
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Value rendered as it should appear inside a template.
    ///
    /// Strings are returned as-is; other scalars use their JSON text.
    pub fn value(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
