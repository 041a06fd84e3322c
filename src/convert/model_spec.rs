//! ModelSpec builder
//!
//! Sanitizes table and column names and normalizes column types. Relationships
//! and measures are carried over as extracted; relationship validity is
//! decided when the authoring script is generated.

use crate::models::{
    ColumnType, ModelSpec, ParsedMetadata, SourceConfig, SourceType, SpecColumn, SpecTable,
    TableMeta,
};
use crate::validation::input::sanitize_identifier;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Builds a [`ModelSpec`] from parsed workbook metadata.
#[derive(Debug, Clone, Default)]
pub struct ModelSpecBuilder {
    generated_at: Option<DateTime<Utc>>,
}

impl ModelSpecBuilder {
    /// Create a new builder stamping specs with the current time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::convert::ModelSpecBuilder;
    ///
    /// let builder = ModelSpecBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every spec with a fixed time.
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Build the model spec.
    ///
    /// The source selection does not influence the model spec; it is only traced.
    /// `report_id` is sanitized before use.
    pub fn build(
        &self,
        meta: &ParsedMetadata,
        source_type: SourceType,
        source_config: &SourceConfig,
        report_id: &str,
    ) -> ModelSpec {
        let report_id = sanitize_identifier(report_id);
        debug!(
            report_id = %report_id,
            source_type = %source_type,
            config_keys = source_config.0.len(),
            "Building model spec"
        );

        ModelSpec {
            report_id,
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            tables: meta.tables.iter().map(spec_table).collect(),
            relationships: meta.relationships.clone(),
            measures: meta.measures.clone(),
        }
    }
}

fn spec_table(table: &TableMeta) -> SpecTable {
    SpecTable {
        name: sanitize_identifier(&table.name),
        columns: table
            .columns
            .iter()
            .map(|c| SpecColumn {
                name: sanitize_identifier(&c.name),
                column_type: ColumnType::normalize(c.data_type.as_deref()),
            })
            .collect(),
    }
}
