//! Workbook importer
//!
//! Runs the archive reader, the XML loader and every metadata extractor to
//! produce one [`ParsedMetadata`] document per workbook.

use super::ImportError;
use super::archive::read_workbook;
use super::extract::{
    ExtractOptions, extract_connections, extract_dashboards, extract_datasources,
    extract_measures, extract_relationships, extract_tables, extract_title, extract_worksheets,
};
use super::xml::{XmlElement, parse_xml_with_events};
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::models::ParsedMetadata;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

/// Workbook importer producing [`ParsedMetadata`].
#[derive(Debug, Clone, Default)]
pub struct WorkbookImporter {
    options: ExtractOptions,
    preferred_members: Vec<String>,
    generated_at: Option<DateTime<Utc>>,
}

impl WorkbookImporter {
    /// Create a new workbook importer with default extraction options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::import::WorkbookImporter;
    ///
    /// let importer = WorkbookImporter::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Bundle member names tried before the first `.twb` member.
    pub fn with_preferred_members(mut self, members: Vec<String>) -> Self {
        self.preferred_members = members;
        self
    }

    /// Use a fixed extraction timestamp instead of the current time.
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Import a `.twb` or `.twbx` file.
    ///
    /// The report id is the file stem; it also serves as the report name
    /// when the workbook carries no title.
    pub fn import_file(
        &self,
        path: &Path,
        events: &dyn EventSink,
    ) -> Result<ParsedMetadata, ImportError> {
        info!("Importing workbook: {}", path.display());

        let text = read_workbook(path, &self.preferred_members, events)?;
        let report_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.import_str(&text, &report_id, events)
    }

    /// Import workbook XML text directly.
    pub fn import_str(
        &self,
        xml: &str,
        report_id: &str,
        events: &dyn EventSink,
    ) -> Result<ParsedMetadata, ImportError> {
        let root = parse_xml_with_events(xml, events)?;
        Ok(self.extract(&root, report_id, events))
    }

    /// Run every extractor over an already loaded tree.
    pub fn extract(
        &self,
        root: &XmlElement,
        report_id: &str,
        events: &dyn EventSink,
    ) -> ParsedMetadata {
        let options = &self.options;
        let report_name =
            extract_title(root, options, events).unwrap_or_else(|| report_id.to_string());

        let mut meta = ParsedMetadata::new(
            report_id,
            report_name,
            self.generated_at.unwrap_or_else(Utc::now),
        );
        meta.datasources = extract_datasources(root, options, events);
        meta.tables = extract_tables(root, options, events);
        meta.relationships = extract_relationships(root, options, events);
        meta.worksheets = extract_worksheets(root, options, events);
        meta.dashboards = extract_dashboards(root, options, events);
        meta.measures = extract_measures(root, options, events);
        meta.connections = extract_connections(root, options, events);

        events.record(ConversionEvent::info(
            Stage::Extract,
            EventKind::Summary,
            format!(
                "Extracted {} datasources, {} tables, {} relationships, {} worksheets, {} dashboards, {} measures, {} connections",
                meta.datasources.len(),
                meta.tables.len(),
                meta.relationships.len(),
                meta.worksheets.len(),
                meta.dashboards.len(),
                meta.measures.len(),
                meta.connections.len()
            ),
        ));

        meta
    }
}
