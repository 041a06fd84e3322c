//! DAX measure exporter
//!
//! One `.dax` file per measure, named after the sanitized measure name. The
//! file body is the measure expression verbatim, or a placeholder comment
//! when the workbook carried no expression.

use super::ExportError;
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::models::Measure;
use crate::validation::input::{EMPTY_IDENTIFIER, sanitize_optional, single_line};
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered measure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaxFile {
    /// `<sanitized name>.dax`
    pub file_name: String,
    pub content: String,
}

/// DAX exporter
#[derive(Debug, Default)]
pub struct DaxExporter;

impl DaxExporter {
    /// Create a new DAX exporter instance
    pub fn new() -> Self {
        Self
    }

    /// Body written for a measure without an expression.
    pub fn placeholder(name: Option<&str>) -> String {
        format!(
            "// TODO: Implement DAX for {}",
            single_line(name.unwrap_or(EMPTY_IDENTIFIER))
        )
    }

    /// Render one file per distinct sanitized measure name.
    ///
    /// When two measures map to the same file name the later one wins; the
    /// file keeps the position of the first.
    pub fn export(&self, measures: &[Measure], events: &dyn EventSink) -> Vec<DaxFile> {
        let mut files: Vec<DaxFile> = Vec::with_capacity(measures.len());

        for measure in measures {
            let file_name = format!("{}.dax", sanitize_optional(measure.name.as_deref()));
            let content = match measure.expression.as_deref() {
                Some(expr) if !expr.is_empty() => expr.to_string(),
                _ => Self::placeholder(measure.name.as_deref()),
            };

            match files.iter_mut().find(|f| f.file_name == file_name) {
                Some(existing) => {
                    events.record(ConversionEvent::warn(
                        Stage::Dax,
                        EventKind::MeasureFileCollision,
                        format!(
                            "Measure {:?} overwrites {}",
                            measure.name.as_deref().unwrap_or_default(),
                            file_name
                        ),
                    ));
                    existing.content = content;
                }
                None => files.push(DaxFile { file_name, content }),
            }
        }

        files
    }

    /// Render and write every measure file into `dir`, creating it if needed.
    ///
    /// Returns the written paths in measure order.
    pub fn write_all(
        &self,
        measures: &[Measure],
        dir: &Path,
        events: &dyn EventSink,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;

        let mut paths = Vec::new();
        for file in self.export(measures, events) {
            let path = dir.join(&file.file_name);
            fs::write(&path, &file.content)?;
            events.record(ConversionEvent::info(
                Stage::Dax,
                EventKind::ArtifactWritten,
                format!("Wrote file: {}", path.display()),
            ));
            paths.push(path);
        }
        Ok(paths)
    }
}
