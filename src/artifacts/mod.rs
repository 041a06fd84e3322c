//! Artifact generation
//!
//! Turns one ParsedMetadata document into the full artifact tree:
//!
//! ```text
//! <out_root>/
//! ├── model/<reportId>_modelspec.json
//! ├── dax/*.dax
//! ├── visuals/<reportId>_visual.json
//! ├── powerquery/<reportId>_source.m
//! └── artifact_manifest.json
//! ```

use crate::convert::{ModelSpecBuilder, build_visual_spec};
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::export::{DaxExporter, ExportError, PowerQueryExporter};
use crate::import::{ImportError, WorkbookImporter};
use crate::models::{
    ArtifactManifest, ParsedMetadata, SourceConfig, SourceSelection, SourceType,
};
use crate::validation::input::sanitize_identifier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MODEL_DIR: &str = "model";
pub const DAX_DIR: &str = "dax";
pub const VISUALS_DIR: &str = "visuals";
pub const POWER_QUERY_DIR: &str = "powerquery";
pub const MANIFEST_FILE: &str = "artifact_manifest.json";

/// Report id used when the caller supplies none.
pub const DEFAULT_REPORT_ID: &str = "report";

/// Error during artifact generation
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),
    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Generator thread panicked: {0}")]
    GeneratorPanicked(&'static str),
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Report identifier; sanitized before use
    pub report_id: String,
    /// Run the DAX, visual and Power Query writers on scoped threads
    pub parallel: bool,
    /// Fixed timestamp for every document of the run
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            report_id: DEFAULT_REPORT_ID.to_string(),
            parallel: false,
            generated_at: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_report_id(mut self, report_id: impl Into<String>) -> Self {
        self.report_id = report_id.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// Artifact generator
#[derive(Debug, Clone, Default)]
pub struct ArtifactGenerator {
    options: GenerationOptions,
}

impl ArtifactGenerator {
    /// Create a new artifact generator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::artifacts::{ArtifactGenerator, GenerationOptions};
    ///
    /// let generator = ArtifactGenerator::new(GenerationOptions::default().with_report_id("sales"));
    /// ```
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate every artifact for a source tag such as `"sql"`.
    pub fn generate_tag(
        &self,
        meta: &ParsedMetadata,
        out_root: &Path,
        source_type: &str,
        source_config: &SourceConfig,
        events: &dyn EventSink,
    ) -> Result<ArtifactManifest, ArtifactError> {
        let source_type: SourceType = source_type.parse()?;
        self.generate(meta, out_root, source_type, source_config, events)
    }

    /// Generate every artifact and write the manifest.
    ///
    /// The data-access expression is rendered first, so an incomplete source
    /// config fails before anything is written.
    pub fn generate(
        &self,
        meta: &ParsedMetadata,
        out_root: &Path,
        source_type: SourceType,
        source_config: &SourceConfig,
        events: &dyn EventSink,
    ) -> Result<ArtifactManifest, ArtifactError> {
        let power_query = PowerQueryExporter::new().export(source_type, source_config)?;

        let report_id = sanitize_identifier(&self.options.report_id);
        let generated_at = self.options.generated_at.unwrap_or_else(Utc::now);

        let model_dir = out_root.join(MODEL_DIR);
        let dax_dir = out_root.join(DAX_DIR);
        let visuals_dir = out_root.join(VISUALS_DIR);
        let pq_dir = out_root.join(POWER_QUERY_DIR);
        for dir in [&model_dir, &dax_dir, &visuals_dir, &pq_dir] {
            fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }

        let spec = ModelSpecBuilder::new()
            .with_timestamp(generated_at)
            .build(meta, source_type, source_config, &report_id);
        let model_path = model_dir.join(format!("{}_modelspec.json", report_id));
        write_json(&model_path, &spec, events)?;

        let visual_spec = build_visual_spec(meta, &report_id, generated_at);
        let visual_path = visuals_dir.join(format!("{}_visual.json", report_id));
        let pq_path = pq_dir.join(format!("{}_source.m", report_id));

        let write_dax = || -> Result<Vec<PathBuf>, ArtifactError> {
            Ok(DaxExporter::new().write_all(&spec.measures, &dax_dir, events)?)
        };
        let write_visual = || write_json(&visual_path, &visual_spec, events);
        let write_pq = || write_text(&pq_path, &power_query, Stage::PowerQuery, events);

        let (dax_files, visual_result, pq_result) = if self.options.parallel {
            std::thread::scope(|s| {
                let dax = s.spawn(write_dax);
                let visual = s.spawn(write_visual);
                let pq = s.spawn(write_pq);
                (
                    dax.join()
                        .unwrap_or(Err(ArtifactError::GeneratorPanicked("dax"))),
                    visual
                        .join()
                        .unwrap_or(Err(ArtifactError::GeneratorPanicked("visual"))),
                    pq.join()
                        .unwrap_or(Err(ArtifactError::GeneratorPanicked("powerquery"))),
                )
            })
        } else {
            (write_dax(), write_visual(), write_pq())
        };
        let dax_files = dax_files?;
        visual_result?;
        pq_result?;

        let manifest = ArtifactManifest {
            report_id,
            generated_at,
            model_spec_path: model_path,
            dax_file_paths: dax_files,
            visual_spec_path: visual_path,
            power_query_file_paths: vec![pq_path],
        };
        write_json(&out_root.join(MANIFEST_FILE), &manifest, events)?;

        events.record(ConversionEvent::info(
            Stage::Manifest,
            EventKind::Summary,
            format!(
                "Generated {} DAX files, 1 model spec, 1 visual spec, 1 Power Query file",
                manifest.dax_file_paths.len()
            ),
        ));

        Ok(manifest)
    }

    /// Import a workbook and generate its artifacts in one call.
    pub fn generate_from_workbook(
        &self,
        importer: &WorkbookImporter,
        workbook: &Path,
        out_root: &Path,
        source_type: SourceType,
        source_config: &SourceConfig,
        events: &dyn EventSink,
    ) -> Result<(ParsedMetadata, ArtifactManifest), ArtifactError> {
        let meta = importer.import_file(workbook, events)?;
        let manifest = self.generate(&meta, out_root, source_type, source_config, events)?;
        Ok((meta, manifest))
    }
}

/// Persist a source selection as `<dir>/<reportId>_source.json`.
pub fn save_source_selection(
    dir: &Path,
    selection: &SourceSelection,
    events: &dyn EventSink,
) -> Result<PathBuf, ArtifactError> {
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(SourceSelection::file_name(&selection.report_id));
    write_json(&path, selection, events)?;
    Ok(path)
}

pub fn load_source_selection(path: &Path) -> Result<SourceSelection, ArtifactError> {
    read_json(path)
}

/// Read any JSON document written by this crate.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text)
        .map_err(|e| ArtifactError::SerializationError(format!("{}: {}", path.display(), e)))
}

/// Write a pretty-printed JSON document (non-ASCII preserved).
pub fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    events: &dyn EventSink,
) -> Result<(), ArtifactError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ArtifactError::SerializationError(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(path, text).map_err(|e| io_error(path, e))?;

    info!("Wrote JSON: {}", path.display());
    events.record(ConversionEvent::info(
        Stage::Manifest,
        EventKind::ArtifactWritten,
        format!("Wrote JSON: {}", path.display()),
    ));
    Ok(())
}

fn write_text(
    path: &Path,
    text: &str,
    stage: Stage,
    events: &dyn EventSink,
) -> Result<(), ArtifactError> {
    fs::write(path, text).map_err(|e| io_error(path, e))?;
    info!("Wrote file: {}", path.display());
    events.record(ConversionEvent::info(
        stage,
        EventKind::ArtifactWritten,
        format!("Wrote file: {}", path.display()),
    ));
    Ok(())
}

fn io_error(path: &Path, err: std::io::Error) -> ArtifactError {
    ArtifactError::IoError(format!("{}: {}", path.display(), err))
}
