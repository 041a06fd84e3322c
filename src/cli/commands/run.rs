//! Run command: the whole pipeline from workbook to report layout
//!
//! ```text
//! <out>/
//! ├── parsed/<reportId>_parsed_meta.json
//! ├── artifacts/          (see `artifacts` module)
//! ├── te3/TE3_apply_<reportId>.csx
//! └── layout/<reportId>_report.json
//! ```

use super::parse::importer_for;
use super::{SourceArgs, require_file};
use crate::artifacts::{ArtifactGenerator, write_json};
use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::events::EventSink;
use crate::export::{LayoutExporter, Te3ScriptExporter};
use crate::models::{ArtifactManifest, ModelSpec, VisualSpec};
use crate::validation::input::sanitize_identifier;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

pub const PARSED_DIR: &str = "parsed";
pub const ARTIFACTS_DIR: &str = "artifacts";
pub const SCRIPT_DIR: &str = "te3";
pub const LAYOUT_DIR: &str = "layout";

/// Arguments for the run command
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub input: PathBuf,
    pub out: PathBuf,
    pub prefer: Vec<String>,
    pub visual_limit: Option<usize>,
    pub source: SourceArgs,
    pub report_id: Option<String>,
    pub parallel: bool,
    pub template: Option<PathBuf>,
    pub dataset: Option<String>,
}

/// Paths produced by one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub parsed_meta: PathBuf,
    pub manifest: ArtifactManifest,
    pub script: PathBuf,
    pub layout: PathBuf,
}

/// Handle the run command
///
/// Report id precedence: `--report-id`, saved source selection, configured
/// report id, then the workbook's file stem. The layout dataset defaults to
/// the workbook's report name.
pub fn handle_run(
    args: &RunArgs,
    config: &ConverterConfig,
    events: &dyn EventSink,
) -> Result<RunSummary, CliError> {
    require_file(&args.input)?;
    let (source_type, source_config, selection_id) = args.source.resolve()?;

    let importer = importer_for(&args.prefer, args.visual_limit, config);
    let meta = importer.import_file(&args.input, events)?;

    let report_id = sanitize_identifier(
        args.report_id
            .clone()
            .or(selection_id)
            .or_else(|| config.report.report_id.clone())
            .as_deref()
            .unwrap_or(&meta.report_id),
    );
    info!("Running pipeline for report {}", report_id);

    let parsed_meta = args
        .out
        .join(PARSED_DIR)
        .join(format!("{}_parsed_meta.json", report_id));
    write_json(&parsed_meta, &meta, events)?;

    let options = config
        .generation_options()
        .with_report_id(report_id.clone())
        .with_parallel(args.parallel || config.generate.parallel);
    let manifest = ArtifactGenerator::new(options).generate(
        &meta,
        &args.out.join(ARTIFACTS_DIR),
        source_type,
        &source_config,
        events,
    )?;

    let spec: ModelSpec = crate::artifacts::read_json(&manifest.model_spec_path)?;
    let template = args
        .template
        .as_deref()
        .or(config.generate.template_path.as_deref());
    let script =
        Te3ScriptExporter::new().write(&spec, template, &args.out.join(SCRIPT_DIR), events)?;

    let visual_spec: VisualSpec = crate::artifacts::read_json(&manifest.visual_spec_path)?;
    let dataset = args
        .dataset
        .clone()
        .or_else(|| config.report.dataset.clone())
        .unwrap_or_else(|| meta.report_name.clone());
    let layout = args
        .out
        .join(LAYOUT_DIR)
        .join(format!("{}_report.json", report_id));
    LayoutExporter::new().write(&visual_spec, &dataset, &layout, events)?;

    Ok(RunSummary {
        parsed_meta,
        manifest,
        script,
        layout,
    })
}
