//! Generate command: ParsedMetadata JSON → artifact tree

use super::{SourceArgs, require_file};
use crate::artifacts::{ArtifactGenerator, read_json, save_source_selection};
use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::events::EventSink;
use crate::models::{ArtifactManifest, ParsedMetadata, SourceSelection};
use std::path::PathBuf;

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// ParsedMetadata JSON
    pub input: PathBuf,
    /// Artifact root directory
    pub out: PathBuf,
    pub source: SourceArgs,
    pub report_id: Option<String>,
    pub parallel: bool,
    /// Also persist the source selection as `<out>/<reportId>_source.json`
    pub save_source: bool,
}

/// Report id precedence: command line, saved selection, configuration.
fn resolve_report_id(
    explicit: Option<&str>,
    selection: Option<String>,
    config: &ConverterConfig,
) -> String {
    explicit
        .map(str::to_string)
        .or(selection)
        .unwrap_or_else(|| config.report_id().to_string())
}

/// Handle the generate command
pub fn handle_generate(
    args: &GenerateArgs,
    config: &ConverterConfig,
    events: &dyn EventSink,
) -> Result<ArtifactManifest, CliError> {
    require_file(&args.input)?;
    let (source_type, source_config, selection_id) = args.source.resolve()?;
    let meta: ParsedMetadata = read_json(&args.input)?;

    let report_id = resolve_report_id(args.report_id.as_deref(), selection_id, config);
    let options = config
        .generation_options()
        .with_report_id(report_id.clone())
        .with_parallel(args.parallel || config.generate.parallel);

    let manifest =
        ArtifactGenerator::new(options).generate(
            &meta,
            &args.out,
            source_type,
            &source_config,
            events,
        )?;

    if args.save_source {
        let selection = SourceSelection {
            report_id: manifest.report_id.clone(),
            source_type,
            source_config,
        };
        save_source_selection(&args.out, &selection, events)?;
    }

    Ok(manifest)
}
