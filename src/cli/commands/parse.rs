//! Parse command: workbook → ParsedMetadata JSON

use crate::artifacts::write_json;
use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::events::EventSink;
use crate::import::WorkbookImporter;
use crate::models::ParsedMetadata;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the parse command
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// `.twb` or `.twbx` workbook
    pub input: PathBuf,
    /// ParsedMetadata JSON destination
    pub output: PathBuf,
    /// Bundle members tried first; the configured list when empty
    pub prefer: Vec<String>,
    pub visual_limit: Option<usize>,
}

/// Build the importer for `args`, falling back to `config` for anything
/// not given on the command line.
pub fn importer_for(
    prefer: &[String],
    visual_limit: Option<usize>,
    config: &ConverterConfig,
) -> WorkbookImporter {
    let mut options = config.extract_options();
    if let Some(limit) = visual_limit {
        options = options.with_visual_limit(limit);
    }
    let members = if prefer.is_empty() {
        config.extract.preferred_members.clone()
    } else {
        prefer.to_vec()
    };
    WorkbookImporter::new()
        .with_options(options)
        .with_preferred_members(members)
}

/// Handle the parse command
pub fn handle_parse(
    args: &ParseArgs,
    config: &ConverterConfig,
    events: &dyn EventSink,
) -> Result<ParsedMetadata, CliError> {
    info!(
        "Starting parse: input={} output={}",
        args.input.display(),
        args.output.display()
    );

    let importer = importer_for(&args.prefer, args.visual_limit, config);
    let meta = importer.import_file(&args.input, events)?;
    write_json(&args.output, &meta, events)?;

    info!("Parsed metadata written to {}", args.output.display());
    Ok(meta)
}
