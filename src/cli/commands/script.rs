//! Script command: ModelSpec JSON → TE3 authoring script

use super::require_file;
use crate::artifacts::read_json;
use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::events::EventSink;
use crate::export::Te3ScriptExporter;
use crate::models::ModelSpec;
use std::path::PathBuf;

/// Arguments for the script command
#[derive(Debug, Clone)]
pub struct ScriptArgs {
    /// `<reportId>_modelspec.json`
    pub model: PathBuf,
    /// Template; the configured one, else the bundled one, when unset
    pub template: Option<PathBuf>,
    pub out: PathBuf,
}

/// Handle the script command
pub fn handle_script(
    args: &ScriptArgs,
    config: &ConverterConfig,
    events: &dyn EventSink,
) -> Result<PathBuf, CliError> {
    require_file(&args.model)?;
    let spec: ModelSpec = read_json(&args.model)?;

    let template = args
        .template
        .as_deref()
        .or(config.generate.template_path.as_deref());
    Ok(Te3ScriptExporter::new().write(&spec, template, &args.out, events)?)
}
