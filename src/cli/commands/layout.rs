//! Layout command: visual spec JSON → report layout JSON

use super::require_file;
use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::events::EventSink;
use crate::export::{LayoutExporter, RandomIds};
use crate::models::ReportLayout;
use std::path::PathBuf;

/// Arguments for the layout command
#[derive(Debug, Clone)]
pub struct LayoutArgs {
    /// `<reportId>_visual.json`
    pub visual: PathBuf,
    /// Dataset to bind; the configured dataset when unset
    pub dataset: Option<String>,
    pub out: PathBuf,
    /// Random section and container names instead of position-derived ones
    pub random_ids: bool,
}

/// Dataset precedence: command line, then `[report] dataset`.
pub fn resolve_dataset(
    explicit: Option<&str>,
    config: &ConverterConfig,
) -> Result<String, CliError> {
    explicit
        .map(str::to_string)
        .or_else(|| config.report.dataset.clone())
        .ok_or_else(|| CliError::InvalidArgument("--dataset is required".to_string()))
}

/// Handle the layout command
pub fn handle_layout(
    args: &LayoutArgs,
    config: &ConverterConfig,
    events: &dyn EventSink,
) -> Result<ReportLayout, CliError> {
    let dataset = resolve_dataset(args.dataset.as_deref(), config)?;
    require_file(&args.visual)?;

    let spec = LayoutExporter::load_visual_spec(&args.visual)?;
    let exporter = if args.random_ids {
        LayoutExporter::with_ids(RandomIds)
    } else {
        LayoutExporter::new()
    };
    Ok(exporter.write(&spec, &dataset, &args.out, events)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::write_json;
    use crate::events::NullSink;
    use crate::models::{Page, Visual, VisualSpec};
    use tempfile::TempDir;

    fn write_visual(dir: &TempDir) -> PathBuf {
        let spec = VisualSpec {
            report_id: "sales".to_string(),
            generated_at: None,
            pages: vec![Page {
                name: "Overview".to_string(),
                visuals: vec![Visual {
                    id: None,
                    visual_type: "Table".to_string(),
                    title: Some("Orders".to_string()),
                    fields: vec!["Region".to_string()],
                }],
            }],
        };
        let path = dir.path().join("sales_visual.json");
        write_json(&path, &spec, &NullSink).unwrap();
        path
    }

    #[test]
    fn test_layout_uses_configured_dataset() {
        let dir = TempDir::new().unwrap();
        let mut config = ConverterConfig::default();
        config.report.dataset = Some("SalesModel".to_string());
        let args = LayoutArgs {
            visual: write_visual(&dir),
            dataset: None,
            out: dir.path().join("report.json"),
            random_ids: false,
        };

        let layout = handle_layout(&args, &config, &NullSink).unwrap();
        assert_eq!(layout.sections.len(), 1);
        assert_eq!(
            layout.sections[0].visual_containers[0].prototype_query.from[0].entity,
            "SalesModel"
        );
        assert!(args.out.is_file());
    }

    #[test]
    fn test_dataset_required() {
        let dir = TempDir::new().unwrap();
        let args = LayoutArgs {
            visual: write_visual(&dir),
            dataset: None,
            out: dir.path().join("report.json"),
            random_ids: false,
        };
        let err = handle_layout(&args, &ConverterConfig::default(), &NullSink).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_missing_visual_spec() {
        let dir = TempDir::new().unwrap();
        let args = LayoutArgs {
            visual: dir.path().join("missing.json"),
            dataset: Some("Sales".to_string()),
            out: dir.path().join("report.json"),
            random_ids: true,
        };
        let err = handle_layout(&args, &ConverterConfig::default(), &NullSink).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
