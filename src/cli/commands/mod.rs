//! CLI command implementations

pub mod generate;
pub mod layout;
pub mod parse;
pub mod run;
pub mod script;

use crate::cli::error::CliError;
use crate::config::ConverterConfig;
use crate::models::{SourceConfig, SourceSelection, SourceType};
use std::path::{Path, PathBuf};

/// Load `.bi-migrate.toml` from `dir` (the working directory when `None`),
/// with environment overrides applied.
pub fn load_config(dir: Option<&Path>) -> Result<ConverterConfig, CliError> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| CliError::IoError(format!("Failed to resolve working directory: {}", e)))?,
    };
    Ok(ConverterConfig::load(&dir)?)
}

/// Fail with [`CliError::FileNotFound`] unless `path` is an existing file.
pub fn require_file(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::FileNotFound(path.to_path_buf()))
    }
}

/// Where a stage takes its data source selection from.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub source_type: Option<String>,
    /// JSON object text
    pub source_config: Option<String>,
    /// Saved `<reportId>_source.json`
    pub source_file: Option<PathBuf>,
}

impl SourceArgs {
    /// Resolve to a type and config.
    ///
    /// A source file wins over inline arguments. The selection's report id
    /// is returned when it came from a file.
    pub fn resolve(&self) -> Result<(SourceType, SourceConfig, Option<String>), CliError> {
        if let Some(path) = &self.source_file {
            require_file(path)?;
            let selection: SourceSelection = crate::artifacts::load_source_selection(path)?;
            return Ok((
                selection.source_type,
                selection.source_config,
                Some(selection.report_id),
            ));
        }

        match (&self.source_type, &self.source_config) {
            (Some(source_type), Some(config)) => {
                let source_type: SourceType = source_type.parse()?;
                let config = SourceConfig::from_json(config)?;
                Ok((source_type, config, None))
            }
            _ => Err(CliError::InvalidArgument(
                "either --source-file or both --source-type and --source-config are required"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use tempfile::TempDir;

    #[test]
    fn test_inline_source() {
        let args = SourceArgs {
            source_type: Some("sql".to_string()),
            source_config: Some(r#"{"server": "db"}"#.to_string()),
            source_file: None,
        };
        let (source_type, config, report_id) = args.resolve().unwrap();
        assert_eq!(source_type, SourceType::Sql);
        assert_eq!(config.value("server").as_deref(), Some("db"));
        assert!(report_id.is_none());
    }

    #[test]
    fn test_source_file_wins() {
        let dir = TempDir::new().unwrap();
        let selection = SourceSelection {
            report_id: "sales".to_string(),
            source_type: SourceType::Fabric,
            source_config: SourceConfig::new().with("workspace", "ws"),
        };
        let path =
            crate::artifacts::save_source_selection(dir.path(), &selection, &NullSink).unwrap();

        let args = SourceArgs {
            source_type: Some("excel".to_string()),
            source_config: Some("{}".to_string()),
            source_file: Some(path),
        };
        let (source_type, _, report_id) = args.resolve().unwrap();
        assert_eq!(source_type, SourceType::Fabric);
        assert_eq!(report_id.as_deref(), Some("sales"));
    }

    #[test]
    fn test_missing_source_arguments() {
        let args = SourceArgs {
            source_type: Some("sql".to_string()),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_unknown_source_type() {
        let args = SourceArgs {
            source_type: Some("csv".to_string()),
            source_config: Some("{}".to_string()),
            source_file: None,
        };
        assert_eq!(args.resolve().unwrap_err().exit_code(), 6);
    }

    #[test]
    fn test_missing_source_file() {
        let args = SourceArgs {
            source_file: Some(PathBuf::from("/nonexistent/report_source.json")),
            ..Default::default()
        };
        assert_eq!(args.resolve().unwrap_err().exit_code(), 2);
    }
}
