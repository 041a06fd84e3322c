//! CLI-specific error types

use crate::artifacts::ArtifactError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::import::ImportError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Artifact error: {0}")]
    ArtifactError(#[from] ArtifactError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// | code | cause |
    /// |------|-------|
    /// | 2 | input or template file missing |
    /// | 3 | workbook unreadable (archive, decoding, extension) |
    /// | 4 | workbook markup unusable |
    /// | 5 | extraction or write failure |
    /// | 6 | unsupported source, invalid argument or config |
    /// | 7 | authoring script not generated |
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::FileNotFound(_) => 2,
            CliError::ImportError(e) => import_exit_code(e),
            CliError::ExportError(e) => export_exit_code(e),
            CliError::ArtifactError(ArtifactError::ImportError(e)) => import_exit_code(e),
            CliError::ArtifactError(ArtifactError::ExportError(e)) => export_exit_code(e),
            CliError::ArtifactError(_) => 5,
            CliError::ConfigError(_) | CliError::InvalidArgument(_) => 6,
            CliError::IoError(_) => 5,
        }
    }
}

fn import_exit_code(err: &ImportError) -> i32 {
    match err {
        ImportError::InputNotFound(_) => 2,
        ImportError::UnsupportedInput(_)
        | ImportError::ArchiveMemberNotFound(_)
        | ImportError::Archive(_)
        | ImportError::Decode(_)
        | ImportError::IoError(_) => 3,
        ImportError::MalformedMarkup(_) => 4,
    }
}

fn export_exit_code(err: &ExportError) -> i32 {
    match err {
        ExportError::TemplateNotFound(_) => 2,
        ExportError::UnsupportedSourceType(_)
        | ExportError::InvalidSourceConfig(_)
        | ExportError::MissingConfigKey { .. } => 6,
        ExportError::ScriptNotGenerated(_) => 7,
        ExportError::SerializationError(_) | ExportError::IoError(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    #[test]
    fn test_import_exit_codes() {
        let code = |e: ImportError| CliError::from(e).exit_code();
        assert_eq!(code(ImportError::InputNotFound(PathBuf::from("x.twb"))), 2);
        assert_eq!(code(ImportError::UnsupportedInput(PathBuf::from("x.pdf"))), 3);
        assert_eq!(code(ImportError::Archive("bad zip".to_string())), 3);
        assert_eq!(code(ImportError::MalformedMarkup("empty".to_string())), 4);
    }

    #[test]
    fn test_export_exit_codes() {
        let code = |e: ExportError| CliError::from(e).exit_code();
        assert_eq!(code(ExportError::UnsupportedSourceType("csv".to_string())), 6);
        assert_eq!(
            code(ExportError::MissingConfigKey {
                source_type: SourceType::Sql,
                key: "server".to_string(),
            }),
            6
        );
        assert_eq!(code(ExportError::ScriptNotGenerated(PathBuf::from("out"))), 7);
        assert_eq!(code(ExportError::TemplateNotFound(PathBuf::from("t.csx"))), 2);
        assert_eq!(code(ExportError::IoError("denied".to_string())), 5);
    }

    #[test]
    fn test_artifact_errors_use_inner_code() {
        let err = CliError::from(ArtifactError::from(ExportError::UnsupportedSourceType(
            "csv".to_string(),
        )));
        assert_eq!(err.exit_code(), 6);

        let err = CliError::from(ArtifactError::IoError("disk full".to_string()));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(CliError::InvalidArgument("x".to_string()).exit_code(), 6);
        assert_eq!(CliError::FileNotFound(PathBuf::from("m.json")).exit_code(), 2);
    }
}
