//! Converter configuration file support
//!
//! Handles parsing of `.bi-migrate.toml` configuration files and
//! environment variable overrides.

use crate::artifacts::{DEFAULT_REPORT_ID, GenerationOptions};
use crate::import::ExtractOptions;
use crate::import::extract::DEFAULT_VISUAL_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".bi-migrate.toml";

/// Environment variable for the report id
pub const ENV_REPORT_ID: &str = "BI_MIGRATE_REPORT_ID";

/// Report id variable read by the original pipeline scripts
pub const ENV_LEGACY_REPORT_ID: &str = "REPORT_ID";

/// Environment variable for the per-worksheet visual limit
pub const ENV_VISUAL_LIMIT: &str = "BI_MIGRATE_VISUAL_LIMIT";

/// Error loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Config error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Extraction configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractSection {
    /// Visuals kept per worksheet
    #[serde(default = "default_visual_limit")]
    pub visual_limit: usize,

    /// Bundle member names tried before the first `.twb` member
    #[serde(default)]
    pub preferred_members: Vec<String>,
}

fn default_visual_limit() -> usize {
    DEFAULT_VISUAL_LIMIT
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            visual_limit: default_visual_limit(),
            preferred_members: Vec::new(),
        }
    }
}

/// Generation configuration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateSection {
    /// Run independent generators on worker threads
    #[serde(default)]
    pub parallel: bool,

    /// Authoring script template; the bundled template when unset
    #[serde(default)]
    pub template_path: Option<PathBuf>,
}

/// Report identity section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub report_id: Option<String>,

    /// Dataset the report layout binds to
    #[serde(default)]
    pub dataset: Option<String>,
}

/// Main configuration structure
///
/// Represents the `.bi-migrate.toml` configuration file format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub extract: ExtractSection,

    #[serde(default)]
    pub generate: GenerateSection,

    #[serde(default)]
    pub report: ReportSection,
}

impl ConverterConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.bi-migrate.toml` in `dir`. Falls back to defaults if not
    /// found. Environment overrides are applied either way.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(&dir.join(CONFIG_FILENAME))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load one file without environment overrides; defaults if it is absent.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(dir.join(CONFIG_FILENAME), content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// `BI_MIGRATE_REPORT_ID` wins over `REPORT_ID`; an unparsable visual
    /// limit is ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(ENV_REPORT_ID).or_else(|| lookup(ENV_LEGACY_REPORT_ID)) {
            self.report.report_id = Some(id);
        }

        if let Some(limit) = lookup(ENV_VISUAL_LIMIT).and_then(|v| v.trim().parse().ok()) {
            self.extract.visual_limit = limit;
        }
    }

    /// Report id from configuration, else [`DEFAULT_REPORT_ID`].
    pub fn report_id(&self) -> &str {
        self.report.report_id.as_deref().unwrap_or(DEFAULT_REPORT_ID)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default().with_visual_limit(self.extract.visual_limit)
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::default()
            .with_report_id(self.report_id())
            .with_parallel(self.generate.parallel)
    }

    /// Check if configuration exists in a directory
    pub fn exists(dir: &Path) -> bool {
        dir.join(CONFIG_FILENAME).exists()
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# BI migration converter configuration

[extract]
# Maximum number of visuals kept per worksheet
visual_limit = 10

# Workbook members tried first inside a .twbx bundle
# preferred_members = ["Sales.twb"]

[generate]
# Write DAX, visual spec and Power Query files on worker threads
parallel = false

# Authoring script template (the bundled template when unset)
# template_path = "templates/apply_modelspec_template.csx"

[report]
# Report id used for artifact names (env: BI_MIGRATE_REPORT_ID, REPORT_ID)
# report_id = "sales"

# Dataset name the report layout binds to
# dataset = "Sales"
"#
}
