//! SDK configuration file support
//!
//! Handles parsing of `.compliance-forms.toml` configuration files and
//! environment variable overrides.

use crate::export::xlsx::{DEFAULT_IMPORT_SHEET, DEFAULT_KV_SHEET};
use crate::models::TemplateIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".compliance-forms.toml";

/// Environment variable for the API base URL
pub const ENV_API_URL: &str = "COMPLIANCE_FORMS_API_URL";

/// Environment variable for the API request timeout in seconds
pub const ENV_API_TIMEOUT_SECS: &str = "COMPLIANCE_FORMS_API_TIMEOUT_SECS";

/// Environment variable for the import template sheet name
pub const ENV_IMPORT_SHEET: &str = "COMPLIANCE_FORMS_IMPORT_SHEET";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Error type for configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Config error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// API configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the compliance service
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Import configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSection {
    /// Sheet name of generated import templates
    #[serde(default = "default_import_sheet")]
    pub sheet_name: String,
}

fn default_import_sheet() -> String {
    DEFAULT_IMPORT_SHEET.to_string()
}

impl Default for ImportSection {
    fn default() -> Self {
        Self {
            sheet_name: default_import_sheet(),
        }
    }
}

/// Export configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Sheet name of parameter listings
    #[serde(default = "default_kv_sheet")]
    pub kv_sheet_name: String,

    /// Display labels per template identifier, overriding the built-in ones
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

fn default_kv_sheet() -> String {
    DEFAULT_KV_SHEET.to_string()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            kv_sheet_name: default_kv_sheet(),
            templates: BTreeMap::new(),
        }
    }
}

impl ExportSection {
    /// Display label of a template identifier.
    pub fn template_label<'a>(&'a self, identifier: &TemplateIdentifier) -> &'a str {
        self.templates
            .get(identifier.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| identifier.label())
    }
}

/// Main configuration structure
///
/// Represents the `.compliance-forms.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SdkConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub import: ImportSection,

    #[serde(default)]
    pub export: ExportSection,
}

impl SdkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a working directory
    ///
    /// Looks for `.compliance-forms.toml` in the directory.
    /// Falls back to defaults if not found.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let config_path = dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;

            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        std::fs::write(dir.join(CONFIG_FILENAME), content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup(ENV_API_TIMEOUT_SECS)
            && let Ok(timeout) = timeout.parse()
        {
            self.api.timeout_secs = timeout;
        }

        if let Some(sheet) = lookup(ENV_IMPORT_SHEET) {
            self.import.sheet_name = sheet;
        }
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Compliance Forms SDK Configuration

[api]
# Base URL of the compliance service
base_url = "http://localhost:8080/api"

# Request timeout in seconds
timeout_secs = 30

[import]
# Sheet name of generated import templates
sheet_name = "import"

[export]
# Sheet name of parameter listings
kv_sheet_name = "info"

# Template identifier labels
[export.templates]
"core.employee.document" = "人员档案"
"core.vehicle" = "车辆档案"
"#
}
