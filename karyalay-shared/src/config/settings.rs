//! Settings of the configuration tooling itself, layered from defaults, a
//! settings file, `KARYALAY_*` variables and command-line overrides.

use crate::models::SettingsError;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, str::FromStr};
use strum::{Display, EnumString};
use tracing::level_filters::LevelFilter;
use url::Url;

/// Output format for log lines.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Settings for the configuration tooling itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Environment file holding the credential blocks.
    pub env_file: PathBuf,

    /// Logging level
    pub log_level: String,

    /// Logging output format
    pub log_format: LogFormat,

    /// Configured absolute base URL, if any
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Generates the default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            base_url: None,
        }
    }

    /// Loads settings from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `settings_path` - Optional path to a YAML or JSON settings file.
    /// * `env_file_override` - Optional environment file path from the command line.
    /// * `base_url_override` - Optional base URL from the command line.
    ///
    /// # Errors
    /// Returns a [`SettingsError`] when the file cannot be read or parsed, an
    /// environment variable is malformed, or the merged settings are invalid.
    pub fn load_settings(
        settings_path: Option<PathBuf>,
        env_file_override: Option<PathBuf>,
        base_url_override: Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut settings = match settings_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };
        let defaults = Self::with_defaults();

        // Environment variables only fill values still at their defaults
        if settings.env_file == defaults.env_file {
            if let Ok(path) = env::var("KARYALAY_ENV_FILE") {
                settings.env_file = PathBuf::from(path);
            }
        }
        if settings.log_level == defaults.log_level {
            if let Ok(level) = env::var("KARYALAY_LOG_LEVEL") {
                settings.log_level = level;
            }
        }
        if settings.log_format == defaults.log_format {
            if let Ok(format) = env::var("KARYALAY_LOG_FORMAT") {
                settings.log_format =
                    LogFormat::from_str(&format).map_err(|_| SettingsError::InvalidEnv {
                        name: "KARYALAY_LOG_FORMAT",
                        value: format.clone(),
                    })?;
            }
        }
        if settings.base_url.is_none() {
            settings.base_url = env::var("KARYALAY_BASE_URL").ok();
        }

        // Command-line arguments win
        if let Some(path) = env_file_override {
            settings.env_file = path;
        }
        if let Some(url) = base_url_override {
            settings.base_url = Some(url);
        }

        settings.validate().map_err(SettingsError::Invalid)?;
        Ok(settings)
    }

    fn from_file(path: PathBuf) -> Result<Self, SettingsError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;

        match extension.as_deref() {
            Some("yaml" | "yml") => serde_yml::from_str(&content)
                .map_err(|source| SettingsError::Yaml { path, source }),
            Some("json") => serde_json::from_str(&content)
                .map_err(|source| SettingsError::Json { path, source }),
            _ => Err(SettingsError::UnsupportedFormat(path)),
        }
    }

    /// Validates the merged settings.
    ///
    /// # Errors
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.env_file.as_os_str().is_empty() {
            errors.push("Environment file path must not be empty.".to_string());
        }

        if LevelFilter::from_str(&self.log_level).is_err() {
            errors.push(format!("Invalid log level: {}", self.log_level));
        }

        if let Some(base_url) = &self.base_url {
            match Url::parse(base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
                _ => errors.push(format!(
                    "Base URL must be an absolute http(s) URL: {base_url}"
                )),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
