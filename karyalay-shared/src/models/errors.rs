//! Error types of the configuration core.

use std::path::PathBuf;
use thiserror::Error;

/// I/O failures raised while persisting the environment file.
///
/// These never describe credential content: writing an invalid credential
/// set succeeds, only the filesystem can make a write fail.
#[derive(Debug, Error)]
pub enum EnvFileError {
    /// The file or its symlink chain could not be read for an update
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The sidecar lock file could not be opened or locked
    #[error("failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The updated document could not be written to a temporary sibling
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The temporary sibling could not be renamed over the target
    #[error("failed to replace {path} with the updated document: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvFileError {
    /// Path of the file the failed operation targeted.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Lock { path, .. }
            | Self::Write { path, .. }
            | Self::Persist { path, .. } => path,
        }
    }
}

/// Failures while loading the tool's own settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Settings file extension is neither yaml, yml nor json
    #[error("unsupported settings format for {0}; use yaml or json")]
    UnsupportedFormat(PathBuf),
    /// Settings file is not valid YAML for [`crate::config::Settings`]
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
    /// Settings file is not valid JSON for [`crate::config::Settings`]
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// An environment variable holds an unparseable value
    #[error("invalid {name} value: {value}")]
    InvalidEnv { name: &'static str, value: String },
    /// Merged settings failed validation; one message per problem
    #[error("invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
