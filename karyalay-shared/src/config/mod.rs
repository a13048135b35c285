//! # Configuration
//!
//! Dual-environment database configuration: environment classification,
//! the `KEY=VALUE` environment file codec, credential resolution, base URL
//! detection, and the settings of the tooling itself.

pub mod base_url;
pub mod env_file;
pub mod environment;
pub mod keys;
pub mod resolver;
pub mod settings;

pub use base_url::resolve_base_url;
pub use env_file::{EnvDocument, EnvFile};
pub use environment::detect_environment;
pub use keys::{CredentialField, KeyPrefix, prefix_for_environment};
pub use resolver::CredentialResolver;
pub use settings::{LogFormat, Settings};
