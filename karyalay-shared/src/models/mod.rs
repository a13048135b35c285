//! Plain data shared by the configuration core and its callers.

pub mod credentials;
pub mod environment;
pub mod errors;
pub mod signals;

pub use credentials::{CredentialInput, CredentialSet, DEFAULT_PORT};
pub use environment::{CredentialEnvironment, DetectedEnvironment, ResolutionResult};
pub use errors::{EnvFileError, SettingsError};
pub use signals::ServerSignals;
