//! Environment classification and resolution outcome types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::CredentialSet;

/// Execution context inferred from ambient server signals.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DetectedEnvironment {
    /// A developer machine or local stack.
    Localhost,
    /// Anything that is not recognizably local.
    Production,
}

impl DetectedEnvironment {
    /// Maps the detected context to the credential family it prefers.
    #[must_use]
    pub const fn active_label(self) -> CredentialEnvironment {
        match self {
            Self::Localhost => CredentialEnvironment::Local,
            Self::Production => CredentialEnvironment::Live,
        }
    }
}

/// One of the two stored credential families.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CredentialEnvironment {
    /// The `DB_LOCAL_*` block.
    Local,
    /// The `DB_LIVE_*` block.
    Live,
}

impl CredentialEnvironment {
    /// The other family, used as the fallback during resolution.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Local => Self::Live,
            Self::Live => Self::Local,
        }
    }
}

/// Outcome of one credential resolution.
///
/// Built fresh on every call; `credentials` and `environment` are both `None`
/// when neither stored set is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The winning set, taken whole from a single family.
    pub credentials: Option<CredentialSet>,
    /// Family the winning set came from.
    pub environment: Option<CredentialEnvironment>,
    /// Raw classifier verdict for this run.
    pub detected_environment: DetectedEnvironment,
    /// Whether the `DB_LOCAL_*` block is usable.
    pub local_available: bool,
    /// Whether the `DB_LIVE_*` block is usable.
    pub live_available: bool,
}

impl ResolutionResult {
    /// Returns `true` when a credential set was chosen.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.credentials.is_some()
    }
}
