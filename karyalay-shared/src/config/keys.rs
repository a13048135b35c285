//! Credential key naming.
//!
//! Three key families share the same six suffixes: `DB_LOCAL_*`, `DB_LIVE_*`
//! and the active `DB_*` alias that mirrors whichever family was resolved.
//! Names are exact and case-sensitive.

use crate::models::{CredentialEnvironment, CredentialSet, DEFAULT_PORT};
use std::collections::HashMap;

/// A credential key family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPrefix {
    /// `DB_LOCAL_*`, the developer-machine credentials.
    Local,
    /// `DB_LIVE_*`, the production credentials.
    Live,
    /// `DB_*`, mirror of whichever family was resolved.
    Active,
}

impl KeyPrefix {
    /// Key prefix text, including the trailing underscore.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "DB_LOCAL_",
            Self::Live => "DB_LIVE_",
            Self::Active => "DB_",
        }
    }

    /// Builds the full key for one field of this family.
    #[must_use]
    pub fn key(self, field: CredentialField) -> String {
        format!("{}{}", self.as_str(), field.suffix())
    }
}

impl From<CredentialEnvironment> for KeyPrefix {
    fn from(environment: CredentialEnvironment) -> Self {
        match environment {
            CredentialEnvironment::Local => Self::Local,
            CredentialEnvironment::Live => Self::Live,
        }
    }
}

impl std::fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the six per-family key suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    /// `*HOST`
    Host,
    /// `*PORT`
    Port,
    /// `*NAME`, the database name.
    Name,
    /// `*USER`
    User,
    /// `*PASS`
    Pass,
    /// `*UNIX_SOCKET`
    UnixSocket,
}

impl CredentialField {
    /// Every suffix, in the order blocks are written.
    pub const ALL: [Self; 6] = [
        Self::Host,
        Self::Port,
        Self::Name,
        Self::User,
        Self::Pass,
        Self::UnixSocket,
    ];

    /// Key suffix text.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::Port => "PORT",
            Self::Name => "NAME",
            Self::User => "USER",
            Self::Pass => "PASS",
            Self::UnixSocket => "UNIX_SOCKET",
        }
    }

    /// Reads the value this suffix stores from a credential set.
    #[must_use]
    pub fn value(self, set: &CredentialSet) -> &str {
        match self {
            Self::Host => &set.host,
            Self::Port => &set.port,
            Self::Name => &set.database,
            Self::User => &set.username,
            Self::Pass => &set.password,
            Self::UnixSocket => &set.unix_socket,
        }
    }
}

/// Maps an environment label to its key prefix.
///
/// `"local"` yields `DB_LOCAL_`, `"live"` yields `DB_LIVE_`; any other label
/// has no prefix.
#[must_use]
pub fn prefix_for_environment(label: &str) -> Option<&'static str> {
    label
        .parse::<CredentialEnvironment>()
        .ok()
        .map(|environment| KeyPrefix::from(environment).as_str())
}

/// Returns `true` if `key` belongs to any of the three credential families.
#[must_use]
pub fn is_credential_key(key: &str) -> bool {
    [KeyPrefix::Local, KeyPrefix::Live, KeyPrefix::Active]
        .iter()
        .any(|prefix| {
            CredentialField::ALL
                .iter()
                .any(|field| key == prefix.key(*field))
        })
}

/// Assembles the credential set stored under `prefix` from parsed values.
///
/// An absent port key falls back to the default port; an absent key for any
/// other field reads as empty.
#[must_use]
pub fn credentials_from_values(
    values: &HashMap<String, String>,
    prefix: KeyPrefix,
) -> CredentialSet {
    let get = |field: CredentialField| values.get(&prefix.key(field)).cloned();
    CredentialSet {
        host: get(CredentialField::Host).unwrap_or_default(),
        port: get(CredentialField::Port).unwrap_or_else(|| DEFAULT_PORT.to_string()),
        database: get(CredentialField::Name).unwrap_or_default(),
        username: get(CredentialField::User).unwrap_or_default(),
        password: get(CredentialField::Pass).unwrap_or_default(),
        unix_socket: get(CredentialField::UnixSocket).unwrap_or_default(),
    }
}
