//! Database credential sets.

use serde::{Deserialize, Serialize};
use url::Url;

/// Port written when the caller does not supply one.
pub const DEFAULT_PORT: &str = "3306";

const REDACTED: &str = "********";

/// One database connection profile.
///
/// Only the field values are ever persisted, as flat `KEY=VALUE` lines in the
/// environment file; the struct itself is built transiently on each read.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    /// Database host, may be empty when a unix socket is used instead.
    pub host: String,
    /// Database port. An explicitly empty port stays empty.
    pub port: String,
    /// Database (schema) name.
    pub database: String,
    /// Login user.
    pub username: String,
    /// Login password, arbitrary characters allowed.
    pub password: String,
    /// Filesystem path of a local unix socket, may be empty.
    pub unix_socket: String,
}

impl CredentialSet {
    /// Returns whether this profile can be used to connect at all.
    ///
    /// A set is usable when it names a database and has somewhere to reach it:
    /// a host or a unix socket.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.database.is_empty() && (!self.host.is_empty() || !self.unix_socket.is_empty())
    }

    /// Returns a copy with the password masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = REDACTED.to_string();
        }
        copy
    }

    /// Renders the connection URL handed to the database layer.
    ///
    /// Returns `None` for an invalid set or a host the URL grammar rejects.
    /// When only a unix socket is configured the socket path travels in the
    /// `socket` query parameter.
    #[must_use]
    pub fn connection_url(&self) -> Option<Url> {
        if !self.is_valid() {
            return None;
        }

        let mut url = Url::parse("mysql://localhost").ok()?;
        if !self.host.is_empty() {
            url.set_host(Some(&self.host)).ok()?;
            if let Ok(port) = self.port.parse::<u16>() {
                url.set_port(Some(port)).ok()?;
            }
        }
        if !self.username.is_empty() {
            url.set_username(&self.username).ok()?;
        }
        if !self.password.is_empty() {
            url.set_password(Some(&self.password)).ok()?;
        }
        url.set_path(&format!("/{}", self.database));
        if self.host.is_empty() {
            url.query_pairs_mut()
                .append_pair("socket", &self.unix_socket);
        }

        Some(url)
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED };
        f.debug_struct("CredentialSet")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &password)
            .field("unix_socket", &self.unix_socket)
            .finish()
    }
}

/// Credentials as supplied by a caller, with key presence preserved.
///
/// `None` means the key was absent from the caller's input; `Some("")` means
/// it was present but empty. The distinction matters for the port, which is
/// defaulted only when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialInput {
    /// Database host.
    pub host: Option<String>,
    /// Database port; defaulted only when `None`.
    pub port: Option<String>,
    /// Database (schema) name.
    pub database: Option<String>,
    /// Login user.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Filesystem path of a local unix socket.
    pub unix_socket: Option<String>,
}

impl CredentialInput {
    /// Converts the input into the set that will be written.
    ///
    /// The port falls back to [`DEFAULT_PORT`] only when the key is absent;
    /// every other absent field becomes an empty string.
    #[must_use]
    pub fn into_credentials(self) -> CredentialSet {
        CredentialSet {
            host: self.host.unwrap_or_default(),
            port: match self.port {
                Some(port) => port,
                None => DEFAULT_PORT.to_string(),
            },
            database: self.database.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            unix_socket: self.unix_socket.unwrap_or_default(),
        }
    }
}

impl From<CredentialSet> for CredentialInput {
    fn from(set: CredentialSet) -> Self {
        Self {
            host: Some(set.host),
            port: Some(set.port),
            database: Some(set.database),
            username: Some(set.username),
            password: Some(set.password),
            unix_socket: Some(set.unix_socket),
        }
    }
}
