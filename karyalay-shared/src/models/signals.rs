//! Ambient request/server signals.
//!
//! The configuration core never reads a live request object or process-wide
//! state. The HTTP entry point (or the CLI) collects the handful of values it
//! needs into a [`ServerSignals`] bundle and passes that bundle in explicitly.

use serde::{Deserialize, Serialize};
use std::env;

/// A plain bundle of the request/server values the configuration core consults.
///
/// Every field is optional. An absent signal behaves exactly like an empty
/// string: it simply fails to match any rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSignals {
    /// Virtual host name the server believes it is serving (`SERVER_NAME`).
    pub server_name: Option<String>,
    /// Address the server is bound to (`SERVER_ADDR`).
    pub server_addr: Option<String>,
    /// Address of the connecting client (`REMOTE_ADDR`).
    pub remote_addr: Option<String>,
    /// Server software banner (`SERVER_SOFTWARE`).
    pub server_software: Option<String>,
    /// TLS indicator (`HTTPS`); any value other than `off` means TLS.
    pub https: Option<String>,
    /// `X-Forwarded-Proto` header.
    pub forwarded_proto: Option<String>,
    /// `X-Forwarded-Host` header, possibly a comma-separated list.
    pub forwarded_host: Option<String>,
    /// `Host` header.
    pub http_host: Option<String>,
    /// Server port (`SERVER_PORT`).
    pub server_port: Option<String>,
    /// Path of the executing script (`SCRIPT_NAME`).
    pub script_name: Option<String>,
}

impl ServerSignals {
    /// Builds a bundle from CGI-style process variables.
    ///
    /// Only meant for process edges such as the CLI; library code should
    /// always receive an explicit bundle.
    #[must_use]
    pub fn from_cgi_env() -> Self {
        let var = |name: &str| env::var(name).ok();
        Self {
            server_name: var("SERVER_NAME"),
            server_addr: var("SERVER_ADDR"),
            remote_addr: var("REMOTE_ADDR"),
            server_software: var("SERVER_SOFTWARE"),
            https: var("HTTPS"),
            forwarded_proto: var("HTTP_X_FORWARDED_PROTO"),
            forwarded_host: var("HTTP_X_FORWARDED_HOST"),
            http_host: var("HTTP_HOST"),
            server_port: var("SERVER_PORT"),
            script_name: var("SCRIPT_NAME"),
        }
    }

    /// Sets the server name.
    #[must_use]
    pub fn with_server_name(mut self, value: impl Into<String>) -> Self {
        self.server_name = Some(value.into());
        self
    }

    /// Sets the server address.
    #[must_use]
    pub fn with_server_addr(mut self, value: impl Into<String>) -> Self {
        self.server_addr = Some(value.into());
        self
    }

    /// Sets the remote (client) address.
    #[must_use]
    pub fn with_remote_addr(mut self, value: impl Into<String>) -> Self {
        self.remote_addr = Some(value.into());
        self
    }

    /// Sets the server software banner.
    #[must_use]
    pub fn with_server_software(mut self, value: impl Into<String>) -> Self {
        self.server_software = Some(value.into());
        self
    }

    /// Sets the `HTTPS` indicator.
    #[must_use]
    pub fn with_https(mut self, value: impl Into<String>) -> Self {
        self.https = Some(value.into());
        self
    }

    /// Sets the `X-Forwarded-Proto` header.
    #[must_use]
    pub fn with_forwarded_proto(mut self, value: impl Into<String>) -> Self {
        self.forwarded_proto = Some(value.into());
        self
    }

    /// Sets the `X-Forwarded-Host` header.
    #[must_use]
    pub fn with_forwarded_host(mut self, value: impl Into<String>) -> Self {
        self.forwarded_host = Some(value.into());
        self
    }

    /// Sets the `Host` header.
    #[must_use]
    pub fn with_http_host(mut self, value: impl Into<String>) -> Self {
        self.http_host = Some(value.into());
        self
    }

    /// Sets the server port.
    #[must_use]
    pub fn with_server_port(mut self, value: impl Into<String>) -> Self {
        self.server_port = Some(value.into());
        self
    }

    /// Sets the script path.
    #[must_use]
    pub fn with_script_name(mut self, value: impl Into<String>) -> Self {
        self.script_name = Some(value.into());
        self
    }
}

/// Reads an optional signal as a string slice, treating absence as empty.
pub(crate) fn signal(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}
