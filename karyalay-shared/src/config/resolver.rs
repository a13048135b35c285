//! # Credential resolution
//!
//! Picks which stored credential family the application connects with for
//! the current run. The detected environment decides the preferred family;
//! the other family is the single fallback. The chosen set is always taken
//! whole from one family, never blended.
//!
//! | detected     | first choice | fallback |
//! |--------------|--------------|----------|
//! | `production` | live         | local    |
//! | `localhost`  | local        | live     |

use std::collections::HashMap;

use tracing::{info, warn};

use super::env_file::EnvFile;
use super::environment::detect_environment;
use super::keys::{KeyPrefix, credentials_from_values};
use crate::models::{
    CredentialEnvironment, CredentialInput, CredentialSet, DetectedEnvironment, EnvFileError,
    ResolutionResult, ServerSignals,
};

/// Chooses between two credential sets for a detected environment.
#[must_use]
pub fn choose_credentials(
    detected: DetectedEnvironment,
    local: CredentialSet,
    live: CredentialSet,
) -> ResolutionResult {
    let local_available = local.is_valid();
    let live_available = live.is_valid();
    let available = |environment: CredentialEnvironment| match environment {
        CredentialEnvironment::Local => local_available,
        CredentialEnvironment::Live => live_available,
    };

    let preferred = detected.active_label();
    let environment = [preferred, preferred.other()]
        .into_iter()
        .find(|candidate| available(*candidate));
    let credentials = environment.map(|chosen| match chosen {
        CredentialEnvironment::Local => local,
        CredentialEnvironment::Live => live,
    });

    ResolutionResult {
        credentials,
        environment,
        detected_environment: detected,
        local_available,
        live_available,
    }
}

/// Resolves credentials from parsed file values.
#[must_use]
pub fn resolve_values(
    values: &HashMap<String, String>,
    detected: DetectedEnvironment,
) -> ResolutionResult {
    choose_credentials(
        detected,
        credentials_from_values(values, KeyPrefix::Local),
        credentials_from_values(values, KeyPrefix::Live),
    )
}

/// Resolves and maintains the dual-environment credentials of one file.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env_file: EnvFile,
    signals: ServerSignals,
}

impl CredentialResolver {
    #[must_use]
    pub fn new(env_file: EnvFile, signals: ServerSignals) -> Self {
        Self { env_file, signals }
    }

    #[must_use]
    pub fn env_file(&self) -> &EnvFile {
        &self.env_file
    }

    #[must_use]
    pub fn signals(&self) -> &ServerSignals {
        &self.signals
    }

    #[must_use]
    pub fn detected_environment(&self) -> DetectedEnvironment {
        detect_environment(&self.signals)
    }

    /// Resolves the credentials to connect with for this run.
    ///
    /// Read-only: calling it repeatedly without an intervening write yields
    /// identical results.
    #[must_use]
    pub fn resolve(&self) -> ResolutionResult {
        let result = resolve_values(&self.env_file.read_all(), self.detected_environment());
        log_resolution(&result);
        result
    }

    /// Persists the given credential blocks and refreshes the active `DB_*`
    /// block to mirror the resolved set.
    ///
    /// `None` leaves that family's stored block untouched. When neither
    /// family is usable after the update, the active block is left as it was.
    ///
    /// # Errors
    /// Fails only on filesystem errors; see [`EnvFile::update`].
    pub fn write_dual_config(
        &self,
        local: Option<CredentialInput>,
        live: Option<CredentialInput>,
    ) -> Result<ResolutionResult, EnvFileError> {
        let detected = self.detected_environment();
        let local = local.map(CredentialInput::into_credentials);
        let live = live.map(CredentialInput::into_credentials);

        let result = self.env_file.update(|document| {
            if let Some(credentials) = &local {
                document.upsert_credentials(KeyPrefix::Local, credentials);
            }
            if let Some(credentials) = &live {
                document.upsert_credentials(KeyPrefix::Live, credentials);
            }

            let result = resolve_values(&document.values(), detected);
            if let Some(credentials) = &result.credentials {
                document.upsert_credentials(KeyPrefix::Active, credentials);
            }
            result
        })?;

        info!(
            path = %self.env_file.path().display(),
            local = local.is_some(),
            live = live.is_some(),
            "wrote dual database configuration"
        );
        log_resolution(&result);
        Ok(result)
    }
}

fn log_resolution(result: &ResolutionResult) {
    match result.environment {
        Some(environment) => info!(
            detected = %result.detected_environment,
            environment = %environment,
            "resolved database credentials"
        ),
        None => warn!(
            detected = %result.detected_environment,
            "no valid database credentials configured"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_file::EnvDocument;
    use std::fs;
    use tempfile::TempDir;

    fn credentials(host: &str, valid: bool) -> CredentialSet {
        CredentialSet {
            host: host.to_string(),
            port: "3306".to_string(),
            database: if valid { "portal".to_string() } else { String::new() },
            username: format!("{host}_user"),
            password: format!("{host}_pass"),
            unix_socket: String::new(),
        }
    }

    fn input(host: &str) -> CredentialInput {
        CredentialInput::from(credentials(host, true))
    }

    fn production() -> ServerSignals {
        ServerSignals::default()
            .with_server_name("example.com")
            .with_server_addr("203.0.113.50")
    }

    fn localhost() -> ServerSignals {
        ServerSignals::default().with_server_name("localhost")
    }

    #[test]
    fn test_preference_table_is_exhaustive() {
        use CredentialEnvironment::{Live, Local};
        use DetectedEnvironment::{Localhost, Production};

        let cases = [
            (Production, true, true, Some(Live)),
            (Production, true, false, Some(Local)),
            (Production, false, true, Some(Live)),
            (Production, false, false, None),
            (Localhost, true, true, Some(Local)),
            (Localhost, true, false, Some(Local)),
            (Localhost, false, true, Some(Live)),
            (Localhost, false, false, None),
        ];

        for (detected, local_valid, live_valid, expected) in cases {
            let local = credentials("local-db", local_valid);
            let live = credentials("live-db", live_valid);
            let result = choose_credentials(detected, local.clone(), live.clone());

            assert_eq!(result.environment, expected, "{detected} {local_valid} {live_valid}");
            assert_eq!(result.detected_environment, detected);
            assert_eq!(result.local_available, local_valid);
            assert_eq!(result.live_available, live_valid);
            let expected_credentials = expected.map(|environment| match environment {
                Local => local,
                Live => live,
            });
            assert_eq!(result.credentials, expected_credentials);
        }
    }

    #[test]
    fn test_socket_only_set_is_eligible() {
        let local = CredentialSet {
            host: String::new(),
            unix_socket: "/tmp/mysql.sock".to_string(),
            ..credentials("local-db", true)
        };
        let result = choose_credentials(
            DetectedEnvironment::Production,
            local,
            CredentialSet::default(),
        );
        assert_eq!(result.environment, Some(CredentialEnvironment::Local));
    }

    #[test]
    fn test_resolve_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            concat!(
                "DB_LOCAL_HOST=127.0.0.1\nDB_LOCAL_NAME=portal_dev\n",
                "DB_LIVE_HOST=db.example.com\nDB_LIVE_NAME=portal\n",
            ),
        )
        .unwrap();

        let live = CredentialResolver::new(EnvFile::new(&path), production()).resolve();
        assert_eq!(live.environment, Some(CredentialEnvironment::Live));
        let live_credentials = live.credentials.expect("live credentials");
        assert_eq!(live_credentials.host, "db.example.com");
        assert_eq!(live_credentials.port, "3306");

        let local = CredentialResolver::new(EnvFile::new(&path), localhost()).resolve();
        assert_eq!(local.environment, Some(CredentialEnvironment::Local));
        assert_eq!(local.credentials.map(|c| c.database).as_deref(), Some("portal_dev"));
    }

    #[test]
    fn test_resolve_missing_file_yields_none() {
        let dir = TempDir::new().unwrap();
        let resolver = CredentialResolver::new(EnvFile::new(dir.path().join(".env")), production());
        let result = resolver.resolve();

        assert!(!result.is_resolved());
        assert_eq!(result.environment, None);
        assert_eq!(result.detected_environment, DetectedEnvironment::Production);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let resolver = CredentialResolver::new(EnvFile::new(dir.path().join(".env")), localhost());
        resolver
            .write_dual_config(Some(input("local-db")), Some(input("live-db")))
            .unwrap();

        assert_eq!(resolver.resolve(), resolver.resolve());
    }

    #[test]
    fn test_write_dual_config_mirrors_active_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "APP_NAME=portal\nDB_HOST=stale\n").unwrap();
        let resolver = CredentialResolver::new(EnvFile::new(&path), production());

        let result = resolver
            .write_dual_config(Some(input("local-db")), Some(input("live-db")))
            .unwrap();
        assert_eq!(result.environment, Some(CredentialEnvironment::Live));

        let document = EnvDocument::parse(&fs::read_to_string(&path).unwrap());
        assert_eq!(document.get("APP_NAME").as_deref(), Some("portal"));
        assert_eq!(document.credentials(KeyPrefix::Active), credentials("live-db", true));
        assert_eq!(document.credentials(KeyPrefix::Local), credentials("local-db", true));
        assert_eq!(document.occurrences("DB_HOST"), 1);
    }

    #[test]
    fn test_write_dual_config_falls_back_to_stored_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let resolver = CredentialResolver::new(EnvFile::new(&path), production());

        resolver.write_dual_config(Some(input("local-db")), None).unwrap();
        let document = EnvFile::new(&path).load();
        assert_eq!(document.get("DB_HOST").as_deref(), Some("local-db"));

        let result = resolver.write_dual_config(None, Some(input("live-db"))).unwrap();
        assert_eq!(result.environment, Some(CredentialEnvironment::Live));
        let document = EnvFile::new(&path).load();
        assert_eq!(document.get("DB_HOST").as_deref(), Some("live-db"));
        assert_eq!(document.get("DB_LOCAL_HOST").as_deref(), Some("local-db"));
    }

    #[test]
    fn test_write_dual_config_without_valid_sets_keeps_active_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DB_HOST=previous\n").unwrap();
        let resolver = CredentialResolver::new(EnvFile::new(&path), localhost());

        let invalid = CredentialInput {
            database: Some(String::new()),
            ..input("local-db")
        };
        let result = resolver.write_dual_config(Some(invalid), None).unwrap();

        assert!(!result.is_resolved());
        let document = EnvFile::new(&path).load();
        assert_eq!(document.get("DB_HOST").as_deref(), Some("previous"));
        assert_eq!(document.get("DB_LOCAL_HOST").as_deref(), Some("local-db"));
    }

    #[test]
    fn test_write_dual_config_reports_io_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let resolver = CredentialResolver::new(EnvFile::new(blocker.join(".env")), production());

        assert!(resolver.write_dual_config(Some(input("local-db")), None).is_err());
    }
}
