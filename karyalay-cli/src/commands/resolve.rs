use anyhow::{Context, Result, bail};
use clap::Args;
use shared::config::{CredentialResolver, EnvFile, Settings};
use shared::models::ResolutionResult;

use super::signals::SignalArgs;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the password instead of masking it
    #[arg(long)]
    pub show_password: bool,

    #[command(flatten)]
    pub signals: SignalArgs,
}

/// Resolves which credential set this run connects with and prints it.
///
/// # Errors
/// Fails when neither stored credential set is usable.
pub fn resolve(settings: &Settings, args: ResolveArgs) -> Result<()> {
    let resolver = CredentialResolver::new(
        EnvFile::new(&settings.env_file),
        args.signals.into_signals(),
    );
    let result = resolver.resolve();

    if args.json {
        let mut shown = result.clone();
        if !args.show_password {
            shown.credentials = shown.credentials.map(|set| set.redacted());
        }
        let json = serde_json::to_string_pretty(&shown).context("failed to serialize result")?;
        println!("{json}");
    } else {
        print_result(&result, args.show_password);
    }

    if !result.is_resolved() {
        bail!(
            "no valid database credentials in {}; configure DB_LOCAL_* or DB_LIVE_*",
            settings.env_file.display()
        );
    }
    Ok(())
}

pub(crate) fn print_result(result: &ResolutionResult, reveal_password: bool) {
    for line in result_lines(result, reveal_password) {
        println!("{line}");
    }
}

/// Renders a resolution as `key: value` lines.
///
/// The password is masked unless revealed, and the connection URL, which
/// embeds the password, is only shown alongside the real one.
fn result_lines(result: &ResolutionResult, reveal_password: bool) -> Vec<String> {
    let environment = result
        .environment
        .map_or_else(|| "none".to_string(), |environment| environment.to_string());
    let mut lines = vec![
        format!("detected: {}", result.detected_environment),
        format!("environment: {environment}"),
        format!("local_available: {}", result.local_available),
        format!("live_available: {}", result.live_available),
    ];

    if let Some(credentials) = &result.credentials {
        let shown = if reveal_password {
            credentials.clone()
        } else {
            credentials.redacted()
        };
        lines.extend([
            format!("host: {}", shown.host),
            format!("port: {}", shown.port),
            format!("database: {}", shown.database),
            format!("username: {}", shown.username),
            format!("password: {}", shown.password),
            format!("unix_socket: {}", shown.unix_socket),
        ]);
        if reveal_password || credentials.password.is_empty() {
            if let Some(url) = credentials.connection_url() {
                lines.push(format!("connection_url: {url}"));
            }
        }
    }
    lines
}
