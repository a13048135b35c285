use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use shared::config::{CredentialResolver, EnvFile, Settings};
use shared::models::CredentialInput;

use super::resolve::print_result;
use super::signals::SignalArgs;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Local,
    Live,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Credential family to write
    #[arg(long, short, value_enum)]
    pub target: Target,

    #[arg(long)]
    pub host: Option<String>,

    /// Database port; defaults to 3306 when omitted, an empty value is kept empty
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub unix_socket: Option<String>,

    #[command(flatten)]
    pub signals: SignalArgs,
}

/// Writes one credential block and refreshes the active `DB_*` block.
///
/// # Errors
/// Fails when the environment file cannot be written.
pub fn write(settings: &Settings, args: WriteArgs) -> Result<()> {
    let input = CredentialInput {
        host: args.host,
        port: args.port,
        database: args.database,
        username: args.username,
        password: args.password,
        unix_socket: args.unix_socket,
    };
    let (local, live) = match args.target {
        Target::Local => (Some(input), None),
        Target::Live => (None, Some(input)),
    };

    let resolver = CredentialResolver::new(
        EnvFile::new(&settings.env_file),
        args.signals.into_signals(),
    );
    let result = resolver
        .write_dual_config(local, live)
        .with_context(|| format!("failed to update {}", settings.env_file.display()))?;

    println!("updated: {}", settings.env_file.display());
    print_result(&result, false);
    Ok(())
}
