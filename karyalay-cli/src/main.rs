#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]

//! Main entry point for the Karyalay configuration CLI.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::Settings;
use std::path::PathBuf;

mod commands;
mod tracer;

/// Karyalay configuration CLI
#[derive(Parser)]
#[command(name = "karyalay")]
#[command(
    about = "Inspect and maintain the portal's dual-environment database configuration",
    long_about = None
)]
pub struct Cli {
    /// Path to a settings file (yaml or json)
    #[arg(long, short, global = true)]
    pub settings: Option<PathBuf>,

    /// Environment file holding the credential blocks (default: .env)
    #[arg(long, short, global = true)]
    pub env_file: Option<PathBuf>,

    /// Configured absolute base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for the Karyalay CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Classify the execution environment from request/server signals
    Detect(commands::detect::DetectArgs),

    /// Resolve which stored credential set to connect with
    Resolve(commands::resolve::ResolveArgs),

    /// Write the local or live credential block and refresh the active block
    Write(commands::write::WriteArgs),

    /// Print the externally visible base URL
    BaseUrl(commands::base_url::BaseUrlArgs),

    /// Generate a default settings file
    Config {
        /// Format of the settings file to generate (yaml or json). Defaults to yaml.
        #[arg(long, short)]
        format: Option<String>,

        /// Output path; prints to stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// Shell to generate the completion script for (bash, zsh, fish, powershell, elvish)
        #[arg(long)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load_settings(cli.settings, cli.env_file, cli.base_url)
        .context("failed to load settings")?;
    tracer::initialize_tracing(&settings);

    match cli.command {
        Commands::Detect(args) => commands::detect::detect(args),
        Commands::Resolve(args) => commands::resolve::resolve(&settings, args),
        Commands::Write(args) => commands::write::write(&settings, args),
        Commands::BaseUrl(args) => commands::base_url::base_url(&settings, args),
        Commands::Config { format, output } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            commands::config::generate_config(&format, output.as_deref())
        }
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            Ok(())
        }
    }
}
