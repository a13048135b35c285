use anyhow::Result;
use clap::Args;
use shared::config::environment::local_signal;
use shared::config::{KeyPrefix, detect_environment};

use super::signals::SignalArgs;

#[derive(Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub signals: SignalArgs,
}

/// Prints the environment classification for the given signals.
///
/// # Errors
/// Classification itself cannot fail; the `Result` keeps the command
/// signature uniform with the other subcommands.
pub fn detect(args: DetectArgs) -> Result<()> {
    let signals = args.signals.into_signals();
    let detected = detect_environment(&signals);
    let label = detected.active_label();

    println!("detected: {detected}");
    println!("label: {label}");
    println!("prefix: {}", KeyPrefix::from(label));
    if let Some(matched) = local_signal(&signals) {
        println!("matched: {matched:?}");
    }
    Ok(())
}
