use anyhow::Result;
use clap::Args;
use shared::config::{Settings, resolve_base_url};

use super::signals::SignalArgs;

#[derive(Args, Debug)]
pub struct BaseUrlArgs {
    #[command(flatten)]
    pub signals: SignalArgs,
}

/// Prints the externally visible base URL.
///
/// # Errors
/// Never fails once settings are loaded; an invalid configured URL is
/// already rejected by [`Settings::validate`].
pub fn base_url(settings: &Settings, args: BaseUrlArgs) -> Result<()> {
    let signals = args.signals.into_signals();
    println!("{}", resolve_base_url(&signals, settings.base_url.as_deref()));
    Ok(())
}
