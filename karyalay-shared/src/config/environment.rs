//! Environment classification from ambient server signals.

use tracing::debug;

use crate::models::signals::signal;
use crate::models::{DetectedEnvironment, ServerSignals};

const LOCAL_SERVER_NAMES: &[&str] = &["localhost", "127.0.0.1", "::1", "localhost.localdomain"];
const LOCAL_ADDRESSES: &[&str] = &["127.0.0.1", "::1", "0.0.0.0"];
const DEVELOPMENT_SUFFIXES: &[&str] = &[".local", ".test", ".dev"];
const LOCAL_STACK_BANNERS: &[&str] = &["xampp", "mamp", "wamp"];

/// The rule that classified a run as local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSignal {
    /// Server name is a loopback name or address.
    ServerName,
    /// Server is bound to a loopback or wildcard address.
    ServerAddr,
    /// Client connected from a loopback or wildcard address.
    RemoteAddr,
    /// Server name ends in a development-only domain.
    DevelopmentDomain,
    /// Server software banner names a desktop web stack.
    LocalStack,
}

/// Returns the first local rule the signals match, checked in priority order.
#[must_use]
pub fn local_signal(signals: &ServerSignals) -> Option<LocalSignal> {
    let server_name = signal(signals.server_name.as_ref());
    let server_addr = signal(signals.server_addr.as_ref());
    let remote_addr = signal(signals.remote_addr.as_ref());
    let software = signal(signals.server_software.as_ref()).to_ascii_lowercase();
    let lowered_name = server_name.to_ascii_lowercase();

    if LOCAL_SERVER_NAMES.contains(&server_name) {
        Some(LocalSignal::ServerName)
    } else if LOCAL_ADDRESSES.contains(&server_addr) {
        Some(LocalSignal::ServerAddr)
    } else if LOCAL_ADDRESSES.contains(&remote_addr) {
        Some(LocalSignal::RemoteAddr)
    } else if DEVELOPMENT_SUFFIXES
        .iter()
        .any(|suffix| lowered_name.ends_with(suffix))
    {
        Some(LocalSignal::DevelopmentDomain)
    } else if LOCAL_STACK_BANNERS
        .iter()
        .any(|banner| software.contains(banner))
    {
        Some(LocalSignal::LocalStack)
    } else {
        None
    }
}

/// Classifies the current run as `localhost` or `production`.
///
/// Pure function of the signals; absent signals never match and anything
/// unrecognized is production.
#[must_use]
pub fn detect_environment(signals: &ServerSignals) -> DetectedEnvironment {
    let matched = local_signal(signals);
    let detected = if matched.is_some() {
        DetectedEnvironment::Localhost
    } else {
        DetectedEnvironment::Production
    };
    debug!(?matched, environment = %detected, "classified execution environment");
    detected
}
