//! Externally visible base URL.
//!
//! Used when generating absolute links. The result never ends in `/`.

use crate::models::ServerSignals;
use crate::models::signals::signal;

/// Entry-point directories stripped from the script path.
const ENTRY_DIRECTORIES: &[&str] = &["install", "public", "admin", "app"];

/// Detects the request protocol, `https` or `http`.
#[must_use]
pub fn detect_protocol(signals: &ServerSignals) -> &'static str {
    let https = signal(signals.https.as_ref());
    let forwarded = signal(signals.forwarded_proto.as_ref()).trim();
    let port = signal(signals.server_port.as_ref()).trim();

    let secure = (!https.is_empty() && https != "off")
        || forwarded.eq_ignore_ascii_case("https")
        || port == "443";
    if secure { "https" } else { "http" }
}

/// Detects the public host, including a non-default port when one applies.
#[must_use]
pub fn detect_host(signals: &ServerSignals) -> String {
    let forwarded = signal(signals.forwarded_host.as_ref())
        .split(',')
        .next()
        .unwrap_or_default()
        .trim();
    if !forwarded.is_empty() {
        return forwarded.to_string();
    }

    let http_host = signal(signals.http_host.as_ref());
    if !http_host.is_empty() {
        return http_host.to_string();
    }

    let server_name = signal(signals.server_name.as_ref());
    if !server_name.is_empty() {
        let port = signal(signals.server_port.as_ref()).trim();
        let embedded = server_name.ends_with(&format!(":{port}"));
        if !port.is_empty() && port != "80" && port != "443" && !embedded {
            return format!("{server_name}:{port}");
        }
        return server_name.to_string();
    }

    "localhost".to_string()
}

/// Detects the deployment base path from the script path.
///
/// The trailing file name is dropped, then a final entry directory such as
/// `install` or `public` is stripped once. `/portal/install/index.php`
/// yields `/portal`; `/install/index.php` yields the empty string.
#[must_use]
pub fn detect_base_path(signals: &ServerSignals) -> String {
    let script = signal(signals.script_name.as_ref()).replace('\\', "/");
    let mut segments: Vec<&str> = script.split('/').filter(|s| !s.is_empty()).collect();

    if segments.last().is_some_and(|last| last.contains('.')) {
        segments.pop();
    }
    if segments
        .last()
        .is_some_and(|last| ENTRY_DIRECTORIES.contains(last))
    {
        segments.pop();
    }

    if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Resolves the base URL for absolute links.
///
/// With a configured URL, its host and path are kept verbatim but the scheme
/// is replaced by the detected protocol, since a TLS-terminating proxy makes
/// the configured scheme untrustworthy. Without one, the URL is assembled
/// from the detected protocol, host and base path.
#[must_use]
pub fn resolve_base_url(signals: &ServerSignals, configured: Option<&str>) -> String {
    let protocol = detect_protocol(signals);

    let configured_rest = configured
        .map(str::trim)
        .map(|url| url.split_once("://").map_or(url, |(_, rest)| rest))
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|rest| !rest.is_empty());

    let url = match configured_rest {
        Some(rest) => format!("{protocol}://{rest}"),
        None => format!(
            "{protocol}://{}{}",
            detect_host(signals),
            detect_base_path(signals)
        ),
    };

    url.trim_end_matches('/').to_string()
}
