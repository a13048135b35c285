use shared::config::{LogFormat, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber using the provided settings.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` takes precedence over the configured level.
pub fn initialize_tracing(settings: &Settings) {
    let fmt_builder = fmt::fmt()
        .with_env_filter(build_env_filter(settings))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    // A subscriber may already be installed, e.g. when embedded in tests.
    let _ = if matches!(settings.log_format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).try_init()
    } else {
        fmt_builder.with_ansi(false).try_init()
    };
}

fn build_env_filter(settings: &Settings) -> EnvFilter {
    let default_level = settings
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy("")
    })
}
