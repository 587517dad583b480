//! Tracing subscriber setup for the CLI and the gateway.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// `verbose` turns on debug output for this crate; `server` keeps info level
/// logs on for the long running gateway.
pub fn init_logging(verbose: bool, server: bool) {
    let (level_filter, level) = match (verbose, server) {
        (true, _) => (LevelFilter::DEBUG, "debug"),
        (false, true) => (LevelFilter::INFO, "info"),
        (false, false) => (LevelFilter::OFF, "off"),
    };
    let env_filter = EnvFilter::try_from_default_env();
    // RUST_LOG takes over entirely when set
    let app_filter = if env_filter.is_ok() {
        Targets::new().with_default(LevelFilter::TRACE)
    } else {
        Targets::new().with_target("cotiza", level_filter)
    };
    let env_filter = env_filter.unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = if server {
        fmt::layer().compact().boxed()
    } else {
        fmt::layer().pretty().without_time().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(app_filter)
        .with(env_filter)
        .init();
}
