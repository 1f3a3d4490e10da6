//! tracing subscriber setup for the binary

use crate::common::GlobalOpts;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Pick the filter: `RUST_LOG`, then the command line flags, then the
/// settings file, then warnings only.
pub fn resolve_filter(opts: &GlobalOpts, settings_filter: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = opts
        .log_filter()
        .or(settings_filter)
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_logging(opts: &GlobalOpts, settings_filter: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(resolve_filter(opts, settings_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
