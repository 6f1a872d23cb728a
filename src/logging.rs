use std::env;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log filter (e.g. `fs_sorter=debug`).
pub const LOG_FILTER_ENV_VAR: &str = "SORTER_LOG";

pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = env::var(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| default_filter.to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Terminal output is reserved for the plan and summaries; diagnostics go to stderr.
    let _ = fmt()
        .with_env_filter(filter_layer)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
