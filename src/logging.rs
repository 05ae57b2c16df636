use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Verbosity is read from `RUST_LOG` (for instance `RUST_LOG=grubdash=debug`), and defaults to
/// `info` when the variable is unset or invalid. Calling this more than once is harmless, later
/// calls are ignored.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
