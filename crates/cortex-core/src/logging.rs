//! Structured logging with `tracing`.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`init_subscriber`] once at startup.

/// Initialize the global tracing subscriber with stderr output.
///
/// Subsequent calls are no-ops. `RUST_LOG` takes precedence over `level`.
///
/// # Arguments
///
/// * `level` - Minimum log level to display (e.g. `"warn"`, `"cortex_runtime=debug"`).
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber with JSON lines on stderr.
pub fn init_json_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .try_init();
}
