//! Structured logging setup.
//!
//! Installs a `tracing` subscriber honoring `RUST_LOG`, defaulting to
//! `wavealign=info`, writing human-readable output to stderr or JSON when
//! `RUST_LOG_FORMAT=json`.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber with the default filter. Idempotent:
/// later calls are no-ops.
pub fn init() {
    init_with_default("wavealign=info");
}

/// Initialize with an explicit fallback filter for embedders that want their
/// own default verbosity.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
