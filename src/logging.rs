// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level filter from RUST_LOG (default: info)
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Human-readable logs on stderr.
///
/// # Environment
/// - RUST_LOG: level filter, e.g. `RUST_LOG=debug` or
///   `RUST_LOG=printer_inventory::importer=trace`
///
/// # Example
/// ```no_run
/// use printer_inventory::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// One JSON object per event on stderr, for log shippers
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Test logging: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
