//! Tracing setup for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// `TEST_LOG`, else `RUST_LOG`, else `warn`.
fn filter_from_env() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a test-writer subscriber once per process; later calls are no-ops.
///
/// Set `TEST_LOG_SPANS=1` to also log span close events with their timings.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let spans = match std::env::var("TEST_LOG_SPANS").as_deref() {
            Ok("1") | Ok("true") => FmtSpan::CLOSE,
            _ => FmtSpan::NONE,
        };

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter_from_env())
            .with_span_events(spans)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
