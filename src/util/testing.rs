//! Shared test setup.

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Install a test-writer subscriber once per process.
///
/// RUST_LOG wins when set; otherwise this crate logs at DEBUG and everything
/// else at WARN.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,regiontree=debug"));

        // Another harness may already own the global dispatcher
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
        if let Err(e) = installed {
            eprintln!("test logging not installed: {e}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_calls_when_initialising_then_idempotent() {
        init_test_setup();
        init_test_setup();
        tracing::debug!("test logging ready");
    }
}
