//! One-time tracing initialization for test binaries.
//!
//! Both the backend's unit tests and its integration tests call [`init`]; the
//! first caller installs the subscriber and every later call is a no-op.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Default filter when neither `TEST_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "warn";

/// Install a test-friendly tracing subscriber.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`. Setting
/// `TEST_LOG_FORMAT=json` switches to the JSON formatter used in production,
/// which helps when checking the shape of security events.
///
/// ```bash
/// TEST_LOG=dating_backend=debug cargo test -p dating-backend
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let json = std::env::var("TEST_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        // try_init: another harness may already own the global subscriber.
        if json {
            fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .without_time()
                .json()
                .try_init()
                .ok();
        } else {
            fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .without_time()
                .try_init()
                .ok();
        }
    });
}
