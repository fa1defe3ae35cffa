//! Tracing bootstrap.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with a formatted subscriber.
///
/// Honors `RUST_LOG` and falls back to `info`. Calling it again once a
/// subscriber is installed is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
