//! Tracing setup for embedding applications.
//!
//! The library itself only emits `tracing` events; hosts that want them on
//! stderr without wiring their own subscriber can call [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
