//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset: scheduler lifecycle at `info`.
pub const DEFAULT_DIRECTIVE: &str = "prometheus_control_flow=info";

/// Initialize tracing. Users can install their own subscriber; this helper
/// installs an env-filtered fmt subscriber if none is set.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_DIRECTIVE);
}

/// Like [`init_tracing`], falling back to `directive` when `RUST_LOG` is unset
/// or unparsable. Pass `"prometheus_control_flow=debug"` to see every dispatch.
pub fn init_tracing_with(directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
