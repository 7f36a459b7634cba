//! Diagnostic logging setup.
//!
//! Installs a process-wide `tracing` subscriber. Verbosity is an explicit
//! argument carried in [`crate::config::DriverConfig`] rather than a global
//! mutable flag; informational and error lines are always emitted, debug
//! lines (raw write payloads) only when `verbose` is set.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set, so a caller can always override
/// the verbosity from the environment. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "makcu=debug" } else { "makcu=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
