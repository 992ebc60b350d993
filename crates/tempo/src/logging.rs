//! Diagnostic logging setup.
//!
//! Tempo's crates emit `tracing` events (replay start and stop, pass
//! boundaries, dropped query log entries). Nothing is printed until a
//! subscriber is installed; [`init`] installs a plain formatter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one stays in place. Safe to call more than once.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    Registry::default()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .is_ok()
}
