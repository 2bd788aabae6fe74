//! Diagnostic tracing to stderr.
//!
//! Stdout is reserved for the final record; everything here goes to stderr and
//! is controlled by `RUST_LOG` (default `warn`).
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `verbose` raises the fallback filter to
/// debug output for this crate when `RUST_LOG` is unset.
pub fn init(verbose: bool) {
    let fallback = if verbose { "devjoke=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
