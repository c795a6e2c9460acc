//! Tracing subscriber setup for host processes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "herofoundry_engine=debug";

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Call once from the host's `main`. Panics if a global subscriber is
/// already set, like `tracing_subscriber`'s own `init`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
