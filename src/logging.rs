//! Tracing setup for binaries.
//!
//! The library only emits spans and events; installing a subscriber is left
//! to the host. `simulate` calls [`init`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`, `warn` when unset.
///
/// ```bash
/// RUST_LOG=ludo_rules=debug cargo run --bin simulate -- --seed 1
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A host may already have installed one; keep it
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
