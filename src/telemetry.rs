//! Logging setup for the `scattergraph` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it. The binary calls [`init_default_tracing`].

/// Install a compact `tracing` subscriber writing to stderr, filtered by
/// `RUST_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
