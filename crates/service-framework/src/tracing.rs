//! # Observability & Tracing
//!
//! The framework logs through the `tracing` crate with structured fields:
//!
//! - **Requests**: every service call runs in a span carrying `service` and `action`;
//!   the method and URL are logged at `debug`, the outcome at `info`/`warn`.
//! - **Routes**: the built URL at `debug`.
//! - **Events**: every emission with its handler count at `debug`, handler registration
//!   at `trace`.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run     # outcomes only
//! RUST_LOG=debug cargo run    # URLs and emitted events
//! RUST_LOG=service_framework=trace cargo run
//! ```

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
