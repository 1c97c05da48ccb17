//! # Logging Setup
//!
//! Controllers log through `tracing` with a `resource` field on every event
//! (`resource="faculties"`), so one screen's traffic can be told apart from
//! another's. [`setup_tracing`] installs the subscriber for binaries.
//!
//! ```bash
//! RUST_LOG=info degree-admin list faculties     # loads, submits, notices
//! RUST_LOG=debug degree-admin list faculties    # plus tickets, drafts, stale responses
//! ```

/// Compact fmt subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // the `resource` field already says where an event came from
        .compact()
        .init();
}
