//! `tracing_subscriber` initialiser for the binary, mirroring the
//! teacher's use of `tracing` for its own CLI diagnostics.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info` when unset. Call once, at the top of `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
