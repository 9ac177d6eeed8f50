//! testsync version information.
//!
//! Generated suites record the version that produced them in their header, and the CLI reports the
//! same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The testsync version string (for example, `0.1.0`).
pub const TESTSYNC_VERSION: &str = env!("CARGO_PKG_VERSION");
