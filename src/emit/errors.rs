//! Define error types for generated-suite emission.
//!
//! These errors mean the suite could not be turned into valid Rust. They are reported before anything
//! is written to disk.
//!
//! ## Notes
//!
//! - Prefer actionable messages: users should know which file or setting to change.

/// Error during suite emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The emitted tokens did not form a valid Rust file.
    SynParse(String),
    /// `backend` is not a Rust path expression.
    BadBackendPath(String),
    /// A generated unit would shadow the completeness-check function.
    NameClash(String),
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::SynParse(msg) => write!(f, "syn parse error: {}", msg),
            EmitError::BadBackendPath(path) => write!(f, "backend '{}' is not a Rust path", path),
            EmitError::NameClash(name) => {
                write!(f, "test unit '{}' clashes with the completeness check; rename the file", name)
            }
        }
    }
}

impl std::error::Error for EmitError {}
