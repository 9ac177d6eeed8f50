//! Error taxonomy for discovery, registry construction and completeness checks.
//!
//! Every error here is fatal for the operation that produced it. Nothing is retried and nothing is
//! auto-repaired: the remedy for a [`CheckError`] is always to regenerate the suite.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::checker::Discrepancy;
use crate::path::RelPath;

/// A path could not be brought into normalized relative form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path '{0}' is absolute; test-data paths are relative to the root")]
    Absolute(String),

    #[error("path '{0}' leaves the root through '..'")]
    ParentComponent(String),

    #[error("path '{path}' is not under root '{root}'")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("path '{0}' is not valid UTF-8")]
    NonUtf8(PathBuf),
}

/// The file-name matching rule is malformed.
#[derive(Debug, Error)]
#[error("invalid name pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Errors raised while listing test-data files.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    #[error("test-data root '{0}' does not exist")]
    #[diagnostic(
        code(testsync::root_not_found),
        help("check the suite's `root` setting; it is resolved relative to the config file")
    )]
    NotFound(PathBuf),

    #[error("test-data root '{0}' is not a directory")]
    #[diagnostic(code(testsync::root_not_a_directory))]
    NotADirectory(PathBuf),

    #[error(transparent)]
    #[diagnostic(code(testsync::bad_pattern))]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    #[diagnostic(code(testsync::bad_path))]
    Path(#[from] PathError),

    #[error("failed to read '{path}': {source}")]
    #[diagnostic(code(testsync::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk '{root}': {source}")]
    #[diagnostic(code(testsync::io))]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors raised while building a [`Registry`](crate::registry::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("test-data path '{0}' is registered twice")]
    DuplicatePath(RelPath),

    #[error("test unit '{id}' would be generated for both '{first}' and '{second}'; rename one of the files")]
    DuplicateUnitId { id: String, first: RelPath, second: RelPath },

    #[error("'{0}' is not a valid test unit identifier")]
    InvalidUnitId(String),

    #[error("cannot derive a test name from '{0}'")]
    Unnameable(RelPath),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// The generated suite and the test-data directory disagree, or the directory could not be scanned.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),

    #[error("generated suite is missing tests for existing test-data files\n{0}")]
    #[diagnostic(
        code(testsync::orphan_files),
        help("regenerate the suite with `testsync generate`, or add the files to `exclude`")
    )]
    OrphanFiles(Discrepancy),

    #[error("generated suite has tests for test-data files that no longer exist\n{0}")]
    #[diagnostic(
        code(testsync::stale_entries),
        help("regenerate the suite with `testsync generate`, or set `stale = \"ignore\"`")
    )]
    StaleEntries(Discrepancy),

    #[error("generated suite has a corrupt registry: {0}")]
    #[diagnostic(
        code(testsync::corrupt_registry),
        help("the generated file was edited by hand; regenerate it with `testsync generate`")
    )]
    Registry(#[from] RegistryError),
}

impl CheckError {
    /// The discrepancy behind this failure, if it is one.
    pub fn discrepancy(&self) -> Option<&Discrepancy> {
        match self {
            CheckError::OrphanFiles(d) | CheckError::StaleEntries(d) => Some(d),
            CheckError::Scan(_) | CheckError::Registry(_) => None,
        }
    }
}
