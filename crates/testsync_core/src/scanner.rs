//! List the test-data files a suite is expected to cover.
//!
//! The scanner does not walk directories itself: a [`FileSource`] supplies raw file listings and the
//! scanner applies the name pattern, the exclusions, normalization and ordering. [`WalkDirSource`] is
//! the file-system implementation.
//!
//! ## Notes
//!
//! - Results are sorted by normalized relative path, so two scans of an unchanged directory are identical.
//! - Only regular files count. Symlinks are not followed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::ScanError;
use crate::exclusions::ExclusionSet;
use crate::path::RelPath;
use crate::pattern::NamePattern;

/// Supplies the files under a root directory.
pub trait FileSource {
    /// List regular files under `root` (direct children only unless `recursive`).
    ///
    /// Paths must start with `root`; the scanner strips it.
    fn list_files(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError>;
}

/// [`FileSource`] backed by `walkdir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirSource;

impl FileSource for WalkDirSource {
    fn list_files(&self, root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
        let metadata = fs::metadata(root).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
            _ => ScanError::Io {
                path: root.to_path_buf(),
                source,
            },
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| ScanError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// The `(root, pattern, exclusions)` tuple shared by generation and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSpec {
    pub root: PathBuf,
    pub pattern: NamePattern,
    pub exclusions: ExclusionSet,
    pub recursive: bool,
}

impl ScanSpec {
    /// Recursive scan of `root` with no exclusions.
    pub fn new(root: impl Into<PathBuf>, pattern: NamePattern) -> Self {
        Self {
            root: root.into(),
            pattern,
            exclusions: ExclusionSet::new(),
            recursive: true,
        }
    }

    /// Build from textual configuration, reporting a malformed pattern as [`ScanError::Pattern`].
    pub fn parse<I, S>(root: impl Into<PathBuf>, pattern: &str, exclusions: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = NamePattern::new(pattern)?;
        let exclusions = ExclusionSet::from_paths(exclusions)?;
        Ok(Self::new(root, pattern).with_exclusions(exclusions))
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Point-in-time, ordered list of matching, non-excluded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    paths: Vec<RelPath>,
}

impl ScanResult {
    pub fn paths(&self) -> &[RelPath] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<RelPath> {
        self.paths
    }

    pub fn contains(&self, path: &RelPath) -> bool {
        self.paths.binary_search(path).is_ok()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelPath> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a RelPath;
    type IntoIter = std::slice::Iter<'a, RelPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Scan the file system.
pub fn scan(spec: &ScanSpec) -> Result<ScanResult, ScanError> {
    scan_with(&WalkDirSource, spec)
}

/// Scan using an explicit [`FileSource`].
#[tracing::instrument(skip_all, fields(root = %spec.root.display(), recursive = spec.recursive))]
pub fn scan_with(source: &dyn FileSource, spec: &ScanSpec) -> Result<ScanResult, ScanError> {
    let files = source.list_files(&spec.root, spec.recursive)?;

    let mut candidates = Vec::new();
    for file in &files {
        // A name that is not UTF-8 cannot match the pattern.
        let Some(name) = file.file_name().and_then(|name| name.to_str()) else {
            tracing::debug!(file = %file.display(), "skipping non-UTF-8 file name");
            continue;
        };
        if spec.pattern.matches(name) {
            candidates.push(RelPath::from_root(&spec.root, file)?);
        }
    }

    let unused = spec.exclusions.unused(&candidates);
    if !unused.is_empty() {
        tracing::warn!(?unused, "exclusions match no test-data file");
    }

    let mut paths: Vec<RelPath> = candidates
        .into_iter()
        .filter(|rel| !spec.exclusions.excludes(rel))
        .collect();
    paths.sort();
    paths.dedup();

    tracing::debug!(listed = files.len(), matched = paths.len(), "scan complete");
    Ok(ScanResult { paths })
}
