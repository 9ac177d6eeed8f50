//! Files that match the name pattern but must not be required to have a generated test.

use std::collections::BTreeSet;

use crate::errors::PathError;
use crate::path::RelPath;
use crate::pattern::NamePattern;

/// Paths (or directory fragments) under the root, plus an optional file-name pattern.
///
/// The same set is applied when generating and when verifying; see [`ExclusionSet::excludes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: BTreeSet<RelPath>,
    pattern: Option<NamePattern>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from textual relative paths, normalizing each one.
    pub fn from_paths<I, S>(paths: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|raw| RelPath::parse(raw.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { paths, pattern: None })
    }

    /// Also exclude every file whose name matches `pattern`.
    pub fn with_pattern(mut self, pattern: NamePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn insert(&mut self, path: RelPath) {
        self.paths.insert(path);
    }

    /// Whether `path` is excluded, either by an entry covering it or by the name pattern.
    pub fn excludes(&self, path: &RelPath) -> bool {
        self.covering_entry(path).is_some() || self.pattern.as_ref().is_some_and(|p| p.matches(path.file_name()))
    }

    /// The path entry that covers `path`, if any.
    pub fn covering_entry(&self, path: &RelPath) -> Option<&RelPath> {
        self.paths.iter().find(|entry| path.starts_with(entry))
    }

    /// Entries that cover none of `candidates`. Harmless, but usually a typo or a deleted file.
    pub fn unused<'a>(&'a self, candidates: &[RelPath]) -> Vec<&'a RelPath> {
        self.paths
            .iter()
            .filter(|entry| !candidates.iter().any(|candidate| candidate.starts_with(entry)))
            .collect()
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelPath> {
        self.paths.iter()
    }

    pub fn pattern(&self) -> Option<&NamePattern> {
        self.pattern.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.pattern.is_none()
    }
}
