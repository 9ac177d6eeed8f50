//! Normalized relative paths.
//!
//! A [`RelPath`] is the comparison key between a live scan and a registry. Both sides must be built
//! through this module, otherwise `a/b.kt` and `a\b.kt` (or `./a/b.kt`) would show up as discrepancies.
//!
//! Normal form:
//! - components are separated by `/`, whatever the host separator,
//! - empty and `.` components are dropped,
//! - case is preserved and comparisons are case-sensitive,
//! - absolute paths and `..` components are rejected.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PathError;

/// A normalized path relative to a test-data root.
///
/// Ordering is plain byte-wise string ordering, which is what the scanner sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelPath(String);

impl RelPath {
    /// Normalize a textual relative path (registry keys, exclusion entries, CLI input).
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(PathError::Absolute(raw.to_string()));
        }

        let mut parts = Vec::new();
        for part in unified.split('/') {
            match part {
                "" | "." => {}
                ".." => return Err(PathError::ParentComponent(raw.to_string())),
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            return Err(PathError::Empty);
        }
        let joined = parts.join("/");
        // `./C:/x` only shows its drive once `.` is dropped.
        if has_drive_prefix(&joined) {
            return Err(PathError::Absolute(raw.to_string()));
        }
        Ok(Self(joined))
    }

    /// Normalize a path found on disk under `root`.
    pub fn from_root(root: &Path, path: &Path) -> Result<Self, PathError> {
        let relative = path.strip_prefix(root).map_err(|_| PathError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| PathError::NonUtf8(path.to_path_buf()))?;
                    parts.push(part);
                }
                Component::CurDir => {}
                Component::ParentDir => return Err(PathError::ParentComponent(path.display().to_string())),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PathError::Absolute(path.display().to_string()));
                }
            }
        }

        // Same normal form as textual keys, so names containing `\` are treated alike on both sides.
        Self::parse(&parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path components, outermost first.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The final component.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Directory components leading to the file, outermost first.
    pub fn parent_components(&self) -> impl Iterator<Item = &str> {
        let dir = match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        };
        dir.split('/').filter(|part| !part.is_empty())
    }

    /// Whether `self` equals `prefix` or lies inside the directory `prefix`.
    ///
    /// Matching is per component: `sub` covers `sub/a.kt` but not `subway/a.kt`.
    pub fn starts_with(&self, prefix: &RelPath) -> bool {
        match self.0.strip_prefix(prefix.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }

    /// Join onto a root directory using host separators.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.components());
        path
    }
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && (bytes.len() == 2 || bytes[2] == b'/')
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RelPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for RelPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RelPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
