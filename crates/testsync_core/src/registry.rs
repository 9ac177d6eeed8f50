//! The generation-time mapping from test-data file to generated test unit.
//!
//! A [`Registry`] is built once, when a suite is generated, and is read-only afterwards. It is passed
//! explicitly to whatever needs it (checker, emitter, run-time helpers); there is no global registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::errors::RegistryError;
use crate::naming::unit_id_for;
use crate::path::RelPath;
use crate::pattern::NamePattern;
use crate::scanner::ScanResult;

/// Identifier of a generated test unit. Always a valid Rust identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TestUnitId(String);

impl TestUnitId {
    pub fn new(raw: impl Into<String>) -> Result<Self, RegistryError> {
        let raw = raw.into();
        if is_identifier(&raw) {
            Ok(Self(raw))
        } else {
            Err(RegistryError::InvalidUnitId(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    raw != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl fmt::Display for TestUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from normalized test-data path to generated unit, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<RelPath, TestUnitId>,
}

impl Registry {
    /// Build from explicit pairs. Paths and unit ids must both be unique.
    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (RelPath, TestUnitId)>,
    {
        let mut by_path = BTreeMap::new();
        let mut by_id: HashMap<TestUnitId, RelPath> = HashMap::new();

        for (path, id) in entries {
            if let Some(first) = by_id.get(&id) {
                return Err(if *first == path {
                    RegistryError::DuplicatePath(path)
                } else {
                    RegistryError::DuplicateUnitId {
                        id: id.0,
                        first: first.clone(),
                        second: path,
                    }
                });
            }
            if by_path.contains_key(&path) {
                return Err(RegistryError::DuplicatePath(path));
            }
            by_id.insert(id.clone(), path.clone());
            by_path.insert(path, id);
        }

        Ok(Self { entries: by_path })
    }

    /// Build from textual pairs, as stored in a generated suite.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(path, id)| -> Result<_, RegistryError> { Ok((RelPath::parse(path)?, TestUnitId::new(id)?)) })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        Self::from_entries(entries)
    }

    /// Assign a unit to every scanned file. This is what generation does.
    pub fn from_scan(scan: &ScanResult, pattern: &NamePattern) -> Result<Self, RegistryError> {
        let entries = scan
            .iter()
            .map(|path| -> Result<_, RegistryError> { Ok((path.clone(), unit_id_for(path, pattern)?)) })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        Self::from_entries(entries)
    }

    pub fn get(&self, path: &RelPath) -> Option<&TestUnitId> {
        self.entries.get(path)
    }

    /// The test-data path declared for a unit.
    pub fn path_of(&self, id: &str) -> Option<&RelPath> {
        self.entries
            .iter()
            .find_map(|(path, unit)| (unit.as_str() == id).then_some(path))
    }

    pub fn contains(&self, path: &RelPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RelPath> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelPath, &TestUnitId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(path: &str, id: &str) -> (RelPath, TestUnitId) {
        (RelPath::parse(path).unwrap(), TestUnitId::new(id).unwrap())
    }

    #[test]
    fn unit_ids_must_be_identifiers() {
        assert!(TestUnitId::new("test_a").is_ok());
        assert!(TestUnitId::new("_private").is_ok());
        assert!(TestUnitId::new("").is_err());
        assert!(TestUnitId::new("_").is_err());
        assert!(TestUnitId::new("1abc").is_err());
        assert!(TestUnitId::new("has space").is_err());
    }

    #[test]
    fn lookups_go_both_ways() {
        let registry = Registry::from_entries([pair("a.kt", "test_a"), pair("sub/b.kt", "test_sub_b")]).unwrap();
        assert_eq!(registry.get(&RelPath::parse("a.kt").unwrap()).unwrap().as_str(), "test_a");
        assert_eq!(registry.path_of("test_sub_b").unwrap().as_str(), "sub/b.kt");
        assert!(registry.path_of("test_missing").is_none());
    }

    #[test]
    fn keys_are_ordered_by_path() {
        let registry = Registry::from_entries([pair("b.kt", "test_b"), pair("a.kt", "test_a")]).unwrap();
        let keys: Vec<_> = registry.keys().map(RelPath::as_str).collect();
        assert_eq!(keys, vec!["a.kt", "b.kt"]);
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let err = Registry::from_entries([pair("a.kt", "test_a"), pair("./a.kt", "test_a2")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicatePath(RelPath::parse("a.kt").unwrap()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Registry::from_entries([pair("a-b.kt", "test_a_b"), pair("a_b.kt", "test_a_b")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateUnitId { ref id, .. } if id == "test_a_b"));
    }

    #[test]
    fn from_pairs_normalizes_paths() {
        let registry = Registry::from_pairs([(r"sub\b.kt", "test_sub_b")]).unwrap();
        assert!(registry.contains(&RelPath::parse("sub/b.kt").unwrap()));
    }
}
