//! File-name matching rules.
//!
//! A [`NamePattern`] is a regular expression tested against a file's *name* (never its directory).
//! If the expression has a capture group, the first group is the test-name stem; `^(.+)\.kt$` turns
//! `globalInitializers.kt` into `globalInitializers`.

use std::fmt;

use regex::Regex;

use crate::errors::PatternError;

/// Pattern used when a suite does not configure one.
pub const DEFAULT_PATTERN: &str = r"^(.+)\.kt$";

#[derive(Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The part of `file_name` a test should be named after, or `None` if the name does not match.
    ///
    /// Falls back to the name without its last extension when the pattern has no capture group
    /// or the group did not participate in the match.
    pub fn stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let captures = self.regex.captures(file_name)?;
        if let Some(group) = captures.get(1) {
            return Some(group.as_str());
        }
        Some(match file_name.rfind('.') {
            Some(idx) if idx > 0 => &file_name[..idx],
            _ => file_name,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PATTERN).expect("INVARIANT: DEFAULT_PATTERN is a valid regex"),
        }
    }
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamePattern").field(&self.regex.as_str()).finish()
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for NamePattern {}
