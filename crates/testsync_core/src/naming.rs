//! Derive generated test names from test-data paths.
//!
//! `box/inline/simpleCall.kt` becomes `test_box_inline_simple_call`: directory components first,
//! then the pattern stem, each converted to snake_case and prefixed with `test_`.

use crate::errors::RegistryError;
use crate::path::RelPath;
use crate::pattern::NamePattern;
use crate::registry::TestUnitId;

/// Name of the generated unit for `path`.
pub fn unit_id_for(path: &RelPath, pattern: &NamePattern) -> Result<TestUnitId, RegistryError> {
    let stem = pattern
        .stem(path.file_name())
        .ok_or_else(|| RegistryError::Unnameable(path.clone()))?;

    let words: Vec<String> = path
        .parent_components()
        .chain(std::iter::once(stem))
        .map(snake_case)
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() {
        return Err(RegistryError::Unnameable(path.clone()));
    }
    TestUnitId::new(format!("test_{}", words.join("_")))
}

/// Convert an arbitrary name to snake_case using only `[a-z0-9_]`.
///
/// camelCase and acronym boundaries become `_` (`HTTPServer` → `http_server`), every other
/// character becomes a single `_`, and leading/trailing underscores are trimmed.
pub fn snake_case(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}
