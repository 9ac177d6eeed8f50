//! Integration tests for a generated suite checked into `tests/generated/`.
//!
//! `sample_suite.rs` is compiled as a child module, so its `#[test]` functions run as part of this
//! test binary against `tests/data/sample`. The backend below only checks that braces balance, which
//! is enough to tell a unit that reached its own file from one that did not.

use std::fs;
use std::path::Path;

use testsync::config::Config;
use testsync::{ExecutionBackend, Outcome, generate_suite, read_registry_file};

#[path = "generated/sample_suite.rs"]
mod sample_suite;

/// Backend referenced by the generated suite as `super::Backend`.
pub struct Backend;

impl ExecutionBackend for Backend {
    fn execute(&self, path: &Path) -> Outcome {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return Outcome::Error(format!("cannot read {}: {}", path.display(), e)),
        };
        let open = source.matches('{').count();
        let close = source.matches('}').count();
        if open == close {
            Outcome::Passed
        } else {
            Outcome::Failed(format!("{}: {} '{{' vs {} '}}'", path.display(), open, close))
        }
    }
}

const CONFIG: &str = r#"
[[suite]]
name = "sample"
root = "tests/data/sample"
exclude = ["excluded.kt"]
output = "tests/generated/sample_suite.rs"
"#;

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn checked_in_suite_matches_a_fresh_generation() {
    let config = Config::parse(CONFIG, manifest_dir()).unwrap();
    let generated = generate_suite(&config, &config.suites[0]).unwrap();
    let on_disk = read_registry_file(&generated.output).unwrap();
    assert_eq!(on_disk, generated.registry);
}

#[test]
fn freshly_generated_source_declares_every_unit() {
    let config = Config::parse(CONFIG, manifest_dir()).unwrap();
    let generated = generate_suite(&config, &config.suites[0]).unwrap();

    let file = syn::parse_file(&generated.source).unwrap();
    let fns: Vec<String> = file
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(
        fns,
        vec![
            "test_all_files_present_in_sample",
            "test_box_simple_call",
            "test_empty",
            "test_fails_init",
            "test_global_initializers",
        ]
    );
}

#[test]
fn generated_definition_verifies() {
    let report = sample_suite::SUITE.verify().unwrap();
    assert_eq!(report.covered, 4);
    assert!(report.ignored_stale.is_empty());
}

#[test]
fn excluded_file_fails_the_backend() {
    // Excluded files are skipped by the suite, not because the backend would pass them.
    let path = manifest_dir().join("tests/data/sample/excluded.kt");
    assert!(matches!(Backend.execute(&path), Outcome::Failed(_)));
}
