//! End-to-end discovery and completeness scenarios against a real directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use testsync_core::naming::unit_id_for;
use testsync_core::{
    CheckError, ExclusionSet, NamePattern, Registry, RelPath, ScanError, ScanSpec, StalePolicy, scan, verify_complete,
};

/// Create `files` (relative, `/`-separated) under a fresh temp dir.
fn test_data(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        let path = RelPath::parse(file).unwrap().to_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "fun box() = \"OK\"\n").unwrap();
    }
    dir
}

fn spec(root: &Path, exclusions: &[&str]) -> ScanSpec {
    ScanSpec::parse(root, r"^(.+)\.kt$", exclusions).unwrap()
}

fn registry(paths: &[&str]) -> Registry {
    let pattern = NamePattern::default();
    let entries = paths.iter().map(|p| {
        let rel = RelPath::parse(p).unwrap();
        let id = unit_id_for(&rel, &pattern).unwrap();
        (rel, id)
    });
    Registry::from_entries(entries).unwrap()
}

fn rel(raw: &str) -> RelPath {
    RelPath::parse(raw).unwrap()
}

#[test]
fn scenario_all_files_registered() {
    let dir = test_data(&["a.kt", "b.kt"]);
    let report = verify_complete(&spec(dir.path(), &[]), &registry(&["a.kt", "b.kt"]), StalePolicy::Fail).unwrap();
    assert_eq!(report.covered, 2);
}

#[test]
fn scenario_one_file_missing_from_registry() {
    let dir = test_data(&["a.kt", "b.kt", "c.kt"]);
    let err = verify_complete(&spec(dir.path(), &[]), &registry(&["a.kt", "b.kt"]), StalePolicy::Fail).unwrap_err();
    match err {
        CheckError::OrphanFiles(d) => {
            assert_eq!(d.orphans, vec![rel("c.kt")]);
            assert!(d.stale.is_empty());
        }
        other => panic!("expected OrphanFiles, got {other:?}"),
    }
}

#[test]
fn scenario_excluded_file_needs_no_test() {
    let dir = test_data(&["a.kt", "excluded.kt"]);
    verify_complete(
        &spec(dir.path(), &["excluded.kt"]),
        &registry(&["a.kt"]),
        StalePolicy::Fail,
    )
    .unwrap();
}

#[test]
fn excluded_file_is_ignored_even_when_registered() {
    let dir = test_data(&["a.kt", "excluded.kt"]);
    verify_complete(
        &spec(dir.path(), &["excluded.kt"]),
        &registry(&["a.kt", "excluded.kt"]),
        StalePolicy::Fail,
    )
    .unwrap();
}

#[test]
fn missing_root_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = scan(&spec(&missing, &[])).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(ref p) if p == &missing));

    let err = verify_complete(&spec(&missing, &[]), &Registry::default(), StalePolicy::Fail).unwrap_err();
    assert!(matches!(err, CheckError::Scan(ScanError::NotFound(_))));
}

#[test]
fn file_root_is_not_a_directory() {
    let dir = test_data(&["a.kt"]);
    let err = scan(&spec(&dir.path().join("a.kt"), &[])).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

#[test]
fn nested_files_are_found_recursively() {
    let dir = test_data(&["a.kt", "box/inline/b.kt", "box/c.txt"]);
    let result = scan(&spec(dir.path(), &[])).unwrap();
    assert_eq!(result.paths(), &[rel("a.kt"), rel("box/inline/b.kt")]);
}

#[test]
fn top_level_scan_skips_subdirectories() {
    let dir = test_data(&["a.kt", "box/b.kt"]);
    let result = scan(&spec(dir.path(), &[]).with_recursive(false)).unwrap();
    assert_eq!(result.paths(), &[rel("a.kt")]);
}

#[test]
fn directory_exclusion_covers_subtree() {
    let dir = test_data(&["a.kt", "wip/b.kt", "wip/deep/c.kt", "wipe.kt"]);
    let result = scan(&spec(dir.path(), &["wip"])).unwrap();
    assert_eq!(result.paths(), &[rel("a.kt"), rel("wipe.kt")]);
}

#[test]
fn exclusion_pattern_applies_to_names() {
    let dir = test_data(&["a.kt", "_helper.kt", "sub/_shared.kt"]);
    let spec = ScanSpec::new(dir.path(), NamePattern::default())
        .with_exclusions(ExclusionSet::new().with_pattern(NamePattern::new("^_").unwrap()));
    assert_eq!(scan(&spec).unwrap().paths(), &[rel("a.kt")]);
}

#[test]
fn empty_files_and_odd_names_still_count() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty.kt"), "").unwrap();
    fs::write(dir.path().join("weird name-1.kt"), "x").unwrap();
    let result = scan(&spec(dir.path(), &[])).unwrap();
    assert_eq!(result.paths(), &[rel("empty.kt"), rel("weird name-1.kt")]);
}

#[test]
fn deleted_file_is_reported_as_stale() {
    let dir = test_data(&["a.kt", "b.kt"]);
    let registry = registry(&["a.kt", "b.kt"]);
    fs::remove_file(dir.path().join("b.kt")).unwrap();

    let err = verify_complete(&spec(dir.path(), &[]), &registry, StalePolicy::Fail).unwrap_err();
    assert!(matches!(err, CheckError::StaleEntries(ref d) if d.stale == vec![rel("b.kt")]));

    let report = verify_complete(&spec(dir.path(), &[]), &registry, StalePolicy::Ignore).unwrap();
    assert_eq!(report.ignored_stale, vec![rel("b.kt")]);
}

#[test]
fn registry_from_scan_round_trips_through_the_checker() {
    let dir = test_data(&["a.kt", "sub/b.kt", "sub/deeper/cC.kt"]);
    let spec = spec(dir.path(), &[]);
    let registry = Registry::from_scan(&scan(&spec).unwrap(), &spec.pattern).unwrap();
    assert_eq!(registry.path_of("test_sub_deeper_c_c").unwrap(), &rel("sub/deeper/cC.kt"));
    verify_complete(&spec, &registry, StalePolicy::Fail).unwrap();
}

#[test]
fn new_file_after_generation_is_an_orphan() {
    let dir = test_data(&["a.kt"]);
    let spec = spec(dir.path(), &[]);
    let registry = Registry::from_scan(&scan(&spec).unwrap(), &spec.pattern).unwrap();

    fs::write(dir.path().join("z.kt"), "").unwrap();
    let err = verify_complete(&spec, &registry, StalePolicy::Fail).unwrap_err();
    assert_eq!(err.discrepancy().unwrap().orphans, vec![rel("z.kt")]);
    assert!(err.to_string().contains("  - z.kt"));
}

#[cfg(target_os = "linux")]
#[test]
fn unrelated_non_utf8_file_does_not_break_the_check() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = test_data(&["a.kt"]);
    fs::write(dir.path().join(OsStr::from_bytes(b"notes\xFF.txt")), "").unwrap();

    let spec = spec(dir.path(), &[]);
    let live = scan(&spec).unwrap();
    assert_eq!(live.paths(), &[rel("a.kt")]);
    assert!(verify_complete(&spec, &registry(&["a.kt"]), StalePolicy::Fail).is_ok());
}
