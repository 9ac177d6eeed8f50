// @generated by testsync v0.1.0 from suite 'sample'. DO NOT EDIT.
// Regenerate with `testsync generate --suite sample`.

#![allow(dead_code)]
pub const SUITE: testsync::runtime::SuiteDefinition = testsync::runtime::SuiteDefinition {
    name: "sample",
    manifest_dir: env!("CARGO_MANIFEST_DIR"),
    root: "tests/data/sample",
    pattern: "^(.+)\\.kt$",
    exclude: &["excluded.kt"],
    exclude_pattern: None,
    recursive: true,
    stale: testsync::runtime::StalePolicy::Fail,
    entries: &[
        ("box/simpleCall.kt", "test_box_simple_call"),
        ("empty.kt", "test_empty"),
        ("failsInit.kt", "test_fails_init"),
        ("globalInitializers.kt", "test_global_initializers"),
    ],
};
#[test]
fn test_all_files_present_in_sample() {
    testsync::runtime::assert_all_files_present(&SUITE);
}
#[test]
fn test_box_simple_call() {
    testsync::runtime::run_test(&SUITE, "box/simpleCall.kt", &super::Backend);
}
#[test]
fn test_empty() {
    testsync::runtime::run_test(&SUITE, "empty.kt", &super::Backend);
}
#[test]
fn test_fails_init() {
    testsync::runtime::run_test(&SUITE, "failsInit.kt", &super::Backend);
}
#[test]
fn test_global_initializers() {
    testsync::runtime::run_test(&SUITE, "globalInitializers.kt", &super::Backend);
}
