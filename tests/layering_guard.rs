//! Layering guardrails to keep `testsync_core` free of the code-generation and CLI stack.
//!
//! Discovery and the completeness check are linked into every generated test binary, so the core
//! crate must stay light. This test scans `crates/testsync_core/Cargo.toml` and fails if a forbidden
//! crate appears in `[dependencies]`.

const FORBIDDEN: &[&str] = &["syn", "quote", "proc-macro2", "prettyplease", "clap", "testsync"];

#[test]
fn core_does_not_depend_on_codegen_or_cli_crates() {
    let manifest = include_str!("../crates/testsync_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        let name = line_no_comment.split('=').next().unwrap_or("").trim();
        if FORBIDDEN.contains(&name) {
            panic!("`{name}` must not appear in testsync_core's [dependencies]");
        }
    }
}

#[test]
fn core_declares_a_dependencies_table() {
    let manifest = include_str!("../crates/testsync_core/Cargo.toml");
    assert!(manifest.lines().any(|l| l.trim() == "[dependencies]"));
}
