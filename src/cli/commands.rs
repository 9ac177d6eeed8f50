//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use testsync_core::{CheckError, Registry, RelPath, scan, verify_complete};

use crate::config::{Config, SuiteConfig};
use crate::generate::generate_suite;
use crate::manifest::read_registry_file;
use crate::suite::{ConsoleReporter, Suite, TestReporter};

use super::{CliError, CliResult, ExitCode, ReportFormat};

/// Load `testsync.toml`; problems with it are usage errors.
pub fn load_config(path: &Path) -> CliResult<Config> {
    Config::load(path).map_err(|e| CliError::usage(format!("Error: {}", e)))
}

fn selected<'a>(config: &'a Config, suite: Option<&str>) -> CliResult<Vec<&'a SuiteConfig>> {
    config
        .select(suite)
        .map_err(|e| CliError::usage(format!("Error: {}", e)))
}

// ============================================================================
// generate
// ============================================================================

pub fn generate(config: &Config, suite: Option<&str>) -> CliResult<ExitCode> {
    for suite in selected(config, suite)? {
        let generated = generate_suite(config, suite).map_err(|e| CliError::failure(format!("Error: {}", e)))?;
        if generated.is_up_to_date() {
            println!("{}: {} unit(s), unchanged", generated.name, generated.registry.len());
            continue;
        }
        generated
            .write()
            .map_err(|e| CliError::failure(format!("Error: {}", e)))?;
        println!(
            "{}: wrote {} unit(s) to {}",
            generated.name,
            generated.registry.len(),
            generated.output.display()
        );
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// check
// ============================================================================

/// Per-suite result of `testsync check`, as printed with `--format json`.
#[derive(Debug, Default, Serialize)]
struct SuiteCheck {
    suite: String,
    ok: bool,
    covered: usize,
    orphans: Vec<RelPath>,
    stale: Vec<RelPath>,
    ignored_stale: Vec<RelPath>,
    /// Generated file differs from a fresh generation (only with `--exact`).
    outdated: bool,
    /// Anything that stopped the check from running.
    error: Option<String>,
    /// Rendered diagnostic for a discrepancy.
    #[serde(skip)]
    report: Option<String>,
}

pub fn check(config: &Config, suite: Option<&str>, format: ReportFormat, exact: bool) -> CliResult<ExitCode> {
    let results: Vec<SuiteCheck> = selected(config, suite)?
        .into_iter()
        .map(|suite| check_suite(config, suite, exact))
        .collect();

    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&results)
                .map_err(|e| CliError::failure(format!("Error: cannot serialize report: {}", e)))?;
            println!("{}", json);
        }
        ReportFormat::Text => {
            for result in &results {
                print_check(result);
            }
        }
    }

    if results.iter().all(|r| r.ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn check_suite(config: &Config, suite: &SuiteConfig, exact: bool) -> SuiteCheck {
    let mut result = SuiteCheck {
        suite: suite.name.clone(),
        ..SuiteCheck::default()
    };

    let spec = match suite.scan_spec(&config.base_dir) {
        Ok(spec) => spec,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };
    let output = config.resolve(&suite.output);
    let registry = match read_registry_file(&output) {
        Ok(registry) => registry,
        Err(e) => {
            result.error = Some(format!("{} (run `testsync generate` first)", e));
            return result;
        }
    };

    match verify_complete(&spec, &registry, suite.stale) {
        Ok(report) => {
            result.ok = true;
            result.covered = report.covered;
            result.ignored_stale = report.ignored_stale;
        }
        Err(e) => {
            if let Some(d) = e.discrepancy() {
                result.orphans = d.orphans.clone();
                result.stale = d.stale.clone();
                result.report = Some(render(e));
            } else {
                result.error = Some(e.to_string());
            }
        }
    }

    if exact && result.ok {
        match generate_suite(config, suite) {
            Ok(generated) if generated.is_up_to_date() => {}
            Ok(_) => {
                result.ok = false;
                result.outdated = true;
            }
            Err(e) => {
                result.ok = false;
                result.error = Some(e.to_string());
            }
        }
    }
    result
}

fn render(error: CheckError) -> String {
    format!("{:?}", miette::Report::new(error))
}

fn print_check(result: &SuiteCheck) {
    if let Some(report) = &result.report {
        eprintln!("{}: out of sync", result.suite);
        eprintln!("{}", report);
        return;
    }
    if let Some(error) = &result.error {
        eprintln!("{}: error: {}", result.suite, error);
        return;
    }
    if result.outdated {
        eprintln!(
            "{}: generated file is outdated; run `testsync generate --suite {}`",
            result.suite, result.suite
        );
        return;
    }
    println!("{}: ok, {} file(s) covered", result.suite, result.covered);
    for path in &result.ignored_stale {
        println!("  stale (ignored): {}", path);
    }
}

// ============================================================================
// list
// ============================================================================

pub fn list(config: &Config, suite: Option<&str>) -> CliResult<ExitCode> {
    let suites = selected(config, suite)?;
    for suite in &suites {
        let spec = suite
            .scan_spec(&config.base_dir)
            .map_err(|e| CliError::usage(format!("Error: {}", e)))?;
        let live = scan(&spec).map_err(|e| CliError::failure(format!("Error: suite '{}': {}", suite.name, e)))?;
        let registry = Registry::from_scan(&live, &spec.pattern)
            .map_err(|e| CliError::failure(format!("Error: suite '{}': {}", suite.name, e)))?;

        if suites.len() > 1 {
            println!("[{}]", suite.name);
        }
        for (path, id) in registry.iter() {
            println!("{}\t{}", id, path);
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// run
// ============================================================================

/// Run units from the generated registries through each suite's `command`.
pub fn run_units(
    config: &Config,
    suite: Option<&str>,
    unit: Option<&str>,
    filter: Option<&str>,
    verbose: bool,
) -> CliResult<ExitCode> {
    let mut reporter = ConsoleReporter::new(verbose);
    let mut all_passed = true;
    let mut found_unit = false;

    for suite_config in selected(config, suite)? {
        let suite = load_suite(config, suite_config)?;

        if let Some(id) = unit {
            let Some(test_unit) = suite.unit(id) else {
                continue;
            };
            found_unit = true;
            let backend = suite_config
                .command_backend(&config.base_dir)
                .map_err(|e| CliError::usage(format!("Error: {}", e)))?;

            reporter.on_test_start(&test_unit);
            let start = Instant::now();
            let outcome = test_unit.run(&suite.root, &backend);
            reporter.on_test_complete(&test_unit, &outcome, start.elapsed());
            if verbose || !outcome.is_passed() {
                eprintln!();
            }
            all_passed &= outcome.is_passed();
            continue;
        }

        let backend = suite_config
            .command_backend(&config.base_dir)
            .map_err(|e| CliError::usage(format!("Error: {}", e)))?;
        let summary = suite.run_all(&backend, &mut reporter, filter);
        all_passed &= summary.is_success();
    }

    if let Some(id) = unit {
        if !found_unit {
            return Err(CliError::failure(format!("Error: no suite has a unit named '{}'", id)));
        }
    }
    if all_passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn load_suite(config: &Config, suite: &SuiteConfig) -> CliResult<Suite> {
    let spec = suite
        .scan_spec(&config.base_dir)
        .map_err(|e| CliError::usage(format!("Error: {}", e)))?;
    let output: PathBuf = config.resolve(&suite.output);
    let registry = read_registry_file(&output).map_err(|e| {
        CliError::failure(format!(
            "Error: suite '{}': {} (run `testsync generate` first)",
            suite.name, e
        ))
    })?;
    Ok(Suite::new(suite.name.clone(), spec.root, registry))
}
