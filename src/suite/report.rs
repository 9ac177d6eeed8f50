//! Reporting for in-process runs.
//!
//! ## TestReporter Trait
//!
//! [`super::Suite::run_all`] drives a [`TestReporter`] and never prints on its own. This allows for
//! other output formats (JSON, TAP, etc.) by implementing the trait.

use std::time::Duration;

use crate::exec::Outcome;

use super::{RunSummary, TestUnit};

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once the units to run are known.
    fn on_collection_complete(&mut self, suite: &str, count: usize);

    /// Called when a unit starts.
    fn on_test_start(&mut self, unit: &TestUnit);

    /// Called when a unit completes.
    fn on_test_complete(&mut self, unit: &TestUnit, outcome: &Outcome, elapsed: Duration);

    /// Called when all units have completed.
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Default console reporter (pytest-style)
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, suite: &str, count: usize) {
        if count == 0 {
            eprintln!("{}: no units collected", suite);
        } else {
            eprintln!("{}: collected {} unit(s)", suite, count);
        }
    }

    fn on_test_start(&mut self, unit: &TestUnit) {
        if self.verbose {
            eprint!("{} ... ", unit.id);
        }
    }

    fn on_test_complete(&mut self, unit: &TestUnit, outcome: &Outcome, elapsed: Duration) {
        let status = match outcome {
            Outcome::Passed => {
                if self.verbose {
                    format!("\x1b[32mPASSED\x1b[0m ({:.0}ms)", elapsed.as_millis())
                } else {
                    "\x1b[32m.\x1b[0m".to_string()
                }
            }
            Outcome::Failed(_) => {
                if self.verbose {
                    format!("\x1b[31mFAILED\x1b[0m ({:.0}ms)", elapsed.as_millis())
                } else {
                    "\x1b[31mF\x1b[0m".to_string()
                }
            }
            Outcome::Error(_) => {
                if self.verbose {
                    "\x1b[31mERROR\x1b[0m".to_string()
                } else {
                    "\x1b[31mE\x1b[0m".to_string()
                }
            }
        };

        if self.verbose {
            eprintln!("{}", status);
        } else {
            eprint!("{}", status);
        }

        // Print failure details
        if let Outcome::Failed(message) | Outcome::Error(message) = outcome {
            eprintln!("\n\x1b[31m{}\x1b[0m ({})", unit.id, unit.source_path);
            eprintln!("{}", message);
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if !self.verbose {
            eprintln!();
        }
        eprintln!();

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("\x1b[32m{} passed\x1b[0m", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("\x1b[31m{} failed\x1b[0m", summary.failed));
        }
        if summary.errors > 0 {
            parts.push(format!("\x1b[31m{} errors\x1b[0m", summary.errors));
        }
        if parts.is_empty() {
            parts.push("no units ran".to_string());
        }

        eprintln!(
            "====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}
