//! CLI module for testsync
//!
//! ## Commands
//!
//! - `generate` - Scan test data and write the generated suites
//! - `check` - Verify generated suites against the test data on disk
//! - `list` - Print the units a fresh generation would produce
//! - `run [UNIT]` - Run units in-process through the configured command
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CONFIG_FILE;
use crate::version::TESTSYNC_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Configuration or I/O problem, as opposed to a suite that is out of sync.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Keep generated test suites in sync with their test-data directories
#[derive(Parser, Debug)]
#[command(name = "testsync")]
#[command(version = TESTSYNC_VERSION)]
#[command(about = "Keep generated test suites in sync with their test-data directories", long_about = None)]
pub struct Cli {
    /// Config file
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Only operate on this suite
    #[arg(long = "suite", value_name = "NAME", global = true)]
    pub suite: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan test data and write the generated suites
    Generate,

    /// Verify generated suites against the test data on disk
    Check {
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Also fail when a generated file differs from a fresh generation
        #[arg(long)]
        exact: bool,
    },

    /// Print the units a fresh generation would produce
    List,

    /// Run units in-process through the suite's `command`
    Run {
        /// Run only this unit
        #[arg(value_name = "UNIT")]
        unit: Option<String>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Only run units whose name contains this text
        #[arg(short = 'k', value_name = "EXPR", conflicts_with = "unit")]
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = commands::load_config(&cli.config)?;
    let suite = cli.suite.as_deref();

    match cli.command {
        Command::Generate => commands::generate(&config, suite),
        Command::Check { format, exact } => commands::check(&config, suite, format, exact),
        Command::List => commands::list(&config, suite),
        Command::Run { unit, verbose, filter } => {
            commands::run_units(&config, suite, unit.as_deref(), filter.as_deref(), verbose)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
