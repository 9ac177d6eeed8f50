//! `testsync.toml` loading and validation.
//!
//! ```toml
//! [[suite]]
//! name = "test_runner"
//! root = "testData/testRunner"
//! pattern = '^(.+)\.kt$'
//! exclude = ["excluded.kt"]
//! output = "tests/generated/test_runner.rs"
//! backend = "super::Backend"
//! command = ["kotlinc", "{path}"]
//! ```
//!
//! Relative `root` and `output` paths are resolved against the directory holding the config file.
//! Generated suites embed `root` relative to `CARGO_MANIFEST_DIR`, so the config file is expected to
//! sit next to the `Cargo.toml` of the crate that compiles the generated tests. Loading warns when it
//! does not.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use testsync_core::naming::snake_case;
use testsync_core::{DEFAULT_PATTERN, ExclusionSet, NamePattern, PatternError, ScanSpec, StalePolicy};

use crate::exec::{BackendError, CommandBackend};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "testsync.toml";

/// Default backend expression used by generated tests.
pub const DEFAULT_BACKEND: &str = "super::Backend";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config defines no [[suite]] tables")]
    NoSuites,

    #[error("suite name '{0}' is used more than once")]
    DuplicateSuite(String),

    #[error("suite name '{0}' is not usable as an identifier (expected letters, digits and '_')")]
    BadSuiteName(String),

    #[error("unknown suite '{0}'")]
    UnknownSuite(String),

    #[error("suite '{suite}': {source}")]
    Pattern {
        suite: String,
        #[source]
        source: PatternError,
    },

    #[error("suite '{suite}': bad exclusion: {source}")]
    Exclusion {
        suite: String,
        #[source]
        source: testsync_core::PathError,
    },

    #[error("suite '{suite}': `backend = \"{backend}\"` is not a Rust path")]
    BadBackendPath { suite: String, backend: String },

    #[error("suite '{suite}' has no `command`; `testsync run` needs one")]
    NoCommand { suite: String },

    #[error("suite '{suite}': {source}")]
    Command {
        suite: String,
        #[source]
        source: BackendError,
    },
}

/// A loaded config file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
    pub suites: Vec<SuiteConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    #[serde(rename = "suite", default)]
    suites: Vec<SuiteConfig>,
}

/// One `[[suite]]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    pub name: String,
    pub root: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_pattern: Option<String>,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub stale: StalePolicy,
    pub output: PathBuf,
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub command: Vec<String>,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Absolute, so paths handed to a backend stay valid from its working directory.
        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let base_dir = std::path::absolute(base_dir).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, base_dir).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate config text.
    pub fn parse(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(CONFIG_FILE),
            source,
        })?;
        let config = Self {
            base_dir: base_dir.into(),
            suites: raw.suites,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.suites.is_empty() {
            return Err(ConfigError::NoSuites);
        }
        if !self.has_cargo_manifest() {
            tracing::warn!(
                base_dir = %self.base_dir.display(),
                "no Cargo.toml next to the config; generated suites resolve `root` against CARGO_MANIFEST_DIR and may look elsewhere"
            );
        }

        let mut seen = HashSet::new();
        for suite in &self.suites {
            if !seen.insert(suite.name.as_str()) {
                return Err(ConfigError::DuplicateSuite(suite.name.clone()));
            }
            if snake_case(&suite.name).is_empty() {
                return Err(ConfigError::BadSuiteName(suite.name.clone()));
            }
            suite.scan_spec(&self.base_dir)?;
            if syn::parse_str::<syn::Path>(&suite.backend).is_err() {
                return Err(ConfigError::BadBackendPath {
                    suite: suite.name.clone(),
                    backend: suite.backend.clone(),
                });
            }
            if suite.root.is_absolute() {
                tracing::warn!(suite = %suite.name, root = %suite.root.display(), "absolute test-data root; generated suites will not be portable");
            }
        }
        Ok(())
    }

    /// Whether `base_dir` holds a `Cargo.toml`, so that `CARGO_MANIFEST_DIR` and `base_dir` agree.
    pub fn has_cargo_manifest(&self) -> bool {
        self.base_dir.join("Cargo.toml").is_file()
    }

    /// Suites to operate on: the named one, or all of them.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&SuiteConfig>, ConfigError> {
        match name {
            None => Ok(self.suites.iter().collect()),
            Some(name) => self
                .suites
                .iter()
                .find(|s| s.name == name)
                .map(|s| vec![s])
                .ok_or_else(|| ConfigError::UnknownSuite(name.to_string())),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl SuiteConfig {
    /// The `(root, pattern, exclusions)` tuple, with `root` resolved against `base_dir`.
    pub fn scan_spec(&self, base_dir: &Path) -> Result<ScanSpec, ConfigError> {
        let pattern = NamePattern::new(&self.pattern).map_err(|source| self.pattern_error(source))?;
        let mut exclusions = ExclusionSet::from_paths(&self.exclude).map_err(|source| ConfigError::Exclusion {
            suite: self.name.clone(),
            source,
        })?;
        if let Some(raw) = &self.exclude_pattern {
            let exclude_pattern = NamePattern::new(raw).map_err(|source| self.pattern_error(source))?;
            exclusions = exclusions.with_pattern(exclude_pattern);
        }

        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            base_dir.join(&self.root)
        };
        Ok(ScanSpec::new(root, pattern)
            .with_exclusions(exclusions)
            .with_recursive(self.recursive))
    }

    /// Process backend for `testsync run`, started in `base_dir`.
    pub fn command_backend(&self, base_dir: &Path) -> Result<CommandBackend, ConfigError> {
        if self.command.is_empty() {
            return Err(ConfigError::NoCommand {
                suite: self.name.clone(),
            });
        }
        let backend = CommandBackend::new(&self.command).map_err(|source| ConfigError::Command {
            suite: self.name.clone(),
            source,
        })?;
        Ok(backend.with_working_dir(base_dir))
    }

    /// Identifier-safe form of the suite name.
    pub fn ident(&self) -> String {
        snake_case(&self.name)
    }

    fn pattern_error(&self, source: PatternError) -> ConfigError {
        ConfigError::Pattern {
            suite: self.name.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[suite]]
name = "testRunner"
root = "testData/testRunner"
output = "tests/generated/test_runner.rs"
"#;

    #[test]
    fn defaults_are_applied() {
        let config = Config::parse(MINIMAL, "/work").unwrap();
        let suite = &config.suites[0];
        assert_eq!(suite.pattern, DEFAULT_PATTERN);
        assert!(suite.exclude.is_empty());
        assert!(suite.recursive);
        assert_eq!(suite.stale, StalePolicy::Fail);
        assert_eq!(suite.backend, DEFAULT_BACKEND);
        assert_eq!(suite.ident(), "test_runner");
    }

    #[test]
    fn scan_spec_resolves_root() {
        let config = Config::parse(MINIMAL, "/work").unwrap();
        let spec = config.suites[0].scan_spec(&config.base_dir).unwrap();
        assert_eq!(spec.root, Path::new("/work/testData/testRunner"));
        assert!(spec.recursive);
    }

    #[test]
    fn full_suite_table() {
        let text = r#"
[[suite]]
name = "codegen"
root = "data"
pattern = '^(.+)\.kts$'
exclude = ["wip", "broken.kts"]
exclude_pattern = '^_'
recursive = false
stale = "ignore"
output = "gen.rs"
backend = "crate::support::run"
command = ["kotlinc", "-script", "{path}"]
"#;
        let config = Config::parse(text, ".").unwrap();
        let suite = &config.suites[0];
        assert_eq!(suite.stale, StalePolicy::Ignore);
        let spec = suite.scan_spec(&config.base_dir).unwrap();
        assert!(!spec.recursive);
        assert!(spec.exclusions.pattern().is_some());
        assert_eq!(spec.exclusions.paths().count(), 2);
        assert!(suite.command_backend(&config.base_dir).is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = format!("{MINIMAL}patern = 'x'\n");
        assert!(matches!(Config::parse(&text, "."), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn empty_config_is_rejected() {
        assert!(matches!(Config::parse("", "."), Err(ConfigError::NoSuites)));
    }

    #[test]
    fn duplicate_suite_names_are_rejected() {
        let text = format!("{MINIMAL}{MINIMAL}");
        assert!(matches!(Config::parse(&text, "."), Err(ConfigError::DuplicateSuite(_))));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let text = MINIMAL.replace("output", "pattern = '(['\noutput");
        assert!(matches!(Config::parse(&text, "."), Err(ConfigError::Pattern { .. })));
    }

    #[test]
    fn bad_backend_path_is_rejected() {
        let text = MINIMAL.replace("output", "backend = \"not a path\"\noutput");
        assert!(matches!(Config::parse(&text, "."), Err(ConfigError::BadBackendPath { .. })));
    }

    #[test]
    fn bad_suite_name_is_rejected() {
        let text = MINIMAL.replace("\"testRunner\"", "\"--\"");
        assert!(matches!(Config::parse(&text, "."), Err(ConfigError::BadSuiteName(_))));
    }

    #[test]
    fn run_needs_a_command() {
        let config = Config::parse(MINIMAL, ".").unwrap();
        assert!(matches!(
            config.suites[0].command_backend(&config.base_dir),
            Err(ConfigError::NoCommand { .. })
        ));
    }

    #[test]
    fn load_makes_base_dir_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, MINIMAL).unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.base_dir.is_absolute());
        assert!(config.suites[0].scan_spec(&config.base_dir).unwrap().root.is_absolute());
    }

    #[test]
    fn cargo_manifest_next_to_config_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse(MINIMAL, dir.path()).unwrap();
        assert!(!config.has_cargo_manifest());
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"data\"\n").unwrap();
        assert!(config.has_cargo_manifest());
    }

    #[test]
    fn select_by_name() {
        let config = Config::parse(MINIMAL, ".").unwrap();
        assert_eq!(config.select(None).unwrap().len(), 1);
        assert_eq!(config.select(Some("testRunner")).unwrap().len(), 1);
        assert!(matches!(config.select(Some("other")), Err(ConfigError::UnknownSuite(_))));
    }
}
