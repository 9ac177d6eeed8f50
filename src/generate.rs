//! Generation: scan a suite's test data, build its registry and emit the Rust source.
//!
//! Generation is the only step that creates a registry. Everything afterwards (`check`, `run`, the
//! generated tests themselves) reads it back from the emitted file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use testsync_core::{Registry, RegistryError, ScanError, scan};

use crate::config::{Config, ConfigError, SuiteConfig};
use crate::emit::{EmitError, SuiteEmitter};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("suite '{suite}': {source}")]
    Scan {
        suite: String,
        #[source]
        source: ScanError,
    },

    #[error("suite '{suite}': {source}")]
    Registry {
        suite: String,
        #[source]
        source: RegistryError,
    },

    #[error("suite '{suite}': {source}")]
    Emit {
        suite: String,
        #[source]
        source: EmitError,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A generated suite, not yet written.
#[derive(Debug, Clone)]
pub struct GeneratedSuite {
    pub name: String,
    pub registry: Registry,
    pub source: String,
    /// Resolved output path.
    pub output: PathBuf,
}

impl GeneratedSuite {
    /// Write the source, creating parent directories as needed.
    pub fn write(&self) -> Result<(), GenerateError> {
        let write_error = |source| GenerateError::Write {
            path: self.output.clone(),
            source,
        };
        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&self.output, &self.source).map_err(write_error)?;
        tracing::info!(suite = %self.name, output = %self.output.display(), units = self.registry.len(), "wrote generated suite");
        Ok(())
    }

    /// Whether the file on disk already holds exactly this source.
    pub fn is_up_to_date(&self) -> bool {
        read_existing(&self.output).is_some_and(|existing| existing == self.source)
    }
}

fn read_existing(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Scan, register and emit one suite of `config`.
#[tracing::instrument(skip_all, fields(suite = %suite.name))]
pub fn generate_suite(config: &Config, suite: &SuiteConfig) -> Result<GeneratedSuite, GenerateError> {
    let spec = suite.scan_spec(&config.base_dir)?;
    let live = scan(&spec).map_err(|source| GenerateError::Scan {
        suite: suite.name.clone(),
        source,
    })?;
    let registry = Registry::from_scan(&live, &spec.pattern).map_err(|source| GenerateError::Registry {
        suite: suite.name.clone(),
        source,
    })?;
    let source = SuiteEmitter::new(suite, &spec, &registry)
        .emit()
        .map_err(|source| GenerateError::Emit {
            suite: suite.name.clone(),
            source,
        })?;

    tracing::debug!(units = registry.len(), "generated suite");
    Ok(GeneratedSuite {
        name: suite.name.clone(),
        registry,
        source,
        output: config.resolve(&suite.output),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(dir: &Path, extra: &str) -> Config {
        let text = format!(
            "[[suite]]\nname = \"testRunner\"\nroot = \"data\"\noutput = \"gen/test_runner.rs\"\n{extra}"
        );
        Config::parse(&text, dir).unwrap()
    }

    fn touch(dir: &Path, files: &[&str]) {
        for file in files {
            let path = dir.join("data").join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
    }

    #[test]
    fn write_then_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["globalInitializers.kt", "excluded.kt", "notes.txt"]);
        let config = config(dir.path(), "exclude = [\"excluded.kt\"]\n");

        let generated = generate_suite(&config, &config.suites[0]).unwrap();
        assert_eq!(generated.registry.len(), 1);
        assert!(!generated.is_up_to_date());

        generated.write().unwrap();
        assert!(generated.is_up_to_date());
        assert_eq!(
            crate::manifest::read_registry_file(&generated.output).unwrap(),
            generated.registry
        );
    }

    #[test]
    fn missing_root_is_a_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "");
        assert!(matches!(
            generate_suite(&config, &config.suites[0]),
            Err(GenerateError::Scan {
                source: ScanError::NotFound(_),
                ..
            })
        ));
    }

    #[test]
    fn colliding_unit_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["fooBar.kt", "foo_bar.kt"]);
        let config = config(dir.path(), "");
        assert!(matches!(
            generate_suite(&config, &config.suites[0]),
            Err(GenerateError::Registry {
                source: RegistryError::DuplicateUnitId { .. },
                ..
            })
        ));
    }
}
