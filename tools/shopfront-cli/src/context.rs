//! CLI execution context.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use shopfront_core::StorefrontConfig;
use shopfront_observability::{init_tracing, ObservabilityError};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration: file, then environment overrides.
    pub config: StorefrontConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load the config from `config_path`, or discover one from the working
    /// directory, then apply `SHOPFRONT_*` overrides.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => StorefrontConfig::discover(&cwd),
        };

        let mut config = match &path {
            Some(path) => StorefrontConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => StorefrontConfig::default(),
        };
        config
            .apply_process_env()
            .context("Invalid SHOPFRONT_* environment override")?;

        if let Some(path) = &path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path: path,
            output,
            cwd,
        })
    }

    /// Install the tracing subscriber. `--verbose` raises the level to debug.
    pub fn init_tracing(&self) -> Result<(), ObservabilityError> {
        let level = if self.output.is_verbose() {
            "debug"
        } else {
            self.config.logging.level.as_str()
        };
        init_tracing(self.config.logging.format, level)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = PathBuf::from(path);
        if candidate.is_absolute() {
            candidate
        } else {
            self.cwd.join(candidate)
        }
    }
}
