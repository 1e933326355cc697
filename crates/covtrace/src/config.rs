//! Recorder configuration.
//!
//! Precedence, lowest to highest: [`CoverageConfig::default`], a TOML file,
//! `COVTRACE_*` environment variables, then explicit CLI flags.

use std::path::{Path, PathBuf};

use covtrace_core::{DEFAULT_SUBJECT, is_blank};
use covtrace_error::{CoverageError, Result};
use serde::{Deserialize, Serialize};

/// Overrides [`CoverageConfig::subject`].
pub const ENV_SUBJECT: &str = "COVTRACE_SUBJECT";
/// Overrides [`CoverageConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "COVTRACE_OUTPUT_DIR";
/// Overrides [`CoverageConfig::clean_on_start`].
pub const ENV_CLEAN_ON_START: &str = "COVTRACE_CLEAN_ON_START";

/// Default directory the reports are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "target/coverage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    /// Report subject; also the stem of both report filenames.
    pub subject: String,
    /// Directory both reports are written into.
    pub output_dir: PathBuf,
    /// Delete stale reports for this subject when a recorder starts.
    pub clean_on_start: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_owned(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            clean_on_start: true,
        }
    }
}

impl CoverageConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(payload: &str) -> Result<Self> {
        let config: Self = toml::from_str(payload)
            .map_err(|error| CoverageError::config(format!("config_parse_failed error={error}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path).map_err(|error| {
            CoverageError::config(format!(
                "config_read_failed path={} error={error}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&payload)
    }

    /// Apply `COVTRACE_*` variables from the process environment.
    ///
    /// Only malformed values fail here; the merged result is not validated,
    /// since higher-precedence layers may still replace it. Call
    /// [`validate`](Self::validate) once every layer is applied.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup keyed by the `ENV_*` names.
    /// Does not validate; see [`apply_env_overrides`](Self::apply_env_overrides).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(subject) = lookup(ENV_SUBJECT) {
            self.subject = subject;
        }
        if let Some(output_dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(output_dir);
        }
        if let Some(flag) = lookup(ENV_CLEAN_ON_START) {
            self.clean_on_start = parse_flag(ENV_CLEAN_ON_START, &flag)?;
        }
        Ok(())
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_clean_on_start(mut self, clean_on_start: bool) -> Self {
        self.clean_on_start = clean_on_start;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.subject) {
            return Err(CoverageError::config("subject must be non-blank"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoverageError::config("output_dir must be non-empty"));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoverageError::config(format!(
            "{key} expects a boolean, got '{other}'"
        ))),
    }
}
