use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which identity key a rejected name would have become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Test,
    Subject,
    Requirement,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Test => "test",
            Self::Subject => "subject",
            Self::Requirement => "requirement",
        };
        f.write_str(value)
    }
}

/// Primary error type for covtrace operations.
///
/// The recording surface never returns these for bad input: `InvalidName` and
/// `InvalidScenario` are logged and dropped there. They are returned by the
/// checked constructors, `TestRecord::try_add_scenario` and the merge methods
/// of the core model, and by the file/config plumbing.
#[derive(Error, Debug)]
pub enum CoverageError {
    // === Model Errors ===
    /// Null or blank name where an identity key is required.
    #[error("invalid {kind} name: must be non-blank")]
    InvalidName { kind: NameKind },

    /// Null or blank-string scenario payload.
    #[error("invalid scenario: payload is null or blank")]
    InvalidScenario,

    /// Merge attempted across two different identity keys.
    #[error("merge identity mismatch: expected '{expected}', got '{actual}'")]
    MergeIdentityMismatch { expected: String, actual: String },

    // === Plumbing Errors ===
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {detail}")]
    Config { detail: String },

    /// Malformed line in an entries file.
    #[error("entries parse error at line {line}: {detail}")]
    EntryParse { line: usize, detail: String },

    /// Report file could not be written.
    #[error("failed to write report '{path}': {detail}")]
    ReportWrite { path: PathBuf, detail: String },
}

impl CoverageError {
    /// Create an invalid-name error.
    pub const fn invalid_name(kind: NameKind) -> Self {
        Self::InvalidName { kind }
    }

    /// Create a configuration error.
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Whether the recording surface drops this error silently instead of
    /// propagating it.
    pub const fn is_silently_dropped(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::InvalidScenario)
    }

    /// Whether this error indicates a broken caller contract rather than bad
    /// data or a failing environment.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::MergeIdentityMismatch { .. })
    }

    /// Get the process exit code for this error (for CLI use).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::EntryParse { .. } => 64,
            Self::Io(_) | Self::ReportWrite { .. } => 74,
            _ => 70,
        }
    }
}

/// Result type alias using `CoverageError`.
pub type Result<T, E = CoverageError> = std::result::Result<T, E>;
