//! Error taxonomy for the ledgersim harness.
//!
//! One enum covers every fatal path: configuration problems abort setup,
//! data problems mean corrupted upstream state, submission problems carry a
//! service rejection verbatim. Classification helpers tell a runner which of
//! these fail a test run and which exit code to use.

use thiserror::Error;

/// Primary error type for the ledgersim harness.
///
/// Skipped invocations are **not** errors and never appear here; the
/// harness reports them through its outcome type instead.
#[derive(Error, Debug)]
pub enum SimError {
    // === Configuration Errors (fatal at setup) ===
    /// A catalog or constraint declaration is invalid.
    #[error("configuration error: {detail}")]
    Config { detail: String },

    /// An operation kind was registered with a non-positive weight.
    #[error("invalid weight {weight} for operation kind '{kind}'")]
    InvalidWeight { kind: String, weight: u32 },

    /// An operation kind was registered twice.
    #[error("duplicate operation kind '{kind}'")]
    DuplicateKind { kind: String },

    // === Data Errors (upstream corruption, surfaced not swallowed) ===
    /// A field that must parse as an address did not.
    #[error("malformed {context}: {detail}")]
    Data { context: String, detail: String },

    // === Submission Errors (external capability, surfaced verbatim) ===
    /// The submission capability rejected the envelope.
    #[error("submission rejected: {detail}")]
    Submission { detail: String },

    // === Ambient ===
    /// An I/O error from the filesystem.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Internal logic error (should never happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SimError {
    /// Create a configuration error.
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Create a data error for a named field or context.
    pub fn data(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Data {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Create a submission error carrying the underlying cause.
    pub fn submission(detail: impl Into<String>) -> Self {
        Self::Submission {
            detail: detail.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error should fail a simulation run.
    ///
    /// Data and submission errors are genuine test-run failures; everything
    /// else is either a setup mistake (the run never starts) or harness
    /// plumbing.
    #[must_use]
    pub const fn is_test_failure(&self) -> bool {
        matches!(self, Self::Data { .. } | Self::Submission { .. })
    }

    /// Whether this error is fatal during harness setup.
    #[must_use]
    pub const fn is_setup_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidWeight { .. } | Self::DuplicateKind { .. }
        )
    }

    /// Stable category tag for reports and structured logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::InvalidWeight { .. } | Self::DuplicateKind { .. } => {
                "config"
            }
            Self::Data { .. } => "data",
            Self::Submission { .. } => "submission",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }

    /// Process exit code for CLI use.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::InvalidWeight { .. } | Self::DuplicateKind { .. } => 2,
            Self::Data { .. } => 3,
            Self::Submission { .. } => 4,
            Self::Io(_) => 5,
            Self::Internal(_) => 10,
        }
    }
}

/// Result type alias using `SimError`.
pub type SimResult<T> = std::result::Result<T, SimError>;
