//! Invocation outcome taxonomy: success, skip, or error.
//!
//! Every generator invocation collapses into exactly one [`Outcome`] variant.
//! Skips are non-events (the sampled state did not admit the operation) and
//! must never be reported as failures; errors carry the failing [`Stage`] and
//! the underlying cause so a run report can triage them without re-running.

use std::fmt;

use ledgersim_error::SimError;
use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// Why a generator declined to produce an operation.
///
/// Reasons are distinguishable in reports and logs; the serialized form is the
/// stable snake_case code returned by [`SkipReason::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No collection of the configured kind exists in current state.
    NoMatchingCollection,
    /// A collection was found but holds no child records.
    NoChildRecord,
    /// The entity's controller is not an account the harness controls.
    NoControllableAccount,
    /// The controller's spendable balance is below the configured minimum.
    InsufficientSpendable,
    /// The drawn replacement controller already controls the entity.
    SameController,
}

impl SkipReason {
    /// Stable code used in reports, logs, and serialized records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMatchingCollection => "no_matching_collection",
            Self::NoChildRecord => "no_child_record",
            Self::NoControllableAccount => "no_controllable_account",
            Self::InsufficientSpendable => "insufficient_spendable",
            Self::SameController => "same_controller",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage an invocation was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Drawing a target entity from live service state.
    Discover,
    /// Checking controller address, account, and balance preconditions.
    Validate,
    /// Constructing the operation payload.
    Build,
    /// Delivering the submission envelope to the service.
    Submit,
}

impl Stage {
    /// Stable lowercase name used in reports and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Validate => "validate",
            Self::Build => "build",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one generator invocation.
#[derive(Debug)]
pub enum Outcome {
    /// The operation was built and the service accepted it.
    Success(Operation),
    /// Current state did not admit the operation; nothing was submitted.
    Skip(SkipReason),
    /// The invocation failed at `stage` with `cause`.
    Error {
        /// Pipeline stage that produced the failure.
        stage: Stage,
        /// Underlying cause, preserved verbatim from the failing layer.
        cause: SimError,
    },
}

impl Outcome {
    /// `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `true` for [`Outcome::Skip`].
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    /// `true` for [`Outcome::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// `true` when the outcome is an error that fails the test run.
    ///
    /// Skips never fail a run; neither do infrastructure errors such as I/O.
    #[must_use]
    pub fn is_test_failure(&self) -> bool {
        match self {
            Self::Error { cause, .. } => cause.is_test_failure(),
            Self::Success(_) | Self::Skip(_) => false,
        }
    }

    /// Stable status label: `"success"`, `"skip"`, or `"error"`.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Skip(_) => "skip",
            Self::Error { .. } => "error",
        }
    }
}
