//! Control flow from pipeline steps to final outcomes.
//!
//! Discovery and validation steps return `SimResult<Gate<T>>`: a hard error,
//! a skip, or a value to continue with. [`step`] is the only place that shape
//! is mapped onto [`Outcome`], so skip/error classification cannot drift
//! between generators; the [`gate!`](crate::gate) macro applies it inline.

use std::ops::ControlFlow;

use ledgersim_error::SimResult;

use crate::operation::Operation;
use crate::outcome::{Outcome, SkipReason, Stage};

/// Result of one precondition step: proceed with a value, or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate<T> {
    /// The step passed; the pipeline continues with the carried value.
    Pass(T),
    /// Current state does not admit the operation; the invocation ends as a
    /// skip with this reason.
    Skip(SkipReason),
}

impl<T> Gate<T> {
    /// Applies `f` to the carried value, leaving skips untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Gate<U> {
        match self {
            Self::Pass(value) => Gate::Pass(f(value)),
            Self::Skip(reason) => Gate::Skip(reason),
        }
    }
}

/// Collapses a step result into pipeline control flow.
///
/// Errors are attributed to `stage`; the cause is carried into the outcome
/// untouched.
pub fn step<T>(stage: Stage, result: SimResult<Gate<T>>) -> ControlFlow<Outcome, T> {
    match result {
        Ok(Gate::Pass(value)) => ControlFlow::Continue(value),
        Ok(Gate::Skip(reason)) => ControlFlow::Break(Outcome::Skip(reason)),
        Err(cause) => ControlFlow::Break(Outcome::Error { stage, cause }),
    }
}

/// Classifies the final submission step of a generator.
#[must_use]
pub fn classify_submission(result: SimResult<Operation>) -> Outcome {
    match result {
        Ok(operation) => Outcome::Success(operation),
        Err(cause) => Outcome::Error {
            stage: Stage::Submit,
            cause,
        },
    }
}

/// Runs one pipeline step inside a generator, returning early with the
/// outcome when the step skips or fails.
///
/// ```ignore
/// let collection = gate!(Stage::Discover, find_random_collection(rng, env.query, kind));
/// ```
#[macro_export]
macro_rules! gate {
    ($stage:expr, $step:expr) => {
        match $crate::pipeline::step($stage, $step) {
            ::core::ops::ControlFlow::Continue(value) => value,
            ::core::ops::ControlFlow::Break(outcome) => return outcome,
        }
    };
}
