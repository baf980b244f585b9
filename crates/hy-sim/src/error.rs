//! Error types for simulation operations.

use hy_automaton::AutomatonError;
use hy_core::{HyError, Real, TransitionId};
use thiserror::Error;

/// Errors encountered while simulating a hybrid automaton.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Unknown mode '{name}'")]
    UnknownMode { name: String },

    #[error("Invariant of mode '{mode}' violated at t={time} and no transition is enabled")]
    InvariantViolation { mode: String, time: Real },

    #[error("Simulation diverged in mode '{mode}' at t={time}: non-finite state")]
    Diverged { mode: String, time: Real },

    #[error("Reset of {transition} returned {actual} values, expected {expected}")]
    MalformedTransition {
        transition: TransitionId,
        expected: usize,
        actual: usize,
    },

    #[error("Mode '{mode}' derivative returned {actual} values, expected {expected}")]
    MalformedMode {
        mode: String,
        expected: usize,
        actual: usize,
    },

    #[error("Starting point has {actual} coordinates, automaton has {expected} variables")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Step budget of {max_steps} steps exceeded")]
    StepBudgetExceeded { max_steps: usize },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] HyError),

    #[error("Malformed automaton: {0}")]
    Automaton(AutomatonError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Stable token naming the error class, used in batch failure markers.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::UnknownMode { .. } => "unknown_mode",
            SimError::InvariantViolation { .. } => "invariant_violation",
            SimError::Diverged { .. } => "diverged",
            SimError::MalformedTransition { .. } => "malformed_transition",
            SimError::MalformedMode { .. } => "malformed_mode",
            SimError::DimensionMismatch { .. } => "dimension_mismatch",
            SimError::StepBudgetExceeded { .. } => "step_budget_exceeded",
            SimError::InvalidArg { .. } => "invalid_argument",
            SimError::Core(HyError::InvalidBounds { .. } | HyError::EmptyBounds) => {
                "invalid_bounds"
            }
            SimError::Core(_) => "invalid_argument",
            SimError::Automaton(_) => "malformed_automaton",
        }
    }
}

impl From<AutomatonError> for SimError {
    fn from(e: AutomatonError) -> Self {
        match e {
            AutomatonError::UnknownMode { name } => SimError::UnknownMode { name },
            other => SimError::Automaton(other),
        }
    }
}
