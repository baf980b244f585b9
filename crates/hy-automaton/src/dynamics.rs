//! Capability traits for the functions attached to modes and transitions.
//!
//! Each trait has a blanket implementation for plain closures and function
//! pointers, so callers can pass `|x: &[f64]| x[0] < 1.0` directly or supply
//! their own types. All of them are `Send + Sync`: a sealed automaton is
//! shared read-only across simulation threads.

use hy_core::Real;

/// Mode invariant: does the state remain valid while in this mode?
pub trait Invariant: Send + Sync {
    fn holds(&self, state: &[Real]) -> bool;
}

impl<F> Invariant for F
where
    F: Fn(&[Real]) -> bool + Send + Sync,
{
    fn holds(&self, state: &[Real]) -> bool {
        self(state)
    }
}

/// Continuous dynamics of a mode: `dx/dt = f(t, x)`.
///
/// The returned vector must have the same length as `state`.
pub trait Derivative: Send + Sync {
    fn evaluate(&self, t: Real, state: &[Real]) -> Vec<Real>;
}

impl<F> Derivative for F
where
    F: Fn(Real, &[Real]) -> Vec<Real> + Send + Sync,
{
    fn evaluate(&self, t: Real, state: &[Real]) -> Vec<Real> {
        self(t, state)
    }
}

/// Transition guard: may the transition fire from this state?
pub trait Guard: Send + Sync {
    fn enabled(&self, state: &[Real]) -> bool;
}

impl<F> Guard for F
where
    F: Fn(&[Real]) -> bool + Send + Sync,
{
    fn enabled(&self, state: &[Real]) -> bool {
        self(state)
    }
}

/// Per-coordinate result of a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetValue {
    /// Coordinate passes through unchanged.
    Keep,
    /// Coordinate is replaced by this value.
    SetTo(Real),
}

impl From<Real> for ResetValue {
    fn from(v: Real) -> Self {
        ResetValue::SetTo(v)
    }
}

impl From<Option<Real>> for ResetValue {
    fn from(v: Option<Real>) -> Self {
        v.map_or(ResetValue::Keep, ResetValue::SetTo)
    }
}

impl ResetValue {
    /// Resolve against the pre-reset coordinate.
    pub fn resolve(self, previous: Real) -> Real {
        match self {
            ResetValue::Keep => previous,
            ResetValue::SetTo(v) => v,
        }
    }
}

/// Transition reset: maps the pre-transition state to the post-transition state.
///
/// The returned vector must have the same length as `state`.
pub trait Reset: Send + Sync {
    fn apply(&self, state: &[Real]) -> Vec<ResetValue>;
}

impl<F> Reset for F
where
    F: Fn(&[Real]) -> Vec<ResetValue> + Send + Sync,
{
    fn apply(&self, state: &[Real]) -> Vec<ResetValue> {
        self(state)
    }
}

/// Invariant or guard that always holds.
pub fn always(_state: &[Real]) -> bool {
    true
}

/// Invariant or guard that never holds.
pub fn never(_state: &[Real]) -> bool {
    false
}

/// Reset that keeps every coordinate.
pub fn identity(state: &[Real]) -> Vec<ResetValue> {
    vec![ResetValue::Keep; state.len()]
}
