//! Core automaton data structures.

use std::collections::HashMap;
use std::fmt;

use hy_core::{ModeId, Real, TransitionId};

use crate::dynamics::{Derivative, Guard, Invariant, Reset, ResetValue};
use crate::error::{AutomatonError, AutomatonResult};

/// A named region of continuous dynamics.
pub struct Mode {
    pub(crate) id: ModeId,
    pub(crate) name: String,
    pub(crate) invariant: Box<dyn Invariant>,
    pub(crate) derivative: Box<dyn Derivative>,
}

impl Mode {
    pub fn id(&self) -> ModeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the invariant at `state`.
    pub fn invariant_holds(&self, state: &[Real]) -> bool {
        self.invariant.holds(state)
    }

    /// Evaluate the derivative at `(t, state)`.
    pub fn derivative(&self, t: Real, state: &[Real]) -> Vec<Real> {
        self.derivative.evaluate(t, state)
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A discrete edge between two modes.
pub struct Transition {
    pub(crate) id: TransitionId,
    pub(crate) source: ModeId,
    pub(crate) target: ModeId,
    pub(crate) guard: Box<dyn Guard>,
    pub(crate) reset: Box<dyn Reset>,
}

impl Transition {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn source(&self) -> ModeId {
        self.source
    }

    pub fn target(&self) -> ModeId {
        self.target
    }

    /// Evaluate the guard at `state`.
    pub fn enabled(&self, state: &[Real]) -> bool {
        self.guard.enabled(state)
    }

    /// Evaluate the reset at `state`, before `Keep` markers are resolved.
    pub fn reset(&self, state: &[Real]) -> Vec<ResetValue> {
        self.reset.apply(state)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// A validated, immutable hybrid automaton.
///
/// Stores:
/// - All modes and transitions in vectors (indexed by their IDs).
/// - A name lookup for modes.
/// - Compact outgoing adjacency: for each mode, its transitions in declaration order.
///
/// Every dynamics function is `Send + Sync`, so a sealed automaton can be
/// shared by reference across simulation threads.
#[derive(Debug)]
pub struct HybridAutomaton {
    pub(crate) modes: Vec<Mode>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) mode_names: HashMap<String, ModeId>,

    /// Mode i's outgoing transitions are outgoing[outgoing_offsets[i]..outgoing_offsets[i+1]].
    pub(crate) outgoing_offsets: Vec<usize>,
    pub(crate) outgoing: Vec<TransitionId>,

    pub(crate) variables: Option<Vec<String>>,
}

impl HybridAutomaton {
    /// Return all modes.
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Return all transitions, in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Get a mode by ID (returns None if ID out of bounds).
    pub fn mode(&self, id: ModeId) -> Option<&Mode> {
        self.modes.get(id.slot())
    }

    /// Get a transition by ID (returns None if ID out of bounds).
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.slot())
    }

    /// Look up a mode by name (case-sensitive).
    pub fn mode_by_name(&self, name: &str) -> Option<&Mode> {
        self.mode_names.get(name).and_then(|&id| self.mode(id))
    }

    /// Resolve a mode name to its ID.
    pub fn resolve(&self, name: &str) -> AutomatonResult<ModeId> {
        self.mode_names
            .get(name)
            .copied()
            .ok_or_else(|| AutomatonError::UnknownMode {
                name: name.to_string(),
            })
    }

    /// Transitions leaving `mode`, in declaration (firing priority) order.
    pub fn outgoing(&self, mode: ModeId) -> impl Iterator<Item = &Transition> + '_ {
        let idx = mode.slot();
        let ids: &[TransitionId] = if idx < self.modes.len() {
            &self.outgoing[self.outgoing_offsets[idx]..self.outgoing_offsets[idx + 1]]
        } else {
            &[]
        };
        ids.iter().map(move |id| &self.transitions[id.slot()])
    }

    /// Declared variable names, if the builder was given any.
    pub fn variables(&self) -> Option<&[String]> {
        self.variables.as_deref()
    }

    /// State dimension, known only when variables were declared.
    pub fn dimension(&self) -> Option<usize> {
        self.variables.as_ref().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::HybridAutomatonBuilder;
    use crate::dynamics::{always, identity};

    fn zero(_t: Real, x: &[Real]) -> Vec<Real> {
        vec![0.0; x.len()]
    }

    #[test]
    fn outgoing_keeps_declaration_order() {
        let mut builder = HybridAutomatonBuilder::new();
        let a = builder.add_mode("a", always, zero);
        let b = builder.add_mode("b", always, zero);
        let c = builder.add_mode("c", always, zero);
        let t0 = builder.add_transition(a, c, always, identity);
        let t1 = builder.add_transition(b, a, always, identity);
        let t2 = builder.add_transition(a, b, always, identity);
        let ha = builder.build().unwrap();

        let from_a: Vec<TransitionId> = ha.outgoing(a).map(|t| t.id()).collect();
        assert_eq!(from_a, vec![t0, t2]);
        let from_b: Vec<TransitionId> = ha.outgoing(b).map(|t| t.id()).collect();
        assert_eq!(from_b, vec![t1]);
        assert_eq!(ha.outgoing(c).count(), 0);
        assert_eq!(ha.outgoing(ModeId::from_index(99)).count(), 0);
    }

    #[test]
    fn mode_lookup_is_case_sensitive() {
        let mut builder = HybridAutomatonBuilder::new();
        let on = builder.add_mode("on", always, zero);
        let ha = builder.build().unwrap();

        assert_eq!(ha.resolve("on").unwrap(), on);
        assert_eq!(ha.mode_by_name("on").unwrap().name(), "on");
        assert_eq!(
            ha.resolve("ON"),
            Err(AutomatonError::UnknownMode { name: "ON".into() })
        );
        assert!(ha.dimension().is_none());
    }
}
