//! Incremental automaton builder.

use std::collections::HashMap;

use hy_core::{ModeId, TransitionId};

use crate::automaton::{HybridAutomaton, Mode, Transition};
use crate::dynamics::{Derivative, Guard, Invariant, Reset};
use crate::error::AutomatonResult;
use crate::validate;

/// Builder for constructing a hybrid automaton incrementally.
///
/// Use `add_mode` and `add_transition` to build up the automaton,
/// then call `build()` to validate and seal it into an immutable `HybridAutomaton`.
/// Transition order is kept: it is the firing priority when several guards hold.
#[derive(Default)]
pub struct HybridAutomatonBuilder {
    modes: Vec<Mode>,
    transitions: Vec<Transition>,
    variables: Option<Vec<String>>,
    next_mode_id: u32,
    next_transition_id: u32,
}

impl HybridAutomatonBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the state variable names, fixing the automaton's dimension.
    pub fn with_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Add a mode and return its ID.
    pub fn add_mode(
        &mut self,
        name: impl Into<String>,
        invariant: impl Invariant + 'static,
        derivative: impl Derivative + 'static,
    ) -> ModeId {
        let id = ModeId::from_index(self.next_mode_id);
        self.next_mode_id += 1;
        self.modes.push(Mode {
            id,
            name: name.into(),
            invariant: Box::new(invariant),
            derivative: Box::new(derivative),
        });
        id
    }

    /// Add a transition from `source` to `target` and return its ID.
    pub fn add_transition(
        &mut self,
        source: ModeId,
        target: ModeId,
        guard: impl Guard + 'static,
        reset: impl Reset + 'static,
    ) -> TransitionId {
        let id = TransitionId::from_index(self.next_transition_id);
        self.next_transition_id += 1;
        self.transitions.push(Transition {
            id,
            source,
            target,
            guard: Box::new(guard),
            reset: Box::new(reset),
        });
        id
    }

    /// Look up the ID of a mode added earlier.
    pub fn mode_id(&self, name: &str) -> Option<ModeId> {
        self.modes.iter().find(|m| m.name == name).map(|m| m.id)
    }

    /// Build and validate the automaton, returning an immutable `HybridAutomaton`.
    pub fn build(self) -> AutomatonResult<HybridAutomaton> {
        validate::validate_modes(&self.modes)?;
        validate::validate_transitions(&self.modes, &self.transitions)?;
        if let Some(variables) = &self.variables {
            validate::validate_variables(variables)?;
        }

        let mode_names: HashMap<String, ModeId> =
            self.modes.iter().map(|m| (m.name.clone(), m.id)).collect();
        let (outgoing_offsets, outgoing) = Self::build_outgoing(&self.modes, &self.transitions);

        Ok(HybridAutomaton {
            modes: self.modes,
            transitions: self.transitions,
            mode_names,
            outgoing_offsets,
            outgoing,
            variables: self.variables,
        })
    }

    /// Build compact adjacency lists: for each mode, its outgoing transitions.
    fn build_outgoing(
        modes: &[Mode],
        transitions: &[Transition],
    ) -> (Vec<usize>, Vec<TransitionId>) {
        let mut by_source: Vec<Vec<TransitionId>> = vec![Vec::new(); modes.len()];
        // Declaration order within each source is preserved
        for t in transitions {
            by_source[t.source.slot()].push(t.id);
        }

        let mut offsets = Vec::with_capacity(modes.len() + 1);
        let mut flat = Vec::with_capacity(transitions.len());
        offsets.push(0);
        for list in by_source {
            flat.extend(list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{always, identity};
    use crate::error::AutomatonError;
    use hy_core::Real;

    fn zero(_t: Real, x: &[Real]) -> Vec<Real> {
        vec![0.0; x.len()]
    }

    #[test]
    fn builder_basic() {
        let mut builder = HybridAutomatonBuilder::new();
        let m1 = builder.add_mode("m1", always, zero);
        let m2 = builder.add_mode("m2", always, zero);
        let t1 = builder.add_transition(m1, m2, always, identity);

        assert_eq!(m1.index(), 0);
        assert_eq!(m2.index(), 1);
        assert_eq!(t1.index(), 0);
        assert_eq!(builder.mode_id("m2"), Some(m2));
        assert_eq!(builder.mode_id("m3"), None);
    }

    #[test]
    fn build_rejects_duplicate_mode_names() {
        let mut builder = HybridAutomatonBuilder::new();
        builder.add_mode("on", always, zero);
        builder.add_mode("on", always, zero);

        let err = builder.build().unwrap_err();
        assert_eq!(err, AutomatonError::DuplicateMode { name: "on".into() });
    }

    #[test]
    fn build_rejects_foreign_mode_ids() {
        let mut builder = HybridAutomatonBuilder::new();
        let on = builder.add_mode("on", always, zero);
        let bogus = ModeId::from_index(7);
        builder.add_transition(on, bogus, always, identity);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, AutomatonError::InvalidModeRef { mode, .. } if mode == bogus));
    }

    #[test]
    fn variables_fix_dimension() {
        let mut builder = HybridAutomatonBuilder::new().with_variables(["x", "y"]);
        builder.add_mode("on", always, zero);
        let ha = builder.build().unwrap();
        assert_eq!(ha.dimension(), Some(2));
        assert_eq!(ha.variables().unwrap(), ["x".to_string(), "y".to_string()]);
    }
}
