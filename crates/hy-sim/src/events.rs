//! Discrete transition handling for trajectory integration.

use hy_automaton::{HybridAutomaton, Transition};
use hy_core::{ModeId, Real};

use crate::error::{SimError, SimResult};

/// First transition leaving `mode` whose guard holds at `state`.
///
/// Declaration order is firing priority.
pub(crate) fn first_enabled<'a>(
    automaton: &'a HybridAutomaton,
    mode: ModeId,
    state: &[Real],
) -> Option<&'a Transition> {
    automaton.outgoing(mode).find(|t| t.enabled(state))
}

/// Apply a transition's reset, copying `Keep` coordinates from `state`.
pub(crate) fn apply_reset(transition: &Transition, state: &[Real]) -> SimResult<Vec<Real>> {
    let values = transition.reset(state);
    if values.len() != state.len() {
        return Err(SimError::MalformedTransition {
            transition: transition.id(),
            expected: state.len(),
            actual: values.len(),
        });
    }
    Ok(values
        .into_iter()
        .zip(state)
        .map(|(v, &prev)| v.resolve(prev))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_automaton::{HybridAutomatonBuilder, ResetValue, always, never};

    fn zero(_t: Real, x: &[Real]) -> Vec<Real> {
        vec![0.0; x.len()]
    }

    #[test]
    fn first_enabled_respects_declaration_order() {
        let mut builder = HybridAutomatonBuilder::new();
        let a = builder.add_mode("a", always, zero);
        let b = builder.add_mode("b", always, zero);
        let c = builder.add_mode("c", always, zero);
        builder.add_transition(a, b, never, hy_automaton::identity);
        let positive = |x: &[Real]| x[0] > 0.0;
        let second = builder.add_transition(a, c, positive, hy_automaton::identity);
        builder.add_transition(a, b, always, hy_automaton::identity);
        let ha = builder.build().unwrap();

        assert_eq!(first_enabled(&ha, a, &[1.0]).map(|t| t.id()), Some(second));
        assert_eq!(first_enabled(&ha, a, &[-1.0]).map(|t| t.target()), Some(b));
        assert!(first_enabled(&ha, c, &[1.0]).is_none());
    }

    #[test]
    fn partial_reset_keeps_marked_coordinates() {
        let mut builder = HybridAutomatonBuilder::new();
        let a = builder.add_mode("a", always, zero);
        let t = builder.add_transition(a, a, always, |x: &[Real]| {
            vec![ResetValue::Keep, ResetValue::SetTo(-x[1]), ResetValue::Keep]
        });
        let ha = builder.build().unwrap();
        let transition = ha.transition(t).unwrap();

        let state = [0.1 + 0.2, 4.0, -7.25];
        let reset = apply_reset(transition, &state).unwrap();
        assert_eq!(reset[0].to_bits(), state[0].to_bits());
        assert_eq!(reset[1], -4.0);
        assert_eq!(reset[2].to_bits(), state[2].to_bits());
    }

    #[test]
    fn reset_arity_mismatch_is_malformed() {
        let mut builder = HybridAutomatonBuilder::new();
        let a = builder.add_mode("a", always, zero);
        let t = builder.add_transition(a, a, always, |_x: &[Real]| vec![ResetValue::Keep]);
        let ha = builder.build().unwrap();

        let err = apply_reset(ha.transition(t).unwrap(), &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            SimError::MalformedTransition {
                transition: t,
                expected: 2,
                actual: 1
            }
        );
    }
}
