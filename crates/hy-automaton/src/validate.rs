//! Automaton validation logic.

use std::collections::HashSet;

use crate::automaton::{Mode, Transition};
use crate::error::{AutomatonError, AutomatonResult};

/// Characters the sample protocol reserves; a mode name may not contain them.
const RESERVED: [char; 4] = [',', ';', '|', '!'];

/// Mode names must be non-empty, protocol-safe and unique.
pub(crate) fn validate_modes(modes: &[Mode]) -> AutomatonResult<()> {
    let mut seen = HashSet::new();
    for mode in modes {
        if mode.name.is_empty() || mode.name.contains(RESERVED) {
            return Err(AutomatonError::InvalidModeName {
                name: mode.name.clone(),
            });
        }
        if !seen.insert(mode.name.as_str()) {
            return Err(AutomatonError::DuplicateMode {
                name: mode.name.clone(),
            });
        }
    }
    Ok(())
}

/// Every transition endpoint must be a mode of this automaton.
pub(crate) fn validate_transitions(
    modes: &[Mode],
    transitions: &[Transition],
) -> AutomatonResult<()> {
    for t in transitions {
        for mode in [t.source, t.target] {
            if mode.slot() >= modes.len() {
                return Err(AutomatonError::InvalidModeRef {
                    transition: t.id,
                    mode,
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_variables(variables: &[String]) -> AutomatonResult<()> {
    let mut seen = HashSet::new();
    for name in variables {
        if !seen.insert(name.as_str()) {
            return Err(AutomatonError::DuplicateVariable { name: name.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::always;
    use hy_core::{ModeId, Real};

    fn mode(index: u32, name: &str) -> Mode {
        Mode {
            id: ModeId::from_index(index),
            name: name.into(),
            invariant: Box::new(always),
            derivative: Box::new(|_t: Real, x: &[Real]| x.to_vec()),
        }
    }

    #[test]
    fn validate_empty_automaton() {
        assert!(validate_modes(&[]).is_ok());
        assert!(validate_transitions(&[], &[]).is_ok());
    }

    #[test]
    fn validate_reserved_mode_names() {
        for bad in ["", "a,b", "a;b", "a|b", "!a"] {
            let result = validate_modes(&[mode(0, bad)]);
            assert!(
                matches!(result, Err(AutomatonError::InvalidModeName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_modes(&[mode(0, "loc_1"), mode(1, "Loc_1")]).is_ok());
    }

    #[test]
    fn validate_duplicate_variables() {
        let vars = vec!["x".to_string(), "v".to_string(), "x".to_string()];
        assert_eq!(
            validate_variables(&vars),
            Err(AutomatonError::DuplicateVariable { name: "x".into() })
        );
    }
}
