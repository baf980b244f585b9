//! TransientModel trait and the mode dynamics that implement it.

use hy_automaton::Mode;
use hy_core::Real;
use nalgebra::DVector;

use crate::error::{SimError, SimResult};

/// Trait for continuous dynamical systems `x_dot = f(t, x)`.
///
/// Integrators only see this trait, so they stay independent of how the
/// right-hand side is produced.
pub trait TransientModel {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: Real, x: &DVector<Real>) -> SimResult<DVector<Real>>;
}

/// The continuous dynamics of one mode, with arity and finiteness checks.
pub struct ModeDynamics<'a> {
    mode: &'a Mode,
    dimension: usize,
}

impl<'a> ModeDynamics<'a> {
    pub fn new(mode: &'a Mode, dimension: usize) -> Self {
        Self { mode, dimension }
    }
}

impl TransientModel for ModeDynamics<'_> {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn rhs(&self, t: Real, x: &DVector<Real>) -> SimResult<DVector<Real>> {
        let dx = self.mode.derivative(t, x.as_slice());
        if dx.len() != self.dimension() {
            return Err(SimError::MalformedMode {
                mode: self.mode.name().to_string(),
                expected: self.dimension(),
                actual: dx.len(),
            });
        }
        if dx.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Diverged {
                mode: self.mode.name().to_string(),
                time: t,
            });
        }
        Ok(DVector::from_vec(dx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_automaton::{HybridAutomatonBuilder, always};

    #[test]
    fn rhs_checks_arity_and_finiteness() {
        let mut builder = HybridAutomatonBuilder::new();
        let short = builder.add_mode("short", always, |_t: Real, _x: &[Real]| vec![1.0]);
        let blowup = builder.add_mode("blowup", always, |_t: Real, x: &[Real]| {
            x.iter().map(|v| 1.0 / v).collect::<Vec<Real>>()
        });
        let ha = builder.build().unwrap();
        let x = DVector::from_vec(vec![0.0, 0.0]);

        let err = ModeDynamics::new(ha.mode(short).unwrap(), 2)
            .rhs(0.0, &x)
            .unwrap_err();
        assert_eq!(err.kind(), "malformed_mode");

        let err = ModeDynamics::new(ha.mode(blowup).unwrap(), 2)
            .rhs(0.5, &x)
            .unwrap_err();
        assert_eq!(
            err,
            SimError::Diverged {
                mode: "blowup".into(),
                time: 0.5
            }
        );
    }
}
