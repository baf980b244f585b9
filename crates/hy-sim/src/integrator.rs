//! Fixed-step time integrators.

use hy_core::Real;
use nalgebra::DVector;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: Real,
        x: &DVector<Real>,
        dt: Real,
    ) -> SimResult<DVector<Real>>;
}

/// The state handed to a step must match the model's dimension.
fn check_state<M: TransientModel>(model: &M, x: &DVector<Real>) -> SimResult<()> {
    if x.len() != model.dimension() {
        return Err(SimError::DimensionMismatch {
            expected: model.dimension(),
            actual: x.len(),
        });
    }
    Ok(())
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: Real,
        x: &DVector<Real>,
        dt: Real,
    ) -> SimResult<DVector<Real>> {
        check_state(model, x)?;
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + 0.5 * dt, &(x + &k1 * (0.5 * dt)))?;
        let k3 = model.rhs(t + 0.5 * dt, &(x + &k2 * (0.5 * dt)))?;
        let k4 = model.rhs(t + dt, &(x + &k3 * dt))?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
        Ok(x + k_sum * (dt / 6.0))
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: Real,
        x: &DVector<Real>,
        dt: Real,
    ) -> SimResult<DVector<Real>> {
        check_state(model, x)?;
        let xdot = model.rhs(t, x)?;
        Ok(x + xdot * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x' = x, exact solution e^t.
    struct Growth;

    impl TransientModel for Growth {
        fn dimension(&self) -> usize {
            1
        }

        fn rhs(&self, _t: Real, x: &DVector<Real>) -> SimResult<DVector<Real>> {
            Ok(x.clone())
        }
    }

    fn integrate<I: Integrator>(integrator: &I, steps: usize) -> Real {
        let dt = 1.0 / steps as Real;
        let mut x = DVector::from_vec(vec![1.0]);
        for i in 0..steps {
            x = integrator.step(&Growth, i as Real * dt, &x, dt).unwrap();
        }
        x[0]
    }

    #[test]
    fn rk4_is_fourth_order_accurate() {
        let err = (integrate(&RK4, 100) - 1.0_f64.exp()).abs();
        assert!(err < 1e-9, "RK4 error too large: {err}");
    }

    #[test]
    fn steps_reject_a_state_of_the_wrong_size() {
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let expected = SimError::DimensionMismatch {
            expected: 1,
            actual: 2,
        };
        assert_eq!(RK4.step(&Growth, 0.0, &x, 0.1).unwrap_err(), expected);
        assert_eq!(
            ForwardEuler.step(&Growth, 0.0, &x, 0.1).unwrap_err(),
            expected
        );
    }

    #[test]
    fn euler_converges_at_first_order() {
        let coarse = (integrate(&ForwardEuler, 100) - 1.0_f64.exp()).abs();
        let fine = (integrate(&ForwardEuler, 200) - 1.0_f64.exp()).abs();
        let ratio = coarse / fine;
        assert!((1.8..2.2).contains(&ratio), "unexpected ratio {ratio}");
    }
}
