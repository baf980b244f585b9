//! Single-trajectory integration through mode switches.
//!
//! A `Trajectory` owns the ephemeral state of one simulation (time, active
//! mode, state vector, step count) and borrows the automaton read-only.
//! Each step integrates the active mode's derivative, then checks the
//! mode invariant and fires at most one enabled transition.

use hy_automaton::{HybridAutomaton, Mode};
use hy_core::{ModeId, Real, ensure_all_finite, ensure_finite};
use nalgebra::DVector;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::events;
use crate::model::{ModeDynamics, TransientModel};
use crate::sim::{IntegratorType, Sample, SimOptions};

pub struct Trajectory<'a> {
    automaton: &'a HybridAutomaton,
    integrator: IntegratorType,
    max_steps: usize,
    mode: ModeId,
    time: Real,
    state: DVector<Real>,
    steps: usize,
}

impl<'a> Trajectory<'a> {
    /// Start a trajectory at time zero.
    pub fn start(
        automaton: &'a HybridAutomaton,
        mode_name: &str,
        point: &[Real],
        opts: &SimOptions,
    ) -> SimResult<Self> {
        Self::start_at(automaton, mode_name, point, 0.0, opts)
    }

    /// Start a trajectory at time `t0`.
    ///
    /// Transitions already enabled at the starting state fire before any
    /// integration happens (urgent start).
    pub fn start_at(
        automaton: &'a HybridAutomaton,
        mode_name: &str,
        point: &[Real],
        t0: Real,
        opts: &SimOptions,
    ) -> SimResult<Self> {
        opts.validate()?;
        let mode = automaton.resolve(mode_name)?;

        if point.is_empty() {
            return Err(SimError::InvalidArg {
                what: "starting point must have at least one coordinate",
            });
        }
        if let Some(expected) = automaton.dimension() {
            if expected != point.len() {
                return Err(SimError::DimensionMismatch {
                    expected,
                    actual: point.len(),
                });
            }
        }
        ensure_all_finite(point, "starting point")?;
        ensure_finite(t0, "start time")?;

        let mut trajectory = Self {
            automaton,
            integrator: opts.integrator,
            max_steps: opts.max_steps,
            mode,
            time: t0,
            state: DVector::from_column_slice(point),
            steps: 0,
        };
        trajectory.settle()?;
        Ok(trajectory)
    }

    pub fn time(&self) -> Real {
        self.time
    }

    pub fn mode_id(&self) -> ModeId {
        self.mode
    }

    pub fn mode(&self) -> &'a Mode {
        &self.automaton.modes()[self.mode.slot()]
    }

    pub fn state(&self) -> &[Real] {
        self.state.as_slice()
    }

    /// Number of integration steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Derivative of the active mode at the current time and state.
    pub fn derivative(&self) -> SimResult<Vec<Real>> {
        let model = ModeDynamics::new(self.mode(), self.state.len());
        Ok(model.rhs(self.time, &self.state)?.as_slice().to_vec())
    }

    /// Snapshot of the current time, mode and state.
    pub fn sample(&self) -> Sample {
        Sample {
            time: self.time,
            mode: self.mode().name().to_string(),
            state: self.state().to_vec(),
        }
    }

    /// Integrate forward until exactly `t_end`.
    ///
    /// The span is split into equal steps no longer than `max_dt`, and the
    /// last step lands on `t_end` exactly. `observe` is called after every
    /// step (after any transition fired in that step).
    pub fn advance_to<F>(&mut self, t_end: Real, max_dt: Real, mut observe: F) -> SimResult<()>
    where
        F: FnMut(&Trajectory<'a>) -> SimResult<()>,
    {
        if !t_end.is_finite() || t_end < self.time {
            return Err(SimError::InvalidArg {
                what: "target time must be finite and not before the current time",
            });
        }
        if !(max_dt.is_finite() && max_dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "step size must be positive and finite",
            });
        }

        let t_start = self.time;
        let span = t_end - t_start;
        if span == 0.0 {
            return Ok(());
        }

        let n = (span / max_dt).ceil().max(1.0) as usize;
        if self.steps.saturating_add(n) > self.max_steps {
            return Err(SimError::StepBudgetExceeded {
                max_steps: self.max_steps,
            });
        }

        let h = span / n as Real;
        for i in 1..=n {
            let t_next = if i == n {
                t_end
            } else {
                t_start + h * i as Real
            };
            self.step_to(t_next)?;
            observe(self)?;
        }
        Ok(())
    }

    /// One integration step to `t_next`, then invariant and transition checks.
    fn step_to(&mut self, t_next: Real) -> SimResult<()> {
        let model = ModeDynamics::new(self.mode(), self.state.len());
        let next = self
            .integrator
            .step(&model, self.time, &self.state, t_next - self.time)?;

        if next.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Diverged {
                mode: self.mode().name().to_string(),
                time: t_next,
            });
        }

        self.state = next;
        self.time = t_next;
        self.steps += 1;
        self.settle()
    }

    /// Check the invariant, then fire the first enabled transition, if any.
    fn settle(&mut self) -> SimResult<()> {
        let inside = self.mode().invariant_holds(self.state());

        let Some(transition) = events::first_enabled(self.automaton, self.mode, self.state())
        else {
            if inside {
                return Ok(());
            }
            return Err(SimError::InvariantViolation {
                mode: self.mode().name().to_string(),
                time: self.time,
            });
        };

        let reset = events::apply_reset(transition, self.state())?;
        if reset.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Diverged {
                mode: self.mode().name().to_string(),
                time: self.time,
            });
        }

        let from = self.mode().name();
        self.mode = transition.target();
        self.state = DVector::from_vec(reset);
        debug!(
            transition = %transition.id(),
            from,
            to = self.mode().name(),
            time = self.time,
            "transition fired"
        );

        if !self.mode().invariant_holds(self.state()) {
            return Err(SimError::InvariantViolation {
                mode: self.mode().name().to_string(),
                time: self.time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_automaton::{HybridAutomatonBuilder, ResetValue, always};
    use hy_core::{Tolerances, nearly_equal};

    const TOL: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };

    fn parabola() -> HybridAutomaton {
        let mut builder = HybridAutomatonBuilder::new();
        builder.add_mode("on", always, |_t: Real, x: &[Real]| vec![1.0, 2.0 * x[0]]);
        builder.build().unwrap()
    }

    #[test]
    fn advance_lands_exactly_on_target() {
        let ha = parabola();
        let opts = SimOptions {
            dt: 0.3,
            ..SimOptions::default()
        };
        let mut traj = Trajectory::start(&ha, "on", &[0.0, 0.0], &opts).unwrap();
        let mut times = Vec::new();
        traj.advance_to(1.0, opts.dt, |t| {
            times.push(t.time());
            Ok(())
        })
        .unwrap();

        assert_eq!(times.len(), 4);
        assert_eq!(traj.time(), 1.0);
        assert_eq!(traj.steps(), 4);
        assert!(nearly_equal(traj.state()[1], 1.0, TOL));
    }

    #[test]
    fn advance_rejects_going_backwards() {
        let ha = parabola();
        let opts = SimOptions::default();
        let mut traj = Trajectory::start_at(&ha, "on", &[0.0, 0.0], 2.0, &opts).unwrap();
        let err = traj.advance_to(1.0, opts.dt, |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
        assert!(traj.advance_to(2.0, opts.dt, |_| Ok(())).is_ok());
        assert_eq!(traj.steps(), 0);
    }

    #[test]
    fn step_budget_is_enforced() {
        let ha = parabola();
        let opts = SimOptions {
            dt: 0.1,
            max_steps: 5,
            ..SimOptions::default()
        };
        let mut traj = Trajectory::start(&ha, "on", &[0.0, 0.0], &opts).unwrap();
        assert!(traj.advance_to(0.5, opts.dt, |_| Ok(())).is_ok());
        assert_eq!(
            traj.advance_to(0.6, opts.dt, |_| Ok(())).unwrap_err(),
            SimError::StepBudgetExceeded { max_steps: 5 }
        );
    }

    #[test]
    fn urgent_transition_fires_at_start() {
        let mut builder = HybridAutomatonBuilder::new();
        let init = builder.add_mode("init", always, |_t: Real, x: &[Real]| vec![0.0; x.len()]);
        let on = builder.add_mode("on", always, |_t: Real, _x: &[Real]| vec![1.0, 0.0]);
        builder.add_transition(init, on, always, |x: &[Real]| {
            vec![ResetValue::Keep, ResetValue::SetTo(x[0] + 10.0)]
        });
        let ha = builder.build().unwrap();

        let traj = Trajectory::start(&ha, "init", &[1.0, 0.0], &SimOptions::default()).unwrap();
        assert_eq!(traj.mode_id(), on);
        assert_eq!(traj.state(), &[1.0, 11.0]);
        assert_eq!(traj.time(), 0.0);
    }

    #[test]
    fn start_rejects_bad_input() {
        let ha = parabola();
        let opts = SimOptions::default();
        assert_eq!(
            Trajectory::start(&ha, "off", &[0.0, 0.0], &opts).err(),
            Some(SimError::UnknownMode { name: "off".into() })
        );
        assert!(Trajectory::start(&ha, "on", &[], &opts).is_err());
        assert!(Trajectory::start(&ha, "on", &[Real::NAN, 0.0], &opts).is_err());
    }
}
