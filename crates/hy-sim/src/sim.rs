//! Simulation options and result records.

use hy_core::Real;
use nalgebra::DVector;

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "rk4"))]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

impl IntegratorType {
    pub(crate) fn step<M: TransientModel>(
        self,
        model: &M,
        t: Real,
        x: &DVector<Real>,
        dt: Real,
    ) -> SimResult<DVector<Real>> {
        match self {
            IntegratorType::RK4 => RK4.step(model, t, x, dt),
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt),
        }
    }
}

/// What a batch call does when one of its trajectories fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FailurePolicy {
    /// Report the failure in its slot and keep the other results.
    #[default]
    Isolate,
    /// Abort the whole call with the first failure (in input order).
    FailFast,
}

/// How range sampling summarizes a time window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RangeSampling {
    /// Value at the window's start time and at its end time.
    #[default]
    Endpoints,
    /// Minimum and maximum over every integration sample inside the window.
    Envelope,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SimOptions {
    /// Maximum integration step; steps are shortened to land on requested times
    pub dt: Real,
    /// Maximum number of steps per trajectory (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
    /// Batch failure handling
    pub failure_policy: FailurePolicy,
    /// Range summary for derivative/expression sampling
    pub range_sampling: RangeSampling,
    /// Run batch trajectories on the rayon thread pool
    pub parallel: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            max_steps: 10_000_000,
            integrator: IntegratorType::default(),
            failure_policy: FailurePolicy::default(),
            range_sampling: RangeSampling::default(),
            parallel: true,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// One point of a trajectory: the active mode and state at an instant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    pub time: Real,
    pub mode: String,
    pub state: Vec<Real>,
}

/// Record of a sampled trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimRecord {
    /// Samples in time order, starting with the initial state
    pub samples: Vec<Sample>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}
