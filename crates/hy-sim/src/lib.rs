//! Simulation engine for hybrid automata.
//!
//! Provides:
//! - Fixed-step RK4 and forward Euler integrators
//! - Trajectory integration with invariant checks and transition firing
//! - Batch fixed-time and trajectory sampling over many start points (rayon)
//! - Derivative and expression range sampling over time windows
//! - The delimited-text sample protocol consumed by external tools

pub mod error;
pub mod integrator;
pub mod model;
pub mod protocol;
pub mod sim;
pub mod simulate;
pub mod trajectory;

// Internal modules
mod events;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::{ModeDynamics, TransientModel};
pub use sim::{FailurePolicy, IntegratorType, RangeSampling, Sample, SimOptions, SimRecord};
pub use simulate::{
    simulate_der_range, simulate_derivative_ranges, simulate_exp_range,
    simulate_expression_ranges, simulate_multi_trajectory_time, simulate_points_to_time,
    simulate_set_time, simulate_star_to_time, simulate_trajectories,
};
pub use trajectory::Trajectory;
