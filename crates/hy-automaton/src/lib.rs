//! hy-automaton: hybrid automaton data model for hybridsim.
//!
//! Provides:
//! - Dynamics capability traits (invariant, derivative, guard, reset)
//! - Modes and transitions
//! - Incremental automaton builder that seals into an immutable `HybridAutomaton`
//!
//! # Example
//!
//! ```
//! use hy_automaton::{HybridAutomatonBuilder, ResetValue, always};
//!
//! let mut builder = HybridAutomatonBuilder::new();
//! let on = builder.add_mode("on", always, |_t: f64, x: &[f64]| vec![1.0, 2.0 * x[0]]);
//! let off = builder.add_mode("off", always, |_t: f64, _x: &[f64]| vec![-1.0, -2.0]);
//! builder.add_transition(on, off, |x: &[f64]| x[0] >= 1.0, |_x: &[f64]| {
//!     vec![ResetValue::Keep, ResetValue::SetTo(0.0)]
//! });
//! let ha = builder.build().unwrap();
//!
//! assert_eq!(ha.modes().len(), 2);
//! assert_eq!(ha.transitions().len(), 1);
//! ```

pub mod automaton;
pub mod builder;
pub mod dynamics;
pub mod error;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use automaton::{HybridAutomaton, Mode, Transition};
pub use builder::HybridAutomatonBuilder;
pub use dynamics::{Derivative, Guard, Invariant, Reset, ResetValue, always, identity, never};
pub use error::{AutomatonError, AutomatonResult};
