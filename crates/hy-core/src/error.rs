use thiserror::Error;

use crate::numeric::Real;

pub type HyResult<T> = Result<T, HyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HyError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: Real },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid bounds in dimension {dim}: low {low} exceeds high {high}")]
    InvalidBounds { dim: usize, low: Real, high: Real },

    #[error("Invalid bounds: a hyperrectangle needs at least one dimension")]
    EmptyBounds,
}
