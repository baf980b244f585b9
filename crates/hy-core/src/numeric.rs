//! Scalar type and float checks shared by the workspace.

use crate::HyError;

/// Scalar used for time and every state coordinate.
pub type Real = f64;

/// Absolute and relative slack for comparing two reals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `a` and `b` differ by at most `tol.abs`, or by at most `tol.rel` of the
/// larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let gap = (a - b).abs();
    gap <= tol.abs || gap <= tol.rel * a.abs().max(b.abs())
}

/// Pass `v` through, or name it in a `NonFinite` error.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HyError> {
    if !v.is_finite() {
        return Err(HyError::NonFinite { what, value: v });
    }
    Ok(v)
}

/// Check every component of a vector, reporting the first non-finite one.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), HyError> {
    values
        .iter()
        .try_for_each(|&v| ensure_finite(v, what).map(drop))
}
