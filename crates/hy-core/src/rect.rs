//! Axis-aligned hyperrectangles and their corner ("star") points.

use crate::error::{HyError, HyResult};
use crate::numeric::{Real, ensure_finite};

/// An axis-aligned box given by one `(low, high)` interval per dimension.
///
/// Bounds are validated on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<(Real, Real)>", into = "Vec<(Real, Real)>")
)]
pub struct HyperRectangle {
    dims: Vec<(Real, Real)>,
}

impl HyperRectangle {
    /// Create a hyperrectangle from its per-dimension bounds.
    ///
    /// Fails if there are no dimensions, if a bound is not finite, or if
    /// `low > high` in any dimension.
    pub fn new(dims: Vec<(Real, Real)>) -> HyResult<Self> {
        if dims.is_empty() {
            return Err(HyError::EmptyBounds);
        }
        for (dim, &(low, high)) in dims.iter().enumerate() {
            ensure_finite(low, "hyperrectangle lower bound")?;
            ensure_finite(high, "hyperrectangle upper bound")?;
            if low > high {
                return Err(HyError::InvalidBounds { dim, low, high });
            }
        }
        Ok(Self { dims })
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.dims.len()
    }

    /// Bounds of every dimension, in order.
    pub fn dims(&self) -> &[(Real, Real)] {
        &self.dims
    }

    /// True if `point` lies inside the box (bounds inclusive).
    pub fn contains(&self, point: &[Real]) -> bool {
        point.len() == self.dims.len()
            && point
                .iter()
                .zip(&self.dims)
                .all(|(&x, &(low, high))| low <= x && x <= high)
    }

    /// Enumerate the corner points of the box.
    ///
    /// Corners are produced in binary counting order over the dimensions
    /// with a non-zero width: bit `j` of the corner index selects the high
    /// bound of the `j`-th such dimension. Degenerate dimensions (`low ==
    /// high`) contribute their single value, so a box with `k` non-degenerate
    /// dimensions has exactly `2^k` distinct corners. Two boxes with the same
    /// degenerate pattern produce positionally matching corners.
    pub fn star(&self) -> HyResult<Vec<Vec<Real>>> {
        let free: Vec<usize> = self
            .dims
            .iter()
            .enumerate()
            .filter(|(_, (low, high))| low < high)
            .map(|(d, _)| d)
            .collect();

        if free.len() >= usize::BITS as usize {
            return Err(HyError::InvalidArg {
                what: "too many dimensions to enumerate star points",
            });
        }

        let base: Vec<Real> = self.dims.iter().map(|&(low, _)| low).collect();
        let count = 1_usize << free.len();
        let mut corners = Vec::with_capacity(count);

        for k in 0..count {
            let mut corner = base.clone();
            for (bit, &d) in free.iter().enumerate() {
                if k & (1 << bit) != 0 {
                    corner[d] = self.dims[d].1;
                }
            }
            corners.push(corner);
        }

        Ok(corners)
    }
}

impl TryFrom<Vec<(Real, Real)>> for HyperRectangle {
    type Error = HyError;

    fn try_from(dims: Vec<(Real, Real)>) -> HyResult<Self> {
        Self::new(dims)
    }
}

impl From<HyperRectangle> for Vec<(Real, Real)> {
    fn from(rect: HyperRectangle) -> Self {
        rect.dims
    }
}
