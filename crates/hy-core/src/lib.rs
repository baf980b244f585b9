//! hy-core: foundation types shared by the hybridsim crates.
//!
//! - `numeric`: the `Real` scalar, comparison slack, finiteness checks
//! - `ids`: typed `ModeId` / `TransitionId` handles
//! - `rect`: validated hyperrectangles and their corner points
//! - `error`: `HyError` for everything above

pub mod error;
pub mod ids;
pub mod numeric;
pub mod rect;

pub use error::{HyError, HyResult};
pub use ids::{ModeId, TransitionId};
pub use numeric::{Real, Tolerances, ensure_all_finite, ensure_finite, nearly_equal};
pub use rect::HyperRectangle;
