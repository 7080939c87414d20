//! Coordinate geometry: survey angles, curves and traverses.

pub mod angle;
pub mod arc;
pub mod call;
mod traverse;

pub use call::{run_calls, TraverseCall};
pub use traverse::{Closure, RangeAzimuth, Traverse, CLOSURE_TOLERANCE_FEET};
