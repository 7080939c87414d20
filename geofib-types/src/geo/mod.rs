//! Geographic points (latitude and longitude, see [`GeoPoint`]) and geodesic computations on a reference ellipsoid
//! (see [`Datum`]).

mod datum;
pub mod impls;
mod traits;
pub mod vincenty;

pub use datum::Datum;
pub use traits::point::{GeoPoint, NewGeoPoint, RangeBearing};
pub use vincenty::{normalize_azimuth, DirectSolution, InverseSolution};
