//! Geographic types for survey and fiber design work.
//!
//! * [`geo`] - geographic points ([`GeoPoint`](geo::GeoPoint), [`Position`](geo::impls::Position)) and Vincenty's
//!   geodesic solutions on the WGS84 [`Datum`](geo::Datum).
//! * [`contour`] - point sequences with linear referencing, used for alignments.
//! * [`units`] - feet, meters and degree approximations.

pub mod contour;
pub mod error;
pub mod geo;
pub mod segment;
pub mod units;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use contour::Contour;
pub use geo::impls::Position;
