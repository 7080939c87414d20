//! Geofib computes survey traverses and fiber network routes over geodetic coordinates.
//!
//! # Traverses
//!
//! Parcels and easements are described by calls: bearings and distances, curves and chords, starting from a tie
//! point. A [`Traverse`](cogo::Traverse) follows the calls over the WGS84 ellipsoid and gives the boundary as a
//! polygon, its misclosure, or a swath around it when the calls describe a centerline:
//!
//! ```
//! use geofib::cogo::{run_calls, TraverseCall};
//! use geofib::geofib_types::latlon;
//!
//! let calls: Vec<TraverseCall> = serde_json::from_str(r#"[
//!     "beginning",
//!     ["N", "00 00 00", "E", 100.0],
//!     ["S", "90 00 00", "E", 100.0],
//!     ["S", "00 00 00", "W", 100.0],
//!     "closes"
//! ]"#)?;
//!
//! let traverse = run_calls("Lot 7", latlon!(37.34315, -123.175722), "Book 12, page 40", &calls)?;
//! let polygon = traverse.as_polygon()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Fiber networks
//!
//! A [`FiberManager`](fiber::FiberManager) keeps the tree of vaults connected by backbone ducts, with the head end at
//! its root. Every fiber drop enters the backbone at one vault and is spliced to the trunk at another one: the manager
//! finds the ducts the drop runs through and keeps count of the drops in each duct and of the trunk strands passing
//! each vault. [`Design`](design::Design) does the whole calculation for a network described by a
//! [`DesignConfig`](design::DesignConfig).
//!
//! Both take the survey features (vault locations, alignments) from a [`CoordinateSource`].

pub mod cogo;
pub mod design;
pub mod error;
pub mod fiber;
mod source;

pub use source::CoordinateSource;

// Reexport geofib_types
pub use geofib_types;
