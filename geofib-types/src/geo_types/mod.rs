//! Interoperability with the [`geo_types`] crate.
//!
//! `geo_types` stores geographic coordinates as `x = longitude`, `y = latitude`.

mod coord;
mod point;
