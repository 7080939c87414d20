//! Traits shared by all geographic point types.

pub mod point;
