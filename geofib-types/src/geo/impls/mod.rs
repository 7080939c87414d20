//! Implementations of the geographic traits.

pub mod position;

pub use position::Position;
