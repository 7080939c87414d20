//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofibTypesError {
    /// Operation needs at least one point, but the geometry has none.
    #[error("geometry has no points")]
    EmptyGeometry,
}
