//! Error types used by the crate.

use geofib_types::error::GeofibTypesError;
use thiserror::Error;

/// Geofib error type.
///
/// All variants are validation failures of the input: retrying the same call gives the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofibError {
    /// Malformed angle, azimuth or curve.
    #[error("format error: {0}")]
    Format(String),
    /// Traverse instruction issued in an invalid order or with too few points.
    #[error("sequence error: {0}")]
    Sequence(String),
    /// Geometry that cannot be offset or otherwise processed.
    #[error("geometry error: {0}")]
    Geometry(String),
    /// Inconsistent vault tree: duplicate parents or children, cycles, wrong number of head ends or vaults not
    /// connected to each other.
    #[error("structure error: {0}")]
    Structure(String),
    /// Named feature is not found in the coordinate source.
    #[error("missing feature {0}")]
    MissingFeature(String),
    /// Error from geometry operations.
    #[error(transparent)]
    Types(#[from] GeofibTypesError),
}
