//! Lookup of named survey features.

use std::collections::HashMap;
use std::hash::BuildHasher;

use geofib_types::Position;

use crate::error::GeofibError;

/// Source of survey features: named coordinate sequences, usually read from a survey document.
///
/// Point features (vaults, demarcs) have a single coordinate, alignments have one per vertex.
pub trait CoordinateSource {
    /// Coordinates of the feature with the given name, or `None` if there is no such feature.
    fn coordinates(&self, name: &str) -> Option<&[Position]>;

    /// Coordinates of the feature, failing if the feature does not exist or has no coordinates.
    fn require(&self, name: &str) -> Result<&[Position], GeofibError> {
        match self.coordinates(name) {
            Some(coordinates) if !coordinates.is_empty() => Ok(coordinates),
            _ => Err(GeofibError::MissingFeature(name.to_string())),
        }
    }

    /// First coordinate of the feature. This is the location of point features.
    fn location(&self, name: &str) -> Result<Position, GeofibError> {
        self.require(name).map(|coordinates| coordinates[0])
    }
}

impl<S: BuildHasher> CoordinateSource for HashMap<String, Vec<Position>, S> {
    fn coordinates(&self, name: &str) -> Option<&[Position]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl<T: CoordinateSource + ?Sized> CoordinateSource for &T {
    fn coordinates(&self, name: &str) -> Option<&[Position]> {
        (**self).coordinates(name)
    }
}
