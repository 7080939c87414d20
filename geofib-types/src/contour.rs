//! Contour is an open sequence of points, like a backbone alignment or a drop duct: the first and the last points
//! are not connected.
//!
//! Besides iteration, contours support linear referencing: a point can be snapped onto the contour
//! ([`Contour::project`]), giving its distance along the contour, and a distance can be turned back into a point
//! ([`Contour::interpolate`]) or used to cut a piece of the contour ([`Contour::substring`]). These distances are
//! measured in degrees in the plane of longitude and latitude (see [`Segment`]).

use serde::{Deserialize, Serialize};

use crate::error::GeofibTypesError;
use crate::geo::{GeoPoint, NewGeoPoint};
use crate::segment::Segment;

/// Sequence of points. See module level documentation for details.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contour<Point> {
    points: Vec<Point>,
}

impl<Point> std::ops::Deref for Contour<Point> {
    type Target = Vec<Point>;

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl<Point> Contour<Point> {
    /// Creates a new contour.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Consumes the contour returning its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Iterates over segments between consecutive points of the contour.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Point>> {
        self.points.windows(2).map(|pair| Segment(&pair[0], &pair[1]))
    }
}

impl<P: GeoPoint> Contour<P> {
    /// Length of the contour in degrees, see module documentation.
    pub fn planar_length(&self) -> f64 {
        self.iter_segments().map(|s| s.planar_length()).sum()
    }

    /// Sum of the WGS84 geodesic lengths of all segments in feet.
    pub fn geodesic_length_feet(&self) -> f64 {
        self.iter_segments()
            .map(|Segment(from, to)| from.range_bearing_to(to).range_feet)
            .sum()
    }

    /// Distance along the contour of the contour point nearest to `point`.
    pub fn project(&self, point: &impl GeoPoint) -> Result<f64, GeofibTypesError> {
        if self.points.is_empty() {
            return Err(GeofibTypesError::EmptyGeometry);
        }

        let mut travelled = 0.0;
        let mut best_distance = f64::INFINITY;
        let mut best_position = 0.0;
        for segment in self.iter_segments() {
            let distance = segment.distance_to_point_sq(point);
            let length = segment.planar_length();
            if distance < best_distance {
                best_distance = distance;
                best_position = travelled + segment.project_fraction(point) * length;
            }
            travelled += length;
        }

        Ok(best_position)
    }
}

impl<P: NewGeoPoint> Contour<P> {
    /// Point at the given distance along the contour. Distances out of the contour range are clamped to its ends.
    pub fn interpolate(&self, distance: f64) -> Result<P, GeofibTypesError> {
        let first = self.points.first().ok_or(GeofibTypesError::EmptyGeometry)?;

        let mut remaining = distance.max(0.0);
        let mut end = first;
        for segment in self.iter_segments() {
            let length = segment.planar_length();
            if length > 0.0 && remaining <= length {
                return Ok(segment.interpolate(remaining / length));
            }

            remaining -= length;
            end = segment.1;
        }

        Ok(P::latlon(end.lat(), end.lon()))
    }

    /// Part of the contour between two distances along it.
    ///
    /// The result starts at `start` and ends at `end`: if `start` is farther along the contour than `end`, the
    /// returned points run against the direction of the contour.
    pub fn substring(&self, start: f64, end: f64) -> Result<Vec<P>, GeofibTypesError> {
        if start > end {
            let mut reversed = self.substring(end, start)?;
            reversed.reverse();
            return Ok(reversed);
        }

        let mut result = vec![self.interpolate(start)?];
        if start == end {
            return Ok(result);
        }

        let mut travelled = 0.0;
        for segment in self.iter_segments() {
            travelled += segment.planar_length();
            if travelled > start && travelled < end {
                result.push(P::latlon(segment.1.lat(), segment.1.lon()));
            }
        }

        result.push(self.interpolate(end)?);
        Ok(result)
    }
}

impl<P> From<Vec<P>> for Contour<P> {
    fn from(points: Vec<P>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::impls::Position;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn ell() -> Contour<Position> {
        Contour::new(vec![
            Position::lonlat(0.0, 0.0),
            Position::lonlat(2.0, 0.0),
            Position::lonlat(2.0, 1.0),
        ])
    }

    #[test]
    fn segments_and_length() {
        let contour = ell();
        let segments: Vec<_> = contour.iter_segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], Segment(&contour[1], &contour[2]));
        assert_abs_diff_eq!(contour.planar_length(), 3.0, epsilon = 1e-12);

        let from_points: Contour<Position> = contour.clone().into_points().into();
        assert_eq!(from_points, contour);
    }

    #[test]
    fn project_onto_contour() {
        let contour = ell();
        assert_abs_diff_eq!(contour.project(&Position::lonlat(1.0, -0.5)).unwrap(), 1.0);
        assert_abs_diff_eq!(contour.project(&Position::lonlat(2.5, 0.5)).unwrap(), 2.5);
        assert_abs_diff_eq!(contour.project(&Position::lonlat(-3.0, 0.0)).unwrap(), 0.0);
        assert_abs_diff_eq!(contour.project(&Position::lonlat(2.0, 9.0)).unwrap(), 3.0);
    }

    #[test]
    fn interpolate_along_contour() {
        let contour = ell();
        assert_abs_diff_eq!(contour.interpolate(0.5).unwrap(), Position::lonlat(0.5, 0.0));
        assert_abs_diff_eq!(contour.interpolate(2.25).unwrap(), Position::lonlat(2.0, 0.25));
        assert_abs_diff_eq!(contour.interpolate(10.0).unwrap(), Position::lonlat(2.0, 1.0));
        assert_abs_diff_eq!(contour.interpolate(-1.0).unwrap(), Position::lonlat(0.0, 0.0));
    }

    #[test]
    fn substring_keeps_direction() {
        let contour = ell();
        let forward = contour.substring(1.0, 2.5).unwrap();
        assert_eq!(
            forward,
            vec![
                Position::lonlat(1.0, 0.0),
                Position::lonlat(2.0, 0.0),
                Position::lonlat(2.0, 0.5),
            ]
        );

        let mut backward = contour.substring(2.5, 1.0).unwrap();
        backward.reverse();
        assert_eq!(backward, forward);

        assert_eq!(contour.substring(0.5, 0.5).unwrap(), vec![Position::lonlat(0.5, 0.0)]);
    }

    #[test]
    fn empty_contour() {
        let contour: Contour<Position> = Contour::new(vec![]);
        assert_matches!(
            contour.project(&Position::lonlat(0.0, 0.0)),
            Err(GeofibTypesError::EmptyGeometry)
        );
        assert_matches!(contour.interpolate(1.0), Err(GeofibTypesError::EmptyGeometry));
        assert_eq!(contour.planar_length(), 0.0);
    }

    #[test]
    fn single_point_contour() {
        let contour = Contour::new(vec![Position::lonlat(3.0, 4.0)]);
        assert_eq!(contour.project(&Position::lonlat(0.0, 0.0)).unwrap(), 0.0);
        assert_eq!(contour.interpolate(5.0).unwrap(), Position::lonlat(3.0, 4.0));
    }

    #[test]
    fn geodesic_length() {
        let start = Position::latlon(37.343150, -123.175722);
        let middle = start.displace(120.0, 90.0);
        let end = middle.displace(80.0, 0.0);
        let contour = Contour::new(vec![start, middle, end]);
        assert_abs_diff_eq!(contour.geodesic_length_feet(), 200.0, epsilon = 1e-6);
    }
}
