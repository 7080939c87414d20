//! Straight segments between geographic points, in the plane of longitude and latitude.

use nalgebra::Vector2;

use crate::geo::{GeoPoint, NewGeoPoint};

/// A straight line segment between two geographic points.
///
/// Segment math treats longitude and latitude as plane coordinates (`x = lon`, `y = lat`). Over the few hundred
/// feet between vaults of one alignment this is what snapping needs, but it is not a geodesic.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

fn to_vector(point: &impl GeoPoint) -> Vector2<f64> {
    Vector2::new(point.lon(), point.lat())
}

impl<P: GeoPoint> Segment<'_, P> {
    /// Length of the segment in degrees.
    pub fn planar_length(&self) -> f64 {
        (to_vector(self.1) - to_vector(self.0)).norm()
    }

    /// Parameter of the point of the segment closest to `point`: `0` at the start, `1` at the end.
    ///
    /// Degenerate segments return `0`.
    pub fn project_fraction(&self, point: &impl GeoPoint) -> f64 {
        let ds = to_vector(self.1) - to_vector(self.0);
        let dp = to_vector(point) - to_vector(self.0);
        let ds_len = ds.norm_squared();
        if ds_len == 0.0 {
            return 0.0;
        }

        (dp.dot(&ds) / ds_len).clamp(0.0, 1.0)
    }

    /// Shortest squared distance in degrees between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * otherwise, the smaller one of the squared distances between the point and the segment's endpoints
    pub fn distance_to_point_sq(&self, point: &impl GeoPoint) -> f64 {
        let start = to_vector(self.0);
        let ds = to_vector(self.1) - start;
        let closest = start + ds * self.project_fraction(point);
        (to_vector(point) - closest).norm_squared()
    }

    /// Point at `fraction` of the segment.
    pub fn interpolate<Out: NewGeoPoint>(&self, fraction: f64) -> Out {
        let start = to_vector(self.0);
        let point = start + (to_vector(self.1) - start) * fraction;
        Out::lonlat(point.x, point.y)
    }
}
