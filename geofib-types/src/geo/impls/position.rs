//! [`Position`] and the [`latlon!`](crate::latlon) macro.

use std::fmt::{Display, Formatter};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::geo::traits::point::{GeoPoint, NewGeoPoint};

/// A point on the WGS84 ellipsoid in decimal degrees.
///
/// Positions are plain values: operations like [`NewGeoPoint::displace`] return a new position and never modify the
/// one they are called on. Longitude is not normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Position {
    lat: f64,
    lon: f64,
}

impl GeoPoint for Position {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint for Position {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Position {
    /// Copies coordinates of any other geographic point.
    pub fn from_geo(other: &impl GeoPoint) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "[Position: {} N, {} {ew}]", self.lat, self.lon.abs())
    }
}

impl AbsDiffEq for Position {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for Position {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}

/// Creates a new [`Position`] from latitude and longitude values (in degrees).
///
/// ```
/// use geofib_types::geo::GeoPoint;
/// use geofib_types::latlon;
///
/// let point = latlon!(37.34315, -123.175722);
/// assert_eq!(point.lat(), 37.34315);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <::geofib_types::geo::impls::Position as ::geofib_types::geo::NewGeoPoint>::latlon($lat, $lon)
    };
}
