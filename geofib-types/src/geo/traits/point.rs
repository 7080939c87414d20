//! Traits of geographic points.

use serde::{Deserialize, Serialize};

use crate::geo::datum::Datum;
use crate::geo::vincenty::InverseSolution;
use crate::units::{feet_to_meters, meters_to_feet};

/// Range and bearing between two points, as used by survey calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBearing {
    /// Distance over the ellipsoid in feet.
    pub range_feet: f64,
    /// Azimuth from the first point to the second one, degrees in `[0, 360)`.
    pub azimuth: f64,
    /// Azimuth from the second point back to the first one, degrees in `[0, 360)`.
    pub reverse_azimuth: f64,
}

/// A point given by latitude and longitude in decimal degrees.
pub trait GeoPoint {
    /// Latitude in degrees.
    fn lat(&self) -> f64;
    /// Longitude in degrees.
    fn lon(&self) -> f64;

    /// Latitude in radians.
    fn lat_rad(&self) -> f64 {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> f64 {
        self.lon().to_radians()
    }

    /// Solves the inverse geodesic problem between `self` and `other` on the given `datum`.
    fn geodesic_to(&self, other: &impl GeoPoint, datum: &Datum) -> InverseSolution {
        datum.inverse(self.lat(), self.lon(), other.lat(), other.lon())
    }

    /// Range in feet and azimuths between `self` and `other` over the WGS84 ellipsoid.
    fn range_bearing_to(&self, other: &impl GeoPoint) -> RangeBearing {
        let solution = self.geodesic_to(other, &Datum::WGS84);
        RangeBearing {
            range_feet: meters_to_feet(solution.distance),
            azimuth: solution.azimuth,
            reverse_azimuth: solution.reverse_azimuth,
        }
    }

    /// Squared distance in degrees, treating longitude and latitude as plane coordinates.
    ///
    /// This is only a proximity measure for choosing between nearby candidates.
    fn degree_distance_sq(&self, other: &impl GeoPoint) -> f64 {
        let d_lat = self.lat() - other.lat();
        let d_lon = self.lon() - other.lon();
        d_lat * d_lat + d_lon * d_lon
    }
}

/// A [`GeoPoint`] that can be constructed from coordinates.
pub trait NewGeoPoint: GeoPoint + Sized {
    /// Creates a point from latitude and longitude.
    fn latlon(lat: f64, lon: f64) -> Self;

    /// Creates a point from longitude and latitude, the order used by most geo file formats.
    fn lonlat(lon: f64, lat: f64) -> Self {
        Self::latlon(lat, lon)
    }

    /// Returns the point `range_feet` away along the geodesic starting at `azimuth` degrees on the WGS84 ellipsoid.
    fn displace(&self, range_feet: f64, azimuth: f64) -> Self {
        let solution = Datum::WGS84.direct(self.lat(), self.lon(), azimuth, feet_to_meters(range_feet));
        Self::latlon(solution.lat, solution.lon)
    }
}
