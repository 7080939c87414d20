use geo_types::{coord, Coord};

use crate::geo::impls::Position;
use crate::geo::{GeoPoint, NewGeoPoint};

impl GeoPoint for Coord<f64> {
    fn lat(&self) -> f64 {
        self.y
    }

    fn lon(&self) -> f64 {
        self.x
    }
}

impl NewGeoPoint for Coord<f64> {
    fn latlon(lat: f64, lon: f64) -> Self {
        coord!(x: lon, y: lat)
    }
}

impl From<Position> for Coord<f64> {
    fn from(value: Position) -> Self {
        coord!(x: value.lon(), y: value.lat())
    }
}

impl From<Coord<f64>> for Position {
    fn from(value: Coord<f64>) -> Self {
        Position::latlon(value.y, value.x)
    }
}
