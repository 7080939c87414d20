use geo_types::{point, Point};

use crate::geo::impls::Position;
use crate::geo::{GeoPoint, NewGeoPoint};

impl GeoPoint for Point<f64> {
    fn lat(&self) -> f64 {
        self.y()
    }

    fn lon(&self) -> f64 {
        self.x()
    }
}

impl NewGeoPoint for Point<f64> {
    fn latlon(lat: f64, lon: f64) -> Self {
        point!(x: lon, y: lat)
    }
}

impl From<Position> for Point<f64> {
    fn from(value: Position) -> Self {
        point!(x: value.lon(), y: value.lat())
    }
}

impl From<Point<f64>> for Position {
    fn from(value: Point<f64>) -> Self {
        Position::latlon(value.y(), value.x())
    }
}
