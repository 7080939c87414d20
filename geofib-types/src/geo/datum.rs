/// Reference ellipsoid used by the geodesic solutions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening (`1 / f`).
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Flattening of the ellipsoid.
    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_flattening
    }

    /// Semi-minor axis in meters.
    pub fn semiminor(&self) -> f64 {
        self.semimajor * (1.0 - self.flattening())
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_axes() {
        let datum = Datum::default();
        assert_eq!(datum, Datum::WGS84);
        assert_abs_diff_eq!(datum.semiminor(), 6_356_752.314245, epsilon = 1e-6);
        assert_abs_diff_eq!(datum.flattening(), 0.0033528106647474805, epsilon = 1e-15);
    }
}
