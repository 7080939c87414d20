//! Parsing and formatting of survey angles and quadrant bearings.

use crate::error::GeofibError;

/// Checks that an angle of a quadrant bearing is in `[0, 90]` degrees.
pub fn check_quadrant_angle(degrees: f64) -> Result<f64, GeofibError> {
    if degrees.is_finite() && (0.0..=90.0).contains(&degrees) {
        Ok(degrees)
    } else {
        Err(GeofibError::Format(format!(
            "angle must be between 0 and 90: {degrees}"
        )))
    }
}

/// Parses an angle of a quadrant bearing.
///
/// The token is either a number of decimal degrees (`"20.45"`), or an 8-character `"DD MM SS"` string
/// (`"45 30 00"`). The result is in `[0, 90]` degrees.
pub fn parse_angle(token: &str) -> Result<f64, GeofibError> {
    if let Ok(degrees) = token.trim().parse::<f64>() {
        return check_quadrant_angle(degrees);
    }

    let malformed = || {
        GeofibError::Format(format!(
            "angle must be in decimal degrees or an 8-character string in DD MM SS format: {token:?}"
        ))
    };

    let bytes = token.as_bytes();
    if !token.is_ascii() || bytes.len() != 8 || bytes[2] != b' ' || bytes[5] != b' ' {
        return Err(malformed());
    }

    let component = |range: std::ops::Range<usize>| -> Result<i32, GeofibError> {
        token[range].trim().parse::<i32>().map_err(|_| malformed())
    };
    let degrees = component(0..2)?;
    let minutes = component(3..5)?;
    let seconds = component(6..8)?;

    if degrees < 0 || minutes < 0 || seconds < 0 || degrees > 90 || minutes > 59 || seconds > 59 {
        return Err(malformed());
    }

    check_quadrant_angle(degrees as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0)
}

/// Quadrant of a quadrant bearing, e.g. `N 30 E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// North-east.
    NorthEast,
    /// North-west.
    NorthWest,
    /// South-east.
    SouthEast,
    /// South-west.
    SouthWest,
}

impl Quadrant {
    /// Parses the `N`/`S` and `E`/`W` parts of a bearing, ignoring case.
    pub fn parse(ns: &str, ew: &str) -> Result<Self, GeofibError> {
        let north = match ns.trim().to_ascii_uppercase().as_str() {
            "N" => true,
            "S" => false,
            _ => {
                return Err(GeofibError::Format(format!(
                    "first element of a bearing must be N or S: {ns:?}"
                )))
            }
        };
        let east = match ew.trim().to_ascii_uppercase().as_str() {
            "E" => true,
            "W" => false,
            _ => {
                return Err(GeofibError::Format(format!(
                    "third element of a bearing must be E or W: {ew:?}"
                )))
            }
        };

        Ok(match (north, east) {
            (true, true) => Self::NorthEast,
            (true, false) => Self::NorthWest,
            (false, true) => Self::SouthEast,
            (false, false) => Self::SouthWest,
        })
    }

    /// Azimuth of a bearing making `angle` degrees with the north-south line in this quadrant.
    pub fn azimuth(&self, angle: f64) -> f64 {
        match self {
            Self::NorthEast => angle,
            Self::NorthWest => 360.0 - angle,
            Self::SouthEast => 180.0 - angle,
            Self::SouthWest => 180.0 + angle,
        }
    }
}

/// Parses a quadrant bearing `[NS, angle, EW, ...]` into an azimuth in degrees.
///
/// Elements beyond the third (distance, comments) are ignored.
///
/// ```
/// # use geofib::cogo::angle::parse_azimuth;
/// let azimuth = parse_azimuth(&["S", "45 30 00", "W"]).unwrap();
/// assert_eq!(azimuth, 225.5);
/// ```
pub fn parse_azimuth<S: AsRef<str>>(parts: &[S]) -> Result<f64, GeofibError> {
    let [ns, angle, ew, ..] = parts else {
        return Err(GeofibError::Format(format!(
            "bearing must have at least 3 elements, got {}",
            parts.len()
        )));
    };

    let quadrant = Quadrant::parse(ns.as_ref(), ew.as_ref())?;
    let angle = parse_angle(angle.as_ref())?;
    Ok(quadrant.azimuth(angle))
}

/// Splits an angle in degrees into whole degrees, whole minutes and seconds. Each part keeps the sign of the angle.
pub fn angle_as_dms(alpha: f64) -> (i32, i32, f64) {
    let degrees = alpha.trunc();
    let remainder = 60.0 * (alpha - degrees);
    let minutes = remainder.trunc();
    let seconds = 60.0 * (remainder - minutes);
    (degrees as i32, minutes as i32, seconds)
}

/// Formats an angle as `30d 10' 10.0"`. Zero seconds and minutes are omitted from the end.
pub fn angle_as_dms_string(alpha: f64) -> String {
    let (degrees, minutes, seconds) = angle_as_dms(alpha);
    if seconds != 0.0 {
        format!("{degrees}d {minutes}' {seconds:.1}\"")
    } else if minutes != 0 {
        format!("{degrees}d {minutes}'")
    } else {
        format!("{degrees}d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn decimal_angles() {
        assert_eq!(parse_angle("20.45").unwrap(), 20.45);
        assert_eq!(parse_angle("0").unwrap(), 0.0);
        assert_eq!(parse_angle("90").unwrap(), 90.0);
        assert_matches!(parse_angle("-26"), Err(GeofibError::Format(_)));
        assert_matches!(parse_angle("90.5"), Err(GeofibError::Format(_)));
        assert_matches!(parse_angle("NaN"), Err(GeofibError::Format(_)));
    }

    #[test]
    fn dms_angles() {
        assert_eq!(parse_angle("45 30 00").unwrap(), 45.5);
        assert_abs_diff_eq!(parse_angle("30 10 10").unwrap(), 30.169444, epsilon = 1e-6);
        assert_eq!(parse_angle("90 00 00").unwrap(), 90.0);
    }

    #[test]
    fn malformed_dms_angles() {
        for token in [
            "30 10 1", "30 10 100", "3010 10 ", "30-10-10", "30 60 00", "30 10 60", "91 00 00", "-1 10 10",
            "30 -1 10", "ab cd ef", "", "90 00 01",
        ] {
            assert_matches!(parse_angle(token), Err(GeofibError::Format(_)), "{token:?}");
        }
    }

    #[test]
    fn azimuth_quadrants() {
        let cases = [
            (["N", "30 10 10", "W"], 329.830555),
            (["S", "30 10 10", "E"], 149.830555),
            (["S", "30 10 10", "W"], 210.169444),
            (["N", "30 10 10", "E"], 30.169444),
        ];

        for (parts, expected) in cases {
            assert_abs_diff_eq!(parse_azimuth(&parts).unwrap(), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn azimuth_ignores_extra_elements_and_case() {
        assert_eq!(parse_azimuth(&["n", "45", "w", "100.0", "along fence"]).unwrap(), 315.0);
        assert_eq!(parse_azimuth(&["s", "0", "e"]).unwrap(), 180.0);
    }

    #[test]
    fn malformed_azimuths() {
        assert_matches!(parse_azimuth(&["N", "30"]), Err(GeofibError::Format(_)));
        assert_matches!(parse_azimuth(&["X", "30", "E"]), Err(GeofibError::Format(_)));
        assert_matches!(parse_azimuth(&["N", "30", "Q"]), Err(GeofibError::Format(_)));
        assert_matches!(parse_azimuth(&["N", "95", "E"]), Err(GeofibError::Format(_)));
    }

    #[test]
    fn dms_formatting() {
        assert_eq!(angle_as_dms_string(30.0), "30d");
        assert_eq!(angle_as_dms_string(30.5), "30d 30'");
        assert_eq!(angle_as_dms_string(30.0 + 10.0 / 60.0 + 10.0 / 3600.0), "30d 10' 10.0\"");

        let (d, m, s) = angle_as_dms(45.5125);
        assert_eq!((d, m), (45, 30));
        assert_abs_diff_eq!(s, 45.0, epsilon = 1e-9);
    }
}
