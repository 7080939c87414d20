//! Vincenty's direct and inverse solutions of the geodesic problem.
//!
//! Both solutions iterate until the relative change of the iterated angle drops below `1e-9`, then take one more
//! step. They are accurate to fractions of a millimeter for the distances met in survey and design work (up to a few
//! hundred kilometers), but are not meant for nearly antipodal points, where the inverse iteration does not converge.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::datum::Datum;

const CONVERGENCE: f64 = 1e-9;
const MAX_ITERATIONS: usize = 200;
const COINCIDENT_DEGREES: f64 = 1e-8;

/// Result of the direct geodesic problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectSolution {
    /// Latitude of the computed point in degrees.
    pub lat: f64,
    /// Longitude of the computed point in degrees.
    pub lon: f64,
    /// Azimuth from the computed point back to the origin, degrees in `[0, 360)`.
    pub reverse_azimuth: f64,
}

/// Result of the inverse geodesic problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InverseSolution {
    /// Ellipsoidal distance in meters.
    pub distance: f64,
    /// Azimuth from the first point to the second, degrees in `[0, 360)`.
    pub azimuth: f64,
    /// Azimuth from the second point back to the first, degrees in `[0, 360)`.
    pub reverse_azimuth: f64,
}

/// Brings an angle in degrees into `[0, 360)`.
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Direct solution on the WGS84 ellipsoid. See [`Datum::direct`].
pub fn position_from_range_bearing(
    lat: f64,
    lon: f64,
    azimuth: f64,
    distance: f64,
) -> DirectSolution {
    Datum::WGS84.direct(lat, lon, azimuth, distance)
}

/// Inverse solution on the WGS84 ellipsoid. See [`Datum::inverse`].
pub fn range_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> InverseSolution {
    Datum::WGS84.inverse(lat1, lon1, lat2, lon2)
}

// Values computed from one longitude difference on the auxiliary sphere, and the next one.
struct InverseIteration {
    lambda: f64,
    sigma: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    cos_sq_alpha: f64,
    cos_2sigma_m: f64,
}

impl Datum {
    /// Computes the point reached by travelling `distance` meters from (`lat`, `lon`) along the geodesic starting at
    /// `azimuth` degrees. The azimuth may be any finite angle, it is normalized into `[0, 360)` first.
    pub fn direct(&self, lat: f64, lon: f64, azimuth: f64, distance: f64) -> DirectSolution {
        let a = self.semimajor();
        let b = self.semiminor();
        let f = self.flattening();

        let alpha1 = normalize_azimuth(azimuth).to_radians();
        let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

        let tan_u1 = (1.0 - f) * lat.to_radians().tan();
        let (sin_u1, cos_u1) = tan_u1.atan().sin_cos();
        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let sigma0 = distance / (b * big_a);
        let step = |sigma: f64| {
            let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
            sigma0 + delta_sigma
        };

        let mut sigma = sigma0;
        let mut iterations = 0;
        loop {
            let next = step(sigma);
            let converged = (next - sigma).abs() <= CONVERGENCE * next.abs();
            sigma = next;
            iterations += 1;

            if converged {
                sigma = step(sigma);
                break;
            }
            if iterations >= MAX_ITERATIONS {
                log::warn!(
                    "Vincenty direct did not converge from ({lat}, {lon}) azimuth {azimuth} distance {distance}"
                );
                break;
            }
        }

        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
        let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        let reverse = sin_alpha.atan2(-tmp) + PI;

        DirectSolution {
            lat: lat2.to_degrees(),
            lon: lon + l.to_degrees(),
            reverse_azimuth: normalize_azimuth(reverse.to_degrees()),
        }
    }

    /// Computes the ellipsoidal distance in meters and the forward and reverse azimuths between two points.
    ///
    /// Points closer than `1e-8` degrees in both latitude and longitude are considered the same point and the result
    /// is all zeros.
    pub fn inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> InverseSolution {
        if (lat2 - lat1).abs() < COINCIDENT_DEGREES && (lon2 - lon1).abs() < COINCIDENT_DEGREES {
            return InverseSolution::default();
        }

        let a = self.semimajor();
        let b = self.semiminor();
        let f = self.flattening();

        let (sin_u1, cos_u1) = ((1.0 - f) * lat1.to_radians().tan()).atan().sin_cos();
        let (sin_u2, cos_u2) = ((1.0 - f) * lat2.to_radians().tan()).atan().sin_cos();

        let omega = (lon2 - lon1).to_radians();
        let step = |lambda: f64| {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let t = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2) + t * t).sqrt();
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);

            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            // Both points on the equator.
            let cos_2sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };
            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

            InverseIteration {
                lambda: omega
                    + (1.0 - c)
                        * f
                        * sin_alpha
                        * (sigma
                            + c * sin_sigma
                                * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m))),
                sigma,
                sin_sigma,
                cos_sigma,
                cos_sq_alpha,
                cos_2sigma_m,
            }
        };

        let mut previous = omega;
        let mut state = step(omega);
        let mut iterations = 1;
        loop {
            let lambda = state.lambda;
            if lambda == 0.0 || ((previous - lambda) / lambda).abs() <= CONVERGENCE {
                state = step(lambda);
                break;
            }
            if iterations >= MAX_ITERATIONS {
                log::warn!(
                    "Vincenty inverse did not converge between ({lat1}, {lon1}) and ({lat2}, {lon2})"
                );
                break;
            }

            previous = lambda;
            state = step(lambda);
            iterations += 1;
        }

        let u_sq = state.cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let cos_2sm = state.cos_2sigma_m;
        let delta_sigma = big_b
            * state.sin_sigma
            * (cos_2sm
                + big_b / 4.0
                    * (state.cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                        - big_b / 6.0
                            * cos_2sm
                            * (-3.0 + 4.0 * state.sin_sigma * state.sin_sigma)
                            * (-3.0 + 4.0 * cos_2sm * cos_2sm)));

        let distance = b * big_a * (state.sigma - delta_sigma);

        let (sin_lambda, cos_lambda) = state.lambda.sin_cos();
        let forward = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        let reverse = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda) + PI;

        InverseSolution {
            distance,
            azimuth: normalize_azimuth(forward.to_degrees()),
            reverse_azimuth: normalize_azimuth(reverse.to_degrees()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const LAT: f64 = 37.343150;
    const LON: f64 = -123.175722;

    fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
        degrees.signum() * (degrees.abs() + minutes / 60.0 + seconds / 3600.0)
    }

    #[test]
    fn north_hundred_meters() {
        let direct = position_from_range_bearing(LAT, LON, 0.0, 100.0);
        assert_abs_diff_eq!(direct.lat, 37.344051, epsilon = 1e-7);
        assert_abs_diff_eq!(direct.lon, LON, epsilon = 1e-9);
        assert_abs_diff_eq!(direct.reverse_azimuth, 180.0, epsilon = 1e-9);

        let inverse = range_bearing(LAT, LON, direct.lat, direct.lon);
        assert_abs_diff_eq!(inverse.distance, 100.0, epsilon = 1e-8);
        assert_abs_diff_eq!(inverse.azimuth, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inverse.reverse_azimuth, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn flinders_peak_to_buninyong() {
        let lat1 = dms(-37.0, 57.0, 3.72030);
        let lon1 = dms(144.0, 25.0, 29.52440);
        let lat2 = dms(-37.0, 39.0, 10.15610);
        let lon2 = dms(143.0, 55.0, 35.38390);

        let inverse = range_bearing(lat1, lon1, lat2, lon2);
        assert_abs_diff_eq!(inverse.distance, 54_972.271, epsilon = 1e-3);
        assert_abs_diff_eq!(inverse.azimuth, dms(306.0, 52.0, 5.37), epsilon = 1e-5);
        assert_abs_diff_eq!(inverse.reverse_azimuth, dms(127.0, 10.0, 25.07), epsilon = 1e-5);

        let direct = position_from_range_bearing(lat1, lon1, inverse.azimuth, inverse.distance);
        assert_abs_diff_eq!(direct.lat, lat2, epsilon = 1e-7);
        assert_abs_diff_eq!(direct.lon, lon2, epsilon = 1e-7);
        assert_abs_diff_eq!(direct.reverse_azimuth, inverse.reverse_azimuth, epsilon = 1e-6);
    }

    #[test]
    fn round_trip() {
        for azimuth in [0.0, 17.5, 45.0, 90.0, 133.3, 180.0, 226.0, 270.0, 300.25, 359.0] {
            for distance in [0.5, 30.0, 1_000.0, 25_000.0, 50_000.0, 100_000.0] {
                let direct = position_from_range_bearing(LAT, LON, azimuth, distance);
                let inverse = range_bearing(LAT, LON, direct.lat, direct.lon);

                assert_abs_diff_eq!(inverse.distance, distance, epsilon = 1e-6);
                let azimuth_error = (inverse.azimuth - azimuth + 180.0).rem_euclid(360.0) - 180.0;
                assert_abs_diff_eq!(azimuth_error, 0.0, epsilon = 1e-6);
                let reverse_error =
                    (inverse.reverse_azimuth - direct.reverse_azimuth + 180.0).rem_euclid(360.0) - 180.0;
                assert_abs_diff_eq!(reverse_error, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn reverse_azimuth_is_opposite_for_short_lines() {
        let direct = position_from_range_bearing(LAT, LON, 63.0, 50.0);
        let inverse = range_bearing(LAT, LON, direct.lat, direct.lon);
        let difference = (inverse.reverse_azimuth - inverse.azimuth).rem_euclid(360.0);
        assert_abs_diff_eq!(difference, 180.0, epsilon = 1e-3);
    }

    #[test]
    fn coincident_points() {
        assert_eq!(range_bearing(LAT, LON, LAT, LON), InverseSolution::default());
        assert_eq!(
            range_bearing(LAT, LON, LAT + 5e-9, LON - 5e-9),
            InverseSolution {
                distance: 0.0,
                azimuth: 0.0,
                reverse_azimuth: 0.0
            }
        );
    }

    #[test]
    fn zero_distance_direct() {
        let direct = position_from_range_bearing(LAT, LON, 45.0, 0.0);
        assert_abs_diff_eq!(direct.lat, LAT, epsilon = 1e-12);
        assert_abs_diff_eq!(direct.lon, LON, epsilon = 1e-12);
    }

    #[test]
    fn azimuth_is_normalized_before_use() {
        let a = position_from_range_bearing(LAT, LON, -90.0, 500.0);
        let b = position_from_range_bearing(LAT, LON, 270.0, 500.0);
        let c = position_from_range_bearing(LAT, LON, 630.0, 500.0);
        assert_abs_diff_eq!(a.lat, b.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(a.lon, b.lon, epsilon = 1e-12);
        assert_abs_diff_eq!(c.lat, b.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(c.lon, b.lon, epsilon = 1e-12);
    }

    #[test]
    fn along_equator() {
        let inverse = range_bearing(0.0, 10.0, 0.0, 11.0);
        assert_abs_diff_eq!(inverse.distance, 111_319.491, epsilon = 1e-3);
        assert_abs_diff_eq!(inverse.azimuth, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inverse.reverse_azimuth, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_azimuth(0.0), 0.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert_eq!(normalize_azimuth(-90.0), 270.0);
        assert_eq!(normalize_azimuth(450.0), 90.0);
    }
}
