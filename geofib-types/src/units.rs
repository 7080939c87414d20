//! Conversions between survey feet, meters and small-distance degree approximations.

/// Number of feet in one meter.
pub const FEET_METERS_FACTOR: f64 = 3.2808398950131;

/// Approximate number of degrees of latitude in one foot (one nautical mile is taken as 6074 feet).
///
/// Only good enough for buffering features by a few feet, never for traverse computations.
pub const DEGREES_FEET_FACTOR: f64 = 1.0 / 6074.0 / 60.0;

/// Converts feet into meters.
pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_METERS_FACTOR
}

/// Converts meters into feet.
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_METERS_FACTOR
}

/// Approximates a distance in feet as degrees of latitude.
pub fn feet_to_degrees(feet: f64) -> f64 {
    feet * DEGREES_FEET_FACTOR
}

/// Approximates degrees of latitude as feet.
pub fn degrees_to_feet(degrees: f64) -> f64 {
    degrees / DEGREES_FEET_FACTOR
}
