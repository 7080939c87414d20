//! Approximation of circular curves by chords.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::GeofibError;

/// Curves with a central angle below this many degrees are replaced by a single chord.
pub const MAX_CHORD_ANGLE: f64 = 18.0;

/// One straight piece of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Length of the chord, in the units of the curve radius.
    pub length: f64,
    /// Central angle of the arc the chord replaces, degrees. Negative for curves turning left.
    pub delta: f64,
}

/// Length of the chord of an arc with the given `radius` and central angle `delta` in degrees: `2 r sin(delta / 2)`.
///
/// Negative angles (left turns) give the same length as the positive ones.
pub fn chord_from_arc(radius: f64, delta: f64) -> f64 {
    let mut theta = delta.to_radians();
    if theta < 0.0 {
        theta += TAU;
    }
    2.0 * radius * (theta / 2.0).sin()
}

/// Splits an arc into chords with central angles below [`MAX_CHORD_ANGLE`].
pub fn arc_chords(radius: f64, delta: f64) -> Result<Vec<Chord>, GeofibError> {
    subdivide_arc(radius, delta, MAX_CHORD_ANGLE)
}

/// Splits an arc into chords by halving its central angle until every piece is below `max_angle` degrees.
///
/// The central angle must be finite and at most a full circle, and `max_angle` must be positive, so the number of
/// halvings is bounded by `log2(360 / max_angle)`.
pub fn subdivide_arc(radius: f64, delta: f64, max_angle: f64) -> Result<Vec<Chord>, GeofibError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeofibError::Format(format!(
            "curve radius must be a non-negative number: {radius}"
        )));
    }
    if !delta.is_finite() || delta.abs() > 360.0 {
        return Err(GeofibError::Format(format!(
            "central angle must be within a full circle: {delta}"
        )));
    }
    if !max_angle.is_finite() || max_angle <= 0.0 {
        return Err(GeofibError::Format(format!(
            "chord angle limit must be positive: {max_angle}"
        )));
    }

    let mut chords = vec![];
    push_chords(radius, delta, max_angle, &mut chords);
    Ok(chords)
}

fn push_chords(radius: f64, delta: f64, max_angle: f64, chords: &mut Vec<Chord>) {
    if delta.abs() < max_angle {
        chords.push(Chord {
            length: chord_from_arc(radius, delta),
            delta,
        });
    } else {
        let half = delta / 2.0;
        push_chords(radius, half, max_angle, chords);
        push_chords(radius, half, max_angle, chords);
    }
}
