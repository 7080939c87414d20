//! Traverse calls as data, e.g. loaded from a JSON or YAML description of a parcel.
//!
//! ```json
//! [
//!     ["N", "45 30 00", "E", 250.0, "tie from section corner"],
//!     "beginning",
//!     { "authority": { "source": "Record of Survey 4/55", "basis_adjustment": 0.25 } },
//!     ["N", 0, "E", 100.0],
//!     { "arc": { "radius": 100.0, "delta": 90.0, "comment": "along the road" } },
//!     ["S", "00 00 00", "W", 200.0],
//!     "closes"
//! ]
//! ```

use geofib_types::Position;
use serde::{Deserialize, Serialize};

use crate::cogo::angle::{check_quadrant_angle, parse_angle, Quadrant};
use crate::cogo::traverse::Traverse;
use crate::error::GeofibError;

/// Single call of a traverse description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraverseCall {
    /// `"beginning"` or `"closes"`.
    Keyword(Keyword),
    /// Quadrant bearing and distance: `[NS, angle, EW, distance_feet, comment?]`.
    Bearing(Vec<Scalar>),
    /// Circular curve continuing the current heading.
    Arc {
        /// Curve parameters.
        arc: ArcCall,
    },
    /// Single chord of a curve.
    Chord {
        /// Chord parameters.
        chord: ChordCall,
    },
    /// Authority for the following calls.
    Authority {
        /// Source and basis adjustment.
        authority: AuthorityCall,
    },
}

/// Calls without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    /// True point of beginning, see [`Traverse::begin`].
    Beginning,
    /// Closure of the traverse, see [`Traverse::close`].
    Closes,
}

/// Element of a bearing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Numeric element.
    Number(f64),
    /// String element.
    Text(String),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Parameters of an arc call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcCall {
    /// Radius in feet.
    pub radius: f64,
    /// Central angle in degrees, negative to the left.
    pub delta: f64,
    /// Remark added to the notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Parameters of a chord call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordCall {
    /// Chord length in feet.
    pub range: f64,
    /// Central angle of the curve in degrees, negative to the left.
    pub delta: f64,
}

/// Parameters of an authority call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityCall {
    /// Document the following calls are taken from.
    pub source: String,
    /// Rotation of the bearings of the document, degrees.
    #[serde(default)]
    pub basis_adjustment: f64,
}

/// Bearing call parsed into an azimuth.
struct BearingLeg<'a> {
    azimuth: f64,
    range_feet: f64,
    comment: Option<&'a Scalar>,
}

fn parse_bearing(parts: &[Scalar]) -> Result<BearingLeg, GeofibError> {
    let [ns, angle, ew, range, rest @ ..] = parts else {
        return Err(GeofibError::Format(format!(
            "bearing call must have at least 4 elements, got {}",
            parts.len()
        )));
    };

    let quadrant = Quadrant::parse(&ns.as_text(), &ew.as_text())?;
    let angle = match angle {
        Scalar::Number(value) => check_quadrant_angle(*value)?,
        Scalar::Text(token) => parse_angle(token)?,
    };
    let range_feet = range
        .as_number()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeofibError::Format(format!("distance of a bearing call must be a number: {range:?}")))?;

    Ok(BearingLeg {
        azimuth: quadrant.azimuth(angle),
        range_feet,
        comment: rest.first(),
    })
}

impl Traverse {
    /// Applies a single call to the traverse.
    pub fn apply(&mut self, call: &TraverseCall) -> Result<(), GeofibError> {
        match call {
            TraverseCall::Keyword(Keyword::Beginning) => self.begin(),
            TraverseCall::Keyword(Keyword::Closes) => self.close().map(|_| ()),
            TraverseCall::Bearing(parts) => {
                let leg = parse_bearing(parts)?;
                self.thence_to(leg.range_feet, leg.azimuth)?;
                if let Some(comment) = leg.comment {
                    self.comment(&comment.as_text());
                }
                Ok(())
            }
            TraverseCall::Arc { arc } => {
                self.thence_arc(arc.radius, arc.delta)?;
                if let Some(comment) = &arc.comment {
                    self.comment(comment);
                }
                Ok(())
            }
            TraverseCall::Chord { chord } => self.thence_chord(chord.range, chord.delta),
            TraverseCall::Authority { authority } => {
                self.authority(&authority.source, authority.basis_adjustment)
            }
        }
    }
}

/// Runs a sequence of calls on a new traverse starting at `start`.
///
/// Stops at the first failing call.
pub fn run_calls<'a>(
    name: &str,
    start: Position,
    source: &str,
    calls: impl IntoIterator<Item = &'a TraverseCall>,
) -> Result<Traverse, GeofibError> {
    let mut traverse = Traverse::new(name, start, source);
    for (index, call) in calls.into_iter().enumerate() {
        traverse.apply(call).map_err(|err| {
            log::debug!("Call {index} of traverse {name} failed: {err}");
            err
        })?;
    }

    Ok(traverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geofib_types::geo::{GeoPoint, NewGeoPoint};

    fn calls(json: &str) -> Vec<TraverseCall> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_calls() {
        let calls = calls(
            r#"[
                "beginning",
                ["N", "30 10 10", "W", 100.5, "fence"],
                ["s", 45, "e", "20"],
                {"arc": {"radius": 50, "delta": -30}},
                {"chord": {"range": 10, "delta": 5}},
                {"authority": {"source": "Deed 5/12", "basis_adjustment": 1.25}},
                "closes"
            ]"#,
        );

        assert_eq!(calls[0], TraverseCall::Keyword(Keyword::Beginning));
        assert_eq!(
            calls[1],
            TraverseCall::Bearing(vec![
                Scalar::Text("N".into()),
                Scalar::Text("30 10 10".into()),
                Scalar::Text("W".into()),
                Scalar::Number(100.5),
                Scalar::Text("fence".into()),
            ])
        );
        assert_matches!(&calls[3], TraverseCall::Arc { arc } if arc.delta == -30.0 && arc.comment.is_none());
        assert_matches!(&calls[4], TraverseCall::Chord { chord } if chord.range == 10.0);
        assert_matches!(&calls[5], TraverseCall::Authority { authority } if authority.basis_adjustment == 1.25);
        assert_eq!(calls[6], TraverseCall::Keyword(Keyword::Closes));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        assert!(serde_json::from_str::<TraverseCall>(r#""ending""#).is_err());
    }

    #[test]
    fn run_parcel() {
        let calls = calls(
            r#"[
                ["N", "45 00 00", "E", 250.0, "tie"],
                "beginning",
                ["N", 0, "E", 100],
                ["S", 90, "E", 100],
                ["S", 0, "W", 100],
                ["N", 90, "W", 100],
                "closes"
            ]"#,
        );

        let start = Position::latlon(37.343150, -123.175722);
        let traverse = run_calls("parcel", start, "Book 12, page 40", &calls).unwrap();

        assert_eq!(traverse.points().len(), 6);
        assert_eq!(traverse.points().first(), traverse.points().last());
        assert!(traverse.closure().unwrap().is_closed());

        let tie = start.range_bearing_to(&traverse.points()[0]);
        assert_abs_diff_eq!(tie.range_feet, 250.0, epsilon = 1e-6);
        assert_abs_diff_eq!(tie.azimuth, 45.0, epsilon = 1e-6);

        assert_eq!(traverse.notes()[0], "Book 12, page 40");
        assert_eq!(traverse.notes()[1], "Thence 250 feet bearing 45d, tie");
        assert_eq!(traverse.notes().last().map(String::as_str), Some("Closes"));
    }

    #[test]
    fn arc_call_adds_chords() {
        let calls = calls(
            r#"[
                "beginning",
                ["N", 0, "E", 100],
                {"arc": {"radius": 100, "delta": 36, "comment": "curve"}}
            ]"#,
        );

        let traverse = run_calls("curve", Position::latlon(37.0, -122.0), "", &calls).unwrap();
        assert_eq!(traverse.points().len(), 2 + 4);
        assert_abs_diff_eq!(traverse.last_azimuth().unwrap(), 36.0, epsilon = 1e-9);
        assert!(traverse.notes().last().unwrap().ends_with(", curve"));
    }

    #[test]
    fn failing_calls() {
        let start = Position::latlon(37.0, -122.0);

        let bad_angle = calls(r#"[["N", "95", "E", 10]]"#);
        assert_matches!(run_calls("x", start, "", &bad_angle), Err(GeofibError::Format(_)));

        let bad_distance = calls(r#"[["N", "45", "E", "far"]]"#);
        assert_matches!(run_calls("x", start, "", &bad_distance), Err(GeofibError::Format(_)));

        let short = calls(r#"[["N", "45", "E"]]"#);
        assert_matches!(run_calls("x", start, "", &short), Err(GeofibError::Format(_)));

        let chord_first = calls(r#"["beginning", {"chord": {"range": 10, "delta": 5}}]"#);
        assert_matches!(run_calls("x", start, "", &chord_first), Err(GeofibError::Sequence(_)));

        let early_close = calls(r#"["beginning", ["N", 0, "E", 10], "closes"]"#);
        assert_matches!(run_calls("x", start, "", &early_close), Err(GeofibError::Sequence(_)));
    }
}
