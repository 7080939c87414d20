use geofib_types::geo::{normalize_azimuth, GeoPoint, NewGeoPoint};
use geofib_types::Position;
use serde::{Deserialize, Serialize};

use crate::cogo::angle::angle_as_dms_string;
use crate::cogo::arc::arc_chords;
use crate::error::GeofibError;

/// A traverse whose last point is closer to the first one than this is reported as closed.
pub const CLOSURE_TOLERANCE_FEET: f64 = 0.05;

/// Turns within this many degrees of a full reversal cannot be offset into a centerline swath.
const REVERSAL_BAND: f64 = 5.0;

/// Range and azimuth of one leg of a traverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeAzimuth {
    /// Length of the leg in feet.
    pub range_feet: f64,
    /// Azimuth of the leg in degrees, basis adjustment included.
    pub azimuth: f64,
}

/// Range and bearing from the last point of a traverse back to its first point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    /// Misclosure distance in feet.
    pub range_feet: f64,
    /// Azimuth from the last point to the first one, degrees.
    pub azimuth: f64,
}

impl Closure {
    /// Whether the misclosure is within [`CLOSURE_TOLERANCE_FEET`].
    pub fn is_closed(&self) -> bool {
        self.range_feet < CLOSURE_TOLERANCE_FEET
    }
}

/// Coordinate geometry traverse: a path built from survey calls.
///
/// A traverse keeps a cursor, which is moved by each call. Calls issued before [`Traverse::begin`] only move the
/// cursor, which allows to get from a tie point to the point of beginning. After `begin` every call also records the
/// new point and the range and azimuth of the leg leading to it.
///
/// When there is significant change of altitude along a traverse, surveyed ranges are longer than the distances over
/// the ellipsoid, and the computed positions drift from the surveyed path accordingly.
///
/// ```
/// use geofib::cogo::Traverse;
/// use geofib::geofib_types::latlon;
///
/// let mut traverse = Traverse::new("Lot 7", latlon!(37.34315, -123.175722), "Book 12, page 40");
/// traverse.thence_to(250.0, 45.0)?;
/// traverse.begin()?;
/// traverse.thence_to(100.0, 0.0)?;
/// traverse.thence_to(100.0, 90.0)?;
/// traverse.thence_to(100.0, 180.0)?;
///
/// let closure = traverse.close()?;
/// assert!((closure.range_feet - 100.0).abs() < 1e-6);
/// assert_eq!(traverse.as_polygon()?.len(), 5);
/// # Ok::<(), geofib::error::GeofibError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Traverse {
    name: String,
    notes: Vec<String>,
    points: Vec<Position>,
    range_azimuths: Vec<RangeAzimuth>,
    cursor: Position,
    last_azimuth: Option<f64>,
    basis_adjustment: f64,
    closure: Option<Closure>,
}

impl Traverse {
    /// Creates a new unbegun traverse with the cursor at `start`. `source` is recorded as the first note unless it is
    /// empty.
    pub fn new(name: impl Into<String>, start: Position, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: name.into(),
            notes: if source.is_empty() { vec![] } else { vec![source] },
            points: vec![],
            range_azimuths: vec![],
            cursor: start,
            last_azimuth: None,
            basis_adjustment: 0.0,
            closure: None,
        }
    }

    /// Name of the traverse.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable log of the calls, one line per call.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Points recorded since the traverse was begun.
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    /// Legs recorded since the traverse was begun. There is always one leg less than points.
    pub fn range_azimuths(&self) -> &[RangeAzimuth] {
        &self.range_azimuths
    }

    /// Current position of the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Azimuth the traverse is heading at the cursor. For curves this is the tangent at the end of the curve.
    pub fn last_azimuth(&self) -> Option<f64> {
        self.last_azimuth
    }

    /// Angle added to all bearings of subsequent calls.
    pub fn basis_adjustment(&self) -> f64 {
        self.basis_adjustment
    }

    /// Last computed closure, see [`Traverse::range_bearing_to_close`].
    pub fn closure(&self) -> Option<Closure> {
        self.closure
    }

    /// Whether [`Traverse::begin`] was called.
    pub fn is_begun(&self) -> bool {
        !self.points.is_empty()
    }

    /// Appends a comment to the note of the last call.
    pub fn comment(&mut self, comment: &str) {
        if comment.is_empty() {
            return;
        }

        match self.notes.last_mut() {
            Some(note) => {
                note.push_str(", ");
                note.push_str(comment);
            }
            None => self.notes.push(comment.to_string()),
        }
    }

    /// Records the authority of the following calls. Bearings of the subsequent calls are rotated by
    /// `basis_adjustment` degrees to bring the basis of bearings of the source to true north.
    pub fn authority(&mut self, source: &str, basis_adjustment: f64) -> Result<(), GeofibError> {
        check_finite("basis adjustment", basis_adjustment)?;

        self.notes.push(String::new());
        self.notes.push(format!(
            "Authority: {source}, basis adjusted {}",
            angle_as_dms_string(basis_adjustment)
        ));
        self.basis_adjustment = basis_adjustment;
        Ok(())
    }

    /// Marks the cursor as the true point of beginning: it becomes the first point of the traverse.
    pub fn begin(&mut self) -> Result<(), GeofibError> {
        if self.is_begun() {
            return Err(GeofibError::Sequence(format!(
                "beginning when already begun: while parsing {} at {}",
                self.name, self.cursor
            )));
        }

        log::debug!("Traverse {} begins at {}", self.name, self.cursor);
        self.notes.push("True Point of Beginning".to_string());
        self.points.push(self.cursor);
        Ok(())
    }

    /// Moves the cursor `range_feet` along `azimuth`.
    pub fn thence_to(&mut self, range_feet: f64, azimuth: f64) -> Result<(), GeofibError> {
        check_finite("range", range_feet)?;
        check_finite("azimuth", azimuth)?;

        self.notes.push(format!(
            "Thence {range_feet} feet bearing {}",
            angle_as_dms_string(azimuth)
        ));
        self.advance(range_feet, azimuth + self.basis_adjustment);
        Ok(())
    }

    /// Moves the cursor along a chord of a curve. `delta_azimuth` is the central angle of the curve: the chord bears
    /// half of it off the current heading, and the heading after the chord is turned by all of it. Negative angles
    /// turn left.
    pub fn thence_chord(&mut self, range_feet: f64, delta_azimuth: f64) -> Result<(), GeofibError> {
        check_finite("range", range_feet)?;
        check_finite("central angle", delta_azimuth)?;
        let last_azimuth = self.require_heading()?;

        self.notes.push(format!(
            "Thence a chord {range_feet:.2} feet with relative bearing {}",
            angle_as_dms_string(delta_azimuth)
        ));
        self.advance(range_feet, last_azimuth + delta_azimuth / 2.0);
        self.last_azimuth = Some(normalize_azimuth(last_azimuth + delta_azimuth));
        Ok(())
    }

    /// Moves the cursor along a circular curve of the given radius (feet) and central angle (degrees), approximated
    /// by chords (see [`arc_chords`](crate::cogo::arc::arc_chords)).
    pub fn thence_arc(&mut self, radius_feet: f64, delta_azimuth: f64) -> Result<(), GeofibError> {
        self.require_heading()?;
        let chords = arc_chords(radius_feet, delta_azimuth)?;

        self.notes.push(format!(
            "Thence a curve of radius {radius_feet} feet through {}",
            angle_as_dms_string(delta_azimuth)
        ));
        for chord in chords {
            self.thence_chord(chord.length, chord.delta)?;
        }

        Ok(())
    }

    /// Range and bearing from the last point back to the first one.
    ///
    /// A traverse of a parcel should come back to where it started: the returned value is the misclosure.
    pub fn range_bearing_to_close(&mut self) -> Result<Closure, GeofibError> {
        let (first, last) = self.require_points(3, "closure")?;

        let rb = last.range_bearing_to(&first);
        let closure = Closure {
            range_feet: rb.range_feet,
            azimuth: rb.azimuth,
        };

        if closure.is_closed() {
            self.notes.push("Closes".to_string());
        } else {
            log::info!(
                "Traverse {} misses closure by {:.2} feet",
                self.name,
                closure.range_feet
            );
            self.notes.push(format!(
                "Range {:.2} bearing {} to close",
                closure.range_feet,
                angle_as_dms_string(closure.azimuth)
            ));
        }

        self.closure = Some(closure);
        Ok(closure)
    }

    /// Computes the closure and then forces the traverse closed: the first point is appended (exactly) as the last
    /// point, unless the last point already equals it.
    pub fn close(&mut self) -> Result<Closure, GeofibError> {
        let closure = self.range_bearing_to_close()?;
        let first = self.points[0];
        if self.points.last() != Some(&first) {
            self.points.push(first);
            self.range_azimuths.push(RangeAzimuth {
                range_feet: closure.range_feet,
                azimuth: closure.azimuth,
            });
            self.cursor = first;
        }

        Ok(closure)
    }

    /// Points of the polygon bounded by the traverse. If the last point is not equal to the first one, a copy of the
    /// first point is added at the end.
    ///
    /// If the traverse crosses itself, the result is undefined.
    pub fn as_polygon(&self) -> Result<Vec<Position>, GeofibError> {
        let (first, last) = self.require_points(3, "polygon")?;

        let mut polygon = self.points.clone();
        if first != last {
            polygon.push(first);
        }

        Ok(polygon)
    }

    /// Treating the traverse as a centerline, returns the polygon of the swath extending `right_feet` to the right
    /// and `left_feet` to the left of it: the right side offsets in traverse order followed by the left side
    /// offsets in reverse order, i.e. counterclockwise.
    ///
    /// At each turn the outer side gets a mitered vertex on the bisector of the turn. Turns within 5 degrees of a
    /// reversal are rejected. Short legs next to sharp turns (where the inner offsets do not follow the order of the
    /// traverse points) and self-crossing traverses give an undefined result.
    pub fn as_centerline(&self, right_feet: f64, left_feet: f64) -> Result<Vec<Position>, GeofibError> {
        self.require_points(2, "centerline")?;
        check_finite("right offset", right_feet)?;
        check_finite("left offset", left_feet)?;

        let count = self.points.len();
        let mut right = Vec::with_capacity(count);
        let mut left = Vec::with_capacity(count);

        let mut add = |point: &Position, right_range: f64, left_range: f64, azimuth: f64| {
            right.push(offset(point, right_range, azimuth + 90.0));
            left.push(offset(point, left_range, azimuth - 90.0));
        };

        let legs = &self.range_azimuths;
        add(&self.points[0], right_feet, left_feet, legs[0].azimuth);

        for (k, point) in self.points.iter().enumerate().take(count - 1).skip(1) {
            let alpha_in = legs[k - 1].azimuth;
            let alpha_diff = (legs[k].azimuth - alpha_in).rem_euclid(360.0);
            if (alpha_diff - 180.0).abs() < REVERSAL_BAND {
                return Err(GeofibError::Geometry(format!(
                    "angle {alpha_diff} too acute: {}, {point}",
                    self.name
                )));
            }

            let bisector = alpha_in + alpha_diff / 2.0;
            let miter = |range: f64| (range / (alpha_diff / 2.0).to_radians().cos()).abs();
            if alpha_diff < 180.0 {
                // turns right, the right vertex is farther from the point
                add(point, miter(right_feet), left_feet, bisector);
            } else {
                add(point, right_feet, miter(left_feet), bisector + 180.0);
            }
        }

        add(&self.points[count - 1], right_feet, left_feet, legs[count - 2].azimuth);

        left.reverse();
        right.append(&mut left);
        Ok(right)
    }

    fn advance(&mut self, range_feet: f64, azimuth: f64) {
        let azimuth = normalize_azimuth(azimuth);
        self.cursor = self.cursor.displace(range_feet, azimuth);
        self.last_azimuth = Some(azimuth);

        if self.is_begun() {
            self.points.push(self.cursor);
            self.range_azimuths.push(RangeAzimuth { range_feet, azimuth });
        }

        log::debug!(
            "Traverse {}: {range_feet} feet at {azimuth} to {}",
            self.name,
            self.cursor
        );
    }

    fn require_heading(&self) -> Result<f64, GeofibError> {
        self.last_azimuth.ok_or_else(|| {
            GeofibError::Sequence(format!(
                "traverse {} cannot begin with an arc or chord",
                self.name
            ))
        })
    }

    fn require_points(&self, count: usize, what: &str) -> Result<(Position, Position), GeofibError> {
        debug_assert!(
            !self.is_begun() || self.points.len() == self.range_azimuths.len() + 1,
            "points and legs of a begun traverse are out of step"
        );

        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= count => Ok((*first, *last)),
            _ => Err(GeofibError::Sequence(format!(
                "{what} needs >= {count} points: {} has {}",
                self.name,
                self.points.len()
            ))),
        }
    }
}

fn offset(point: &Position, range_feet: f64, azimuth: f64) -> Position {
    if range_feet == 0.0 {
        *point
    } else {
        point.displace(range_feet, normalize_azimuth(azimuth))
    }
}

fn check_finite(what: &str, value: f64) -> Result<f64, GeofibError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeofibError::Format(format!("{what} must be a finite number: {value}")))
    }
}
