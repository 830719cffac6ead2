//! Geometric and tuple-identifier types in their text forms.
//!
//! | type    | text form                      |
//! |---------|--------------------------------|
//! | point   | `(x,y)`                        |
//! | lseg    | `[(x1,y1),(x2,y2)]`            |
//! | box     | `(x1,y1),(x2,y2)`              |
//! | path    | `[(x1,y1),...]` or `((..),..)` |
//! | polygon | `((x1,y1),...)`                |
//! | circle  | `<(x,y),r>`                    |
//! | line    | `{a,b,c}`                      |
//! | tid     | `(block,offset)`               |

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("error decoding {kind}: {reason} in {text:?}")]
pub struct GeometryError {
    pub kind: &'static str,
    pub text: String,
    pub reason: String,
}

impl GeometryError {
    fn new(kind: &'static str, text: &str, reason: impl Into<String>) -> Self {
        GeometryError { kind, text: text.to_string(), reason: reason.into() }
    }
}

/// Strip grouping characters and read the comma separated floats.
fn floats(kind: &'static str, s: &str) -> Result<Vec<f64>, GeometryError> {
    let sanitised = s.replace(&['(', ')', '[', ']', '<', '>', '{', '}', ' '][..], "");
    if sanitised.is_empty() {
        return Ok(Vec::new());
    }
    sanitised
        .split(',')
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| GeometryError::new(kind, s, format!("could not parse {part:?}")))
        })
        .collect()
}

fn exactly<const N: usize>(kind: &'static str, s: &str) -> Result<[f64; N], GeometryError> {
    let values = floats(kind, s)?;
    let len = values.len();
    values
        .try_into()
        .map_err(|_| GeometryError::new(kind, s, format!("expected {N} numbers, got {len}")))
}

fn points(kind: &'static str, s: &str) -> Result<Vec<PgPoint>, GeometryError> {
    let values = floats(kind, s)?;
    if values.len() % 2 != 0 {
        return Err(GeometryError::new(kind, s, "odd number of coordinates"));
    }
    Ok(values.chunks(2).map(|xy| PgPoint { x: xy[0], y: xy[1] }).collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgPoint {
    pub x: f64,
    pub y: f64,
}

impl FromStr for PgPoint {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y] = exactly::<2>("point", s)?;
        Ok(PgPoint { x, y })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgLineSegment {
    pub start: PgPoint,
    pub end: PgPoint,
}

impl FromStr for PgLineSegment {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x1, y1, x2, y2] = exactly::<4>("lseg", s)?;
        Ok(PgLineSegment { start: PgPoint { x: x1, y: y1 }, end: PgPoint { x: x2, y: y2 } })
    }
}

/// Opposite corners, as the database normalises them (upper right first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgBox {
    pub upper_right: PgPoint,
    pub lower_left: PgPoint,
}

impl FromStr for PgBox {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x1, y1, x2, y2] = exactly::<4>("box", s)?;
        Ok(PgBox { upper_right: PgPoint { x: x1, y: y1 }, lower_left: PgPoint { x: x2, y: y2 } })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PgPath {
    pub closed: bool,
    pub points: Vec<PgPoint>,
}

impl FromStr for PgPath {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let closed = !s.trim_start().starts_with('[');
        Ok(PgPath { closed, points: points("path", s)? })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PgPolygon {
    pub points: Vec<PgPoint>,
}

impl FromStr for PgPolygon {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PgPolygon { points: points("polygon", s)? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgCircle {
    pub center: PgPoint,
    pub radius: f64,
}

impl FromStr for PgCircle {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, radius] = exactly::<3>("circle", s)?;
        Ok(PgCircle { center: PgPoint { x, y }, radius })
    }
}

/// `a*x + b*y + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgLine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl FromStr for PgLine {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [a, b, c] = exactly::<3>("line", s)?;
        Ok(PgLine { a, b, c })
    }
}

/// Physical row location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PgTid {
    pub block: u32,
    pub offset: u16,
}

impl FromStr for PgTid {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (block, offset) = inner
            .split_once(',')
            .ok_or_else(|| GeometryError::new("tid", s, "missing ','"))?;
        let block = block
            .trim()
            .parse()
            .map_err(|_| GeometryError::new("tid", s, "could not get block"))?;
        let offset = offset
            .trim()
            .parse()
            .map_err(|_| GeometryError::new("tid", s, "could not get offset"))?;
        Ok(PgTid { block, offset })
    }
}
