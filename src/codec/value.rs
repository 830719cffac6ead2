//! Runtime value model shared by the parser, the primitive decoders and the encoder.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use super::geometry::{PgBox, PgCircle, PgLine, PgLineSegment, PgPath, PgPoint, PgPolygon, PgTid};

/// A value as it travels through the generic text encoding.
///
/// The parser only ever produces `Null`, `Bool`, `Int`, `Float`, `Text`,
/// `Array` and `Record`; the richer variants come out of
/// [`decode_by_type_id`](super::decode_by_type_id) or host conversions.
#[derive(Debug, Clone, PartialEq)]
pub enum PgValue {
    Null,
    Bool(bool),
    /// 16/32-bit integers and integer literals found by the parser.
    Int(i64),
    /// 64-bit integers decoded from `int8`.
    BigInt(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Json(serde_json::Value),
    Point(PgPoint),
    Box(PgBox),
    Circle(PgCircle),
    Line(PgLine),
    LineSegment(PgLineSegment),
    Path(PgPath),
    Polygon(PgPolygon),
    Tid(PgTid),
    Array(Vec<PgValue>),
    Record(Record),
}

impl PgValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PgValue::Null => "null",
            PgValue::Bool(_) => "bool",
            PgValue::Int(_) => "int",
            PgValue::BigInt(_) => "bigint",
            PgValue::Float(_) => "float",
            PgValue::Text(_) => "text",
            PgValue::Bytes(_) => "bytes",
            PgValue::Date(_) => "date",
            PgValue::Timestamp(_) => "timestamp",
            PgValue::TimestampTz(_) => "timestamptz",
            PgValue::Json(_) => "json",
            PgValue::Point(_) => "point",
            PgValue::Box(_) => "box",
            PgValue::Circle(_) => "circle",
            PgValue::Line(_) => "line",
            PgValue::LineSegment(_) => "lseg",
            PgValue::Path(_) => "path",
            PgValue::Polygon(_) => "polygon",
            PgValue::Tid(_) => "tid",
            PgValue::Array(_) => "array",
            PgValue::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PgValue::Null)
    }

    /// `Debug` rendering cut to `max` characters, for error payloads.
    pub fn preview(&self, max: usize) -> String {
        let full = format!("{self:?}");
        truncate(&full, max)
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

impl From<&str> for PgValue {
    fn from(s: &str) -> Self {
        PgValue::Text(s.to_string())
    }
}

impl From<String> for PgValue {
    fn from(s: String) -> Self {
        PgValue::Text(s)
    }
}

impl From<i64> for PgValue {
    fn from(i: i64) -> Self {
        PgValue::Int(i)
    }
}

impl From<bool> for PgValue {
    fn from(b: bool) -> Self {
        PgValue::Bool(b)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RECORD
// ————————————————————————————————————————————————————————————————————————————

/// Positional container produced for `( ... )` values.
///
/// Keys are the ordinal positions rendered as strings (`"0"`, `"1"`, ...).
/// Equality ignores insertion order, only key/value pairs matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(IndexMap<String, PgValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to the next ordinal.
    pub fn push(&mut self, value: PgValue) {
        let key = self.0.len().to_string();
        self.0.insert(key, value);
    }

    pub fn insert(&mut self, ordinal: usize, value: PgValue) {
        self.0.insert(ordinal.to_string(), value);
    }

    pub fn get(&self, ordinal: usize) -> Option<&PgValue> {
        self.0.get(ordinal.to_string().as_str())
    }

    /// Move the value at `ordinal` out; an absent ordinal reads as `Null`.
    pub fn take(&mut self, ordinal: usize) -> PgValue {
        self.0
            .shift_remove(ordinal.to_string().as_str())
            .unwrap_or(PgValue::Null)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<PgValue> for Record {
    fn from_iter<I: IntoIterator<Item = PgValue>>(iter: I) -> Self {
        let mut record = Record::new();
        for value in iter {
            record.push(value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_take_is_positional_and_defaults_to_null() {
        let mut record: Record = vec![PgValue::from("a"), PgValue::Int(2)].into_iter().collect();
        assert_eq!(record.get(1), Some(&PgValue::Int(2)));
        assert_eq!(record.take(0), PgValue::from("a"));
        // removing "0" must not shift "1"
        assert_eq!(record.take(1), PgValue::Int(2));
        assert_eq!(record.take(7), PgValue::Null);
    }

    #[test]
    fn preview_truncates_long_values() {
        let value = PgValue::Text("x".repeat(500));
        assert!(value.preview(20).chars().count() <= 21);
    }
}
