//! Conversions between [`PgValue`] and the host types generated code uses.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use super::geometry::{PgBox, PgCircle, PgLine, PgLineSegment, PgPath, PgPoint, PgPolygon, PgTid};
use super::parse::parse_value;
use super::value::PgValue;
use super::CodecError;

/// Build a host value out of a decoded [`PgValue`].
pub trait FromPgValue: Sized {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError>;
}

/// Lower a host value into a [`PgValue`] ready for encoding.
pub trait ToPgValue {
    fn to_pg_value(&self) -> PgValue;
}

/// Host type for `bytea`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PgBytes(pub Vec<u8>);

// ————————————————————————————————————————————————————————————————————————————
// ONE VARIANT, ONE TYPE
// ————————————————————————————————————————————————————————————————————————————

macro_rules! variant_conversions {
    ($($ty:ty => $variant:ident as $name:literal;)*) => {$(
        impl FromPgValue for $ty {
            fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
                match value {
                    PgValue::$variant(inner) => Ok(inner),
                    other => Err(CodecError::mismatch($name, &other)),
                }
            }
        }

        impl ToPgValue for $ty {
            fn to_pg_value(&self) -> PgValue {
                PgValue::$variant(self.clone())
            }
        }
    )*};
}

variant_conversions! {
    bool => Bool as "bool";
    NaiveDate => Date as "date";
    NaiveDateTime => Timestamp as "timestamp";
    DateTime<FixedOffset> => TimestampTz as "timestamptz";
    serde_json::Value => Json as "json";
    PgPoint => Point as "point";
    PgBox => Box as "box";
    PgCircle => Circle as "circle";
    PgLine => Line as "line";
    PgLineSegment => LineSegment as "lseg";
    PgPath => Path as "path";
    PgPolygon => Polygon as "polygon";
    PgTid => Tid as "tid";
}

// ————————————————————————————————————————————————————————————————————————————
// LENIENT
// ————————————————————————————————————————————————————————————————————————————

impl FromPgValue for PgValue {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        Ok(value)
    }
}

impl ToPgValue for PgValue {
    fn to_pg_value(&self) -> PgValue {
        self.clone()
    }
}

/// Text-like catalog types map to `String`; inside arrays the parser may
/// already have read their elements as numbers or booleans.
impl FromPgValue for String {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        match value {
            PgValue::Text(text) => Ok(text),
            PgValue::Int(i) | PgValue::BigInt(i) => Ok(i.to_string()),
            PgValue::Float(f) => Ok(f.to_string()),
            PgValue::Bool(b) => Ok(b.to_string()),
            other => Err(CodecError::mismatch("text", &other)),
        }
    }
}

impl ToPgValue for String {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Text(self.clone())
    }
}

impl ToPgValue for &str {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Text(self.to_string())
    }
}

macro_rules! integer_conversions {
    ($($ty:ty => $variant:ident;)*) => {$(
        impl FromPgValue for $ty {
            fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
                match value {
                    PgValue::Int(i) | PgValue::BigInt(i) => {
                        <$ty>::try_from(i).map_err(|_| CodecError::mismatch(stringify!($ty), &PgValue::Int(i)))
                    }
                    other => Err(CodecError::mismatch(stringify!($ty), &other)),
                }
            }
        }

        impl ToPgValue for $ty {
            fn to_pg_value(&self) -> PgValue {
                PgValue::$variant(i64::from(*self))
            }
        }
    )*};
}

integer_conversions! {
    i16 => Int;
    i32 => Int;
    i64 => BigInt;
}

impl FromPgValue for f64 {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        match value {
            PgValue::Float(f) => Ok(f),
            PgValue::Int(i) | PgValue::BigInt(i) => Ok(i as f64),
            PgValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| CodecError::mismatch("f64", &PgValue::Text(text))),
            other => Err(CodecError::mismatch("f64", &other)),
        }
    }
}

impl ToPgValue for f64 {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Float(*self)
    }
}

impl FromPgValue for f32 {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        f64::from_pg_value(value).map(|f| f as f32)
    }
}

impl ToPgValue for f32 {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Float(f64::from(*self))
    }
}

impl FromPgValue for PgBytes {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        match value {
            PgValue::Bytes(bytes) => Ok(PgBytes(bytes)),
            other => Err(CodecError::mismatch("bytea", &other)),
        }
    }
}

impl ToPgValue for PgBytes {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Bytes(self.0.clone())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONTAINERS
// ————————————————————————————————————————————————————————————————————————————

impl<T: FromPgValue> FromPgValue for Option<T> {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        match value {
            PgValue::Null => Ok(None),
            other => T::from_pg_value(other).map(Some),
        }
    }
}

impl<T: ToPgValue> ToPgValue for Option<T> {
    fn to_pg_value(&self) -> PgValue {
        match self {
            Some(inner) => inner.to_pg_value(),
            None => PgValue::Null,
        }
    }
}

impl<T: FromPgValue> FromPgValue for Vec<T> {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        let items = match value {
            PgValue::Array(items) => items,
            PgValue::Text(text) => match parse_value(&text)? {
                PgValue::Array(items) => items,
                other => return Err(CodecError::shape("an array", &other)),
            },
            other => return Err(CodecError::shape("an array", &other)),
        };
        items.into_iter().map(T::from_pg_value).collect()
    }
}

impl<T: ToPgValue> ToPgValue for Vec<T> {
    fn to_pg_value(&self) -> PgValue {
        PgValue::Array(self.iter().map(ToPgValue::to_pg_value).collect())
    }
}
