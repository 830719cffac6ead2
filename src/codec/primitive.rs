//! Type-identifier directed decoding of primitive text, plus the small
//! shape helpers generated decoders lean on.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::geometry::{PgBox, PgCircle, PgLine, PgLineSegment, PgPath, PgPoint, PgPolygon, PgTid};
use super::oid::{self, Primitive, TypeClass};
use super::parse::{parse_array_text, parse_value};
use super::value::{PgValue, Record};
use super::CodecError;

/// Decode `value` as the built-in type `type_id`.
///
/// Only text is decoded. Array text is split without guessing element
/// types, so every leaf reaches the element decoder as text. Array
/// identifiers also accept an already parsed array and map the element
/// decoder over its leaves. Everything else,
/// including text for an unknown identifier, comes back unchanged.
pub fn decode_by_type_id(type_id: u32, value: PgValue) -> Result<PgValue, CodecError> {
    let Some(class) = oid::classify(type_id) else {
        return Ok(value);
    };
    match (class, value) {
        (TypeClass::Scalar(primitive), PgValue::Text(text)) => decode_text(primitive, type_id, text),
        (TypeClass::Array(primitive), PgValue::Text(text)) => {
            let parsed = parse_array_text(&text, oid::array_delimiter(type_id))?;
            let element = oid::element_type_id(type_id);
            decode_nested(&|item| decode_element(primitive, element, item), parsed)
        }
        (TypeClass::Array(primitive), parsed @ PgValue::Array(_)) => {
            let element = oid::element_type_id(type_id);
            decode_nested(&|item| decode_element(primitive, element, item), parsed)
        }
        (_, other) => Ok(other),
    }
}

/// Map `decoder` over every leaf of a (possibly nested) array.
///
/// Depth comes from the input: nested arrays are descended into, anything
/// else is a leaf. The outermost value must be an array.
pub fn decode_nested<F>(decoder: &F, value: PgValue) -> Result<PgValue, CodecError>
where
    F: Fn(PgValue) -> Result<PgValue, CodecError>,
{
    match value {
        PgValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                nested @ PgValue::Array(_) => decode_nested(decoder, nested),
                leaf => decoder(leaf),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PgValue::Array),
        other => Err(CodecError::shape("an array", &other)),
    }
}

/// Positional container for a composite value; text is parsed first.
pub fn expect_indexed(value: PgValue) -> Result<Record, CodecError> {
    match value {
        PgValue::Record(record) => Ok(record),
        PgValue::Text(text) => match parse_value(&text)? {
            PgValue::Record(record) => Ok(record),
            other => Err(CodecError::shape("an indexed container", &other)),
        },
        other => Err(CodecError::shape("an indexed container", &other)),
    }
}

/// Items of an array value; text is parsed first.
pub fn expect_array(value: PgValue) -> Result<Vec<PgValue>, CodecError> {
    match value {
        PgValue::Array(items) => Ok(items),
        PgValue::Text(text) => match parse_value(&text)? {
            PgValue::Array(items) => Ok(items),
            other => Err(CodecError::shape("an array", &other)),
        },
        other => Err(CodecError::shape("an array", &other)),
    }
}

pub fn expect_text(value: PgValue) -> Result<String, CodecError> {
    match value {
        PgValue::Text(text) => Ok(text),
        other => Err(CodecError::mismatch("text", &other)),
    }
}

/// Decode every item of an array value with `decode`.
pub fn decode_array<T, F>(value: PgValue, decode: F) -> Result<Vec<T>, CodecError>
where
    F: Fn(PgValue) -> Result<T, CodecError>,
{
    expect_array(value)?.into_iter().map(decode).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL
// ————————————————————————————————————————————————————————————————————————————

/// Array leaves come out of the generic parser, so integers may already be
/// numbers; the 64-bit kind is re-tagged to keep one variant per type.
fn decode_element(primitive: Primitive, type_id: u32, item: PgValue) -> Result<PgValue, CodecError> {
    match (primitive, item) {
        (_, PgValue::Text(text)) => decode_text(primitive, type_id, text),
        (Primitive::BigInt, PgValue::Int(int)) => Ok(PgValue::BigInt(int)),
        (_, other) => Ok(other),
    }
}

fn decode_text(primitive: Primitive, type_id: u32, text: String) -> Result<PgValue, CodecError> {
    let invalid = |reason: String| CodecError::InvalidPrimitive {
        type_id,
        text: text.clone(),
        reason,
    };

    let value = match primitive {
        Primitive::Text => return Ok(PgValue::Text(text)),
        Primitive::Int => PgValue::Int(text.trim().parse().map_err(|e| invalid(format!("{e}")))?),
        Primitive::BigInt => PgValue::BigInt(text.trim().parse().map_err(|e| invalid(format!("{e}")))?),
        Primitive::Bool => PgValue::Bool(parse_bool(&text).ok_or_else(|| invalid("not a boolean".into()))?),
        Primitive::Bytes => match text.strip_prefix("\\x") {
            Some(digits) => PgValue::Bytes(hex::decode(digits).map_err(|e| invalid(format!("{e}")))?),
            None => PgValue::Bytes(text.clone().into_bytes()),
        },
        Primitive::Date => PgValue::Date(
            NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| invalid(format!("{e}")))?,
        ),
        Primitive::Timestamp => PgValue::Timestamp(
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|e| invalid(format!("{e}")))?,
        ),
        Primitive::TimestampTz => PgValue::TimestampTz(
            DateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f%#z")
                .or_else(|_| DateTime::parse_from_rfc3339(&text))
                .map_err(|e| invalid(format!("{e}")))?,
        ),
        Primitive::Json => PgValue::Json(serde_json::from_str(&text).map_err(|e| invalid(format!("{e}")))?),
        Primitive::Box => PgValue::Box(text.parse::<PgBox>().map_err(|e| invalid(e.reason))?),
        Primitive::Circle => PgValue::Circle(text.parse::<PgCircle>().map_err(|e| invalid(e.reason))?),
        Primitive::Line => PgValue::Line(text.parse::<PgLine>().map_err(|e| invalid(e.reason))?),
        Primitive::LineSegment => {
            PgValue::LineSegment(text.parse::<PgLineSegment>().map_err(|e| invalid(e.reason))?)
        }
        Primitive::Path => PgValue::Path(text.parse::<PgPath>().map_err(|e| invalid(e.reason))?),
        Primitive::Point => PgValue::Point(text.parse::<PgPoint>().map_err(|e| invalid(e.reason))?),
        Primitive::Polygon => PgValue::Polygon(text.parse::<PgPolygon>().map_err(|e| invalid(e.reason))?),
        Primitive::Tid => PgValue::Tid(text.parse::<PgTid>().map_err(|e| invalid(e.reason))?),
    };
    Ok(value)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::oid;

    fn text(s: &str) -> PgValue {
        PgValue::Text(s.to_string())
    }

    #[test]
    fn non_text_passes_through() {
        assert_eq!(decode_by_type_id(oid::INT4, PgValue::Int(5)).unwrap(), PgValue::Int(5));
        assert_eq!(decode_by_type_id(oid::TEXT, PgValue::Null).unwrap(), PgValue::Null);
    }

    #[test]
    fn unknown_identifier_keeps_raw_text() {
        assert_eq!(decode_by_type_id(424_242, text("whatever")).unwrap(), text("whatever"));
    }

    #[test]
    fn decodes_scalars_by_identifier() {
        assert_eq!(decode_by_type_id(oid::INT4, text("42")).unwrap(), PgValue::Int(42));
        assert_eq!(decode_by_type_id(oid::INT8, text("-9")).unwrap(), PgValue::BigInt(-9));
        assert_eq!(decode_by_type_id(oid::BOOL, text("t")).unwrap(), PgValue::Bool(true));
        assert_eq!(decode_by_type_id(oid::BYTEA, text("\\x0aff")).unwrap(), PgValue::Bytes(vec![0x0a, 0xff]));
        assert_eq!(
            decode_by_type_id(oid::DATE, text("2024-02-29")).unwrap(),
            PgValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(
            decode_by_type_id(oid::JSONB, text(r#"{"a":[1]}"#)).unwrap(),
            PgValue::Json(serde_json::json!({"a": [1]}))
        );
        assert_eq!(
            decode_by_type_id(oid::POINT, text("(1,2)")).unwrap(),
            PgValue::Point(PgPoint { x: 1.0, y: 2.0 })
        );
        assert_eq!(decode_by_type_id(oid::NUMERIC, text("1.50")).unwrap(), text("1.50"));
    }

    #[test]
    fn decodes_timestamps_with_short_offsets() {
        let PgValue::TimestampTz(at) = decode_by_type_id(oid::TIMESTAMPTZ, text("2024-01-02 03:04:05.5+02")).unwrap()
        else {
            panic!("not a timestamptz");
        };
        assert_eq!(at.offset().local_minus_utc(), 2 * 3600);
        assert!(matches!(
            decode_by_type_id(oid::TIMESTAMP, text("2024-01-02 03:04:05")).unwrap(),
            PgValue::Timestamp(_)
        ));
    }

    #[test]
    fn array_identifiers_decode_each_leaf() {
        assert_eq!(
            decode_by_type_id(oid::INT8_ARRAY, text("{{1,2},{3,NULL}}")).unwrap(),
            PgValue::Array(vec![
                PgValue::Array(vec![PgValue::BigInt(1), PgValue::BigInt(2)]),
                PgValue::Array(vec![PgValue::BigInt(3), PgValue::Null]),
            ])
        );
        assert_eq!(
            decode_by_type_id(oid::BOOL_ARRAY, PgValue::Array(vec![text("f"), text("t")])).unwrap(),
            PgValue::Array(vec![PgValue::Bool(false), PgValue::Bool(true)])
        );
    }

    #[test]
    fn text_like_arrays_keep_their_exact_text() {
        assert_eq!(
            decode_by_type_id(oid::TEXT_ARRAY, text("{007,1.50,true}")).unwrap(),
            PgValue::Array(vec![text("007"), text("1.50"), text("true")])
        );
        assert_eq!(
            decode_by_type_id(oid::NUMERIC_ARRAY, text("{1.50,NULL}")).unwrap(),
            PgValue::Array(vec![text("1.50"), PgValue::Null])
        );
    }

    #[test]
    fn box_arrays_split_on_semicolons() {
        let decoded = decode_by_type_id(oid::BOX_ARRAY, text("{(1,1),(0,0);(2,2),(1,1)}")).unwrap();
        assert_eq!(
            decoded,
            PgValue::Array(vec![
                PgValue::Box("(1,1),(0,0)".parse().unwrap()),
                PgValue::Box("(2,2),(1,1)".parse().unwrap()),
            ])
        );
    }

    #[test]
    fn invalid_text_is_an_error_not_null() {
        assert!(matches!(
            decode_by_type_id(oid::INT4, text("forty")),
            Err(CodecError::InvalidPrimitive { type_id: oid::INT4, .. })
        ));
        assert!(decode_by_type_id(oid::DATE, text("yesterday")).is_err());
    }

    #[test]
    fn decode_nested_requires_an_array() {
        let id = |v: PgValue| Ok(v);
        assert!(matches!(decode_nested(&id, text("x")), Err(CodecError::Shape { .. })));
    }

    #[test]
    fn expect_helpers_parse_text_first() {
        let record = expect_indexed(text("(1,x)")).unwrap();
        assert_eq!(record.get(1), Some(&text("x")));
        assert_eq!(expect_array(text("{a}")).unwrap(), vec![text("a")]);
        assert!(expect_array(text("(a)")).is_err());
        let ints = decode_array(text("{1,2}"), |v| match v {
            PgValue::Int(i) => Ok(i),
            other => Err(CodecError::mismatch("int", &other)),
        });
        assert_eq!(ints.unwrap(), vec![1, 2]);
    }
}
