//! Encoding host values back into the generic text form.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use super::value::PgValue;
use super::CodecError;

/// Encoder registered for one column: `(value, cast)` to literal text.
pub type ColumnEncoder = Arc<dyn Fn(&PgValue, bool) -> Result<String, CodecError> + Send + Sync>;

const NULL: &str = "NULL";

/// Text form of a single scalar value.
pub fn encode_value(value: &PgValue) -> Result<String, CodecError> {
    let text = match value {
        PgValue::Null => NULL.to_string(),
        PgValue::Text(s) => quote(s),
        PgValue::Bool(b) => b.to_string(),
        PgValue::Int(i) | PgValue::BigInt(i) => i.to_string(),
        // `{:?}` keeps a `.0` so the text reads back as a float
        PgValue::Float(f) if f.is_finite() => format!("{f:?}"),
        PgValue::Float(f) if f.is_nan() => quote("NaN"),
        PgValue::Float(f) if *f > 0.0 => quote("Infinity"),
        PgValue::Float(_) => quote("-Infinity"),
        PgValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        PgValue::Timestamp(at) => format!("{}+00:00", at.format("%Y-%m-%dT%H:%M:%S%.3f")),
        PgValue::TimestampTz(at) => format_with_offset(at),
        PgValue::Bytes(bytes) => quote(&format!("\\x{}", hex::encode(bytes))),
        PgValue::Json(json) => quote(&json.to_string()),
        other => {
            return Err(CodecError::UnsupportedValue {
                value: other.preview(100),
                kind: other.kind(),
            });
        }
    };
    Ok(text)
}

/// Text form of a whole column value, outside any collection: text and
/// byte strings are written bare, everything else as [`encode_value`].
pub fn encode_scalar(value: &PgValue) -> Result<String, CodecError> {
    match value {
        PgValue::Text(s) => Ok(s.clone()),
        PgValue::Bytes(bytes) => Ok(format!("\\x{}", hex::encode(bytes))),
        PgValue::Json(json) => Ok(json.to_string()),
        other => encode_value(other),
    }
}

/// `2024-01-02T03:04:05.000-05:00`
///
/// The offset is derived as minutes *behind* UTC, so the printed sign is
/// the opposite of that count's sign.
fn format_with_offset(at: &DateTime<FixedOffset>) -> String {
    let behind = -at.offset().local_minus_utc() / 60;
    let sign = if behind > 0 { '-' } else { '+' };
    let minutes = behind.abs();
    format!(
        "{}{}{:02}:{:02}",
        at.format("%Y-%m-%dT%H:%M:%S%.3f"),
        sign,
        minutes / 60,
        minutes % 60
    )
}

/// Double-quote `s`, escaping `\` and `"`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quote an already encoded element when the collection syntax requires
/// it. The null literal and already quoted text are left alone.
pub fn quote_element(encoded: String) -> String {
    let already_quoted = encoded.len() >= 2 && encoded.starts_with('"') && encoded.ends_with('"');
    if encoded == NULL || already_quoted || !needs_quotes(&encoded) {
        encoded
    } else {
        quote(&encoded)
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case(NULL)
        || s.chars()
            .any(|c| matches!(c, '{' | '}' | '(' | ')' | ',' | '"' | '\\') || c.is_whitespace())
}

/// `{e1,e2,...}` with every element passed through [`quote_element`].
pub fn encode_array<T, F>(items: &[T], encode: F) -> Result<String, CodecError>
where
    F: Fn(&T) -> Result<String, CodecError>,
{
    let parts = items
        .iter()
        .map(|item| encode(item).map(quote_element))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{{{}}}", parts.join(",")))
}

/// `{e1,e2,...}` for the outer dimensions of a multi-dimensional array,
/// whose elements are inner arrays and stay unquoted.
pub fn encode_outer_array<T, F>(items: &[T], encode: F) -> Result<String, CodecError>
where
    F: Fn(&T) -> Result<String, CodecError>,
{
    let parts = items.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{{{}}}", parts.join(",")))
}

/// `(a,b,...)`. A null part is written as an empty element.
pub fn encode_record(parts: &[String]) -> String {
    let parts: Vec<&str> = parts
        .iter()
        .map(|part| if part == NULL { "" } else { part.as_str() })
        .collect();
    format!("({})", parts.join(","))
}

/// Encode a `dims`-deep array, one dimension at a time.
pub fn encode_nested<F>(encode: &F, dims: usize, value: &PgValue) -> Result<String, CodecError>
where
    F: Fn(&PgValue) -> Result<String, CodecError>,
{
    let PgValue::Array(items) = value else {
        return Err(CodecError::shape("an array", value));
    };
    if dims <= 1 {
        encode_array(items, encode)
    } else {
        encode_outer_array(items, |item| encode_nested(encode, dims - 1, item))
    }
}

/// Wrap `encode` so that, when asked to, its output becomes a single-quoted
/// literal cast to `cast_type`. A null value skips `encode` entirely.
pub fn with_cast<F>(encode: F, cast_type: impl Into<String>) -> ColumnEncoder
where
    F: Fn(&PgValue) -> Result<String, CodecError> + Send + Sync + 'static,
{
    let cast_type = cast_type.into();
    Arc::new(move |value: &PgValue, cast: bool| {
        if value.is_null() {
            return Ok(if cast { format!("{NULL}::{cast_type}") } else { NULL.to_string() });
        }
        let encoded = encode(value)?;
        if cast {
            Ok(format!("'{}'::{}", encoded.replace('\'', "''"), cast_type))
        } else {
            Ok(encoded)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse::parse_value;
    use crate::codec::value::Record;
    use chrono::{NaiveDate, TimeZone};

    fn text(s: &str) -> PgValue {
        PgValue::Text(s.to_string())
    }

    #[test]
    fn scalars() {
        assert_eq!(encode_value(&PgValue::Null).unwrap(), "NULL");
        assert_eq!(encode_value(&text(r#"a "b" \c"#)).unwrap(), r#""a \"b\" \\c""#);
        assert_eq!(encode_value(&PgValue::Int(-3)).unwrap(), "-3");
        assert_eq!(encode_value(&PgValue::BigInt(9_000_000_000)).unwrap(), "9000000000");
        assert_eq!(encode_value(&PgValue::Bool(false)).unwrap(), "false");
        assert_eq!(encode_value(&PgValue::Float(2.5)).unwrap(), "2.5");
        assert_eq!(encode_value(&PgValue::Float(1.0)).unwrap(), "1.0");
        assert_eq!(encode_value(&PgValue::Float(f64::NAN)).unwrap(), r#""NaN""#);
        assert_eq!(encode_value(&PgValue::Bytes(vec![1, 255])).unwrap(), r#""\\x01ff""#);
    }

    #[test]
    fn scalars_outside_collections_are_bare() {
        assert_eq!(encode_scalar(&text("a@b c")).unwrap(), "a@b c");
        assert_eq!(encode_scalar(&PgValue::Bytes(vec![1, 255])).unwrap(), r"\x01ff");
        assert_eq!(encode_scalar(&PgValue::Int(7)).unwrap(), "7");
        let cast = with_cast(encode_scalar, "public.email");
        assert_eq!(cast(&text("o'neil@x"), true).unwrap(), "'o''neil@x'::public.email");
    }

    #[test]
    fn timestamps_carry_an_explicit_offset() {
        let east = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let at = east.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(encode_value(&PgValue::TimestampTz(at)).unwrap(), "2024-01-02T03:04:05.000+05:30");

        let west = FixedOffset::west_opt(4 * 3600).unwrap();
        let at = west.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(encode_value(&PgValue::TimestampTz(at)).unwrap(), "2024-01-02T03:04:05.000-04:00");

        let naive = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(encode_value(&PgValue::Timestamp(naive)).unwrap(), "2024-01-02T00:00:00.000+00:00");
    }

    #[test]
    fn unsupported_kinds_are_named() {
        let err = encode_value(&PgValue::Array(vec![])).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedValue { kind: "array", .. }));
    }

    #[test]
    fn nested_arrays_round_trip_through_the_parser() {
        let value = PgValue::Array(vec![
            PgValue::Array(vec![text("a,b"), PgValue::Null]),
            PgValue::Array(vec![text("{x}"), text(r#"q"uote"#)]),
        ]);
        let encoded = encode_nested(&encode_value, 2, &value).unwrap();
        assert_eq!(encoded, r#"{{"a,b",NULL},{"{x}","q\"uote"}}"#);
        assert_eq!(parse_value(&encoded).unwrap(), value);
    }

    #[test]
    fn one_dimension_round_trips_mixed_scalars() {
        let value = PgValue::Array(vec![PgValue::Int(1), text("1"), PgValue::Bool(true), PgValue::Float(0.25)]);
        let encoded = encode_nested(&encode_value, 1, &value).unwrap();
        assert_eq!(parse_value(&encoded).unwrap(), value);
    }

    #[test]
    fn quoting_an_element_is_idempotent() {
        let once = quote_element("(1,2)".to_string());
        assert_eq!(once, r#""(1,2)""#);
        assert_eq!(quote_element(once.clone()), once);
        assert_eq!(quote_element("NULL".to_string()), "NULL");
        assert_eq!(quote_element("null".to_string()), r#""null""#);
        assert_eq!(quote_element("42".to_string()), "42");
    }

    #[test]
    fn records_write_null_as_empty() {
        let encoded = encode_record(&["NULL".to_string(), "1".to_string(), quote("a b")]);
        assert_eq!(encoded, r#"(,1,"a b")"#);
        let parsed: Record = vec![PgValue::Null, PgValue::Int(1), text("a b")].into_iter().collect();
        assert_eq!(parse_value(&encoded).unwrap(), PgValue::Record(parsed));
    }

    #[test]
    fn null_in_the_middle_keeps_its_position() {
        let encoded = encode_record(&["1".to_string(), "NULL".to_string(), "2".to_string()]);
        assert_eq!(encoded, "(1,,2)");
        let PgValue::Record(mut parsed) = parse_value(&encoded).unwrap() else {
            panic!("not a record");
        };
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.take(1), PgValue::Null);
        assert_eq!(parsed.take(2), PgValue::Int(2));
    }

    #[test]
    fn whole_floats_read_back_as_floats() {
        let value = PgValue::Array(vec![PgValue::Float(1.0), PgValue::Float(-3.0), PgValue::Int(3)]);
        let encoded = encode_nested(&encode_value, 1, &value).unwrap();
        assert_eq!(encoded, "{1.0,-3.0,3}");
        assert_eq!(parse_value(&encoded).unwrap(), value);
    }

    #[test]
    fn encode_nested_rejects_non_arrays() {
        assert!(matches!(encode_nested(&encode_value, 1, &text("x")), Err(CodecError::Shape { .. })));
    }

    #[test]
    fn with_cast_doubles_single_quotes() {
        let encoder = with_cast(encode_value, "public.label");
        assert_eq!(encoder(&text("it's"), false).unwrap(), r#""it's""#);
        assert_eq!(encoder(&text("it's"), true).unwrap(), r#"'"it''s"'::public.label"#);
        assert_eq!(encoder(&PgValue::Null, true).unwrap(), "NULL::public.label");
    }
}
