//! The one import generated modules use (`use pg_typegen::runtime as rt;`).
//!
//! Re-exports the codec surface plus the few shapes that only generated
//! declarations need.

pub use chrono;
pub use serde_json;

pub use crate::codec::oid;
pub use crate::codec::{
    CodecError, ColumnEncoder, FromPgValue, PgBox, PgBytes, PgCircle, PgLine, PgLineSegment, PgPath,
    PgPoint, PgPolygon, PgTid, PgValue, Record, ToPgValue, decode_array, decode_by_type_id,
    decode_nested, encode_array, encode_nested, encode_outer_array, encode_record, encode_scalar, encode_value,
    expect_array, expect_indexed, expect_text, parse_array_text, parse_value, quote, quote_element, with_cast,
};
pub use crate::intercept::EncoderRegistry;

/// Column value that the database can fill in on insert.
///
/// Rows read back always carry `Value`; `Default` only makes sense in an
/// insert or update, where it means "leave the column out".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum HasDefault<T> {
    #[default]
    Default,
    Value(T),
}

impl<T> HasDefault<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            HasDefault::Default => None,
            HasDefault::Value(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            HasDefault::Default => None,
            HasDefault::Value(value) => Some(value),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, HasDefault::Default)
    }
}

impl<T> From<T> for HasDefault<T> {
    fn from(value: T) -> Self {
        HasDefault::Value(value)
    }
}

impl<T: FromPgValue> FromPgValue for HasDefault<T> {
    fn from_pg_value(value: PgValue) -> Result<Self, CodecError> {
        T::from_pg_value(value).map(HasDefault::Value)
    }
}

/// Implemented by every generated table row.
pub trait Table {
    /// Table name after the configured naming convention.
    const NAME: &'static str;
    /// `"namespace.table"` with the catalog's own spelling.
    const NAMESPACED_NAME: &'static str;
}

/// Error for an enum decoder that met a label outside its value set.
pub fn invalid_enum_label(type_name: &str, label: impl Into<String>) -> CodecError {
    CodecError::InvalidEnumLabel {
        type_name: type_name.to_string(),
        label: label.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_default_reads_as_its_value() {
        let column: HasDefault<Option<i32>> = FromPgValue::from_pg_value(PgValue::Null).unwrap();
        assert_eq!(column, HasDefault::Value(None));
        assert!(HasDefault::<i32>::default().is_default());
        assert_eq!(HasDefault::from(3).into_value(), Some(3));
    }
}
