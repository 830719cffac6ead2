//! Generic text encoding codec.
//!
//! The database renders composite values as `(a,b,c)` and arrays as
//! `{a,b,c}`, nesting both freely. This module parses that form into
//! [`PgValue`], decodes primitive text by type identifier, and encodes
//! values back into the same form.
//!
//! Everything here is pure: no shared state, safe to call from any thread.
pub mod convert;
pub mod encode;
pub mod geometry;
pub mod oid;
pub mod parse;
pub mod primitive;
pub mod value;

use thiserror::Error;

pub use convert::{FromPgValue, PgBytes, ToPgValue};
pub use encode::{
    ColumnEncoder, encode_array, encode_nested, encode_outer_array, encode_record, encode_scalar, encode_value,
    quote, quote_element, with_cast,
};
pub use geometry::{PgBox, PgCircle, PgLine, PgLineSegment, PgPath, PgPoint, PgPolygon, PgTid};
pub use parse::{parse_array_text, parse_value};
pub use primitive::{decode_array, decode_by_type_id, decode_nested, expect_array, expect_indexed, expect_text};
pub use value::{PgValue, Record};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("unterminated string, so far got {partial:?}")]
    UnterminatedString { partial: String },
    #[error("expected end token {expected:?}, found {found}")]
    UnterminatedCollection { expected: char, found: String },
    #[error("invalid number {partial:?}: {reason}")]
    MalformedNumber { partial: String, reason: &'static str },
    #[error("unexpected character {found:?} at index {index}")]
    UnexpectedCharacter { found: char, index: usize },
    #[error("unexpected remaining characters at index {index}: {remainder:?}")]
    TrailingInput { index: usize, remainder: String },
    #[error("unsupported serialization for value {value} of kind {kind}")]
    UnsupportedValue { value: String, kind: &'static str },
    #[error("expected {expected}, instead got {found}")]
    Shape { expected: &'static str, found: String },
    #[error("cannot convert {found} into {expected}")]
    TypeMismatch { expected: &'static str, found: String },
    #[error("invalid text {text:?} for type id {type_id}: {reason}")]
    InvalidPrimitive { type_id: u32, text: String, reason: String },
    #[error("invalid value for enum {type_name}: {label:?}")]
    InvalidEnumLabel { type_name: String, label: String },
}

impl CodecError {
    pub(crate) fn shape(expected: &'static str, found: &PgValue) -> Self {
        CodecError::Shape { expected, found: found.preview(100) }
    }

    pub(crate) fn mismatch(expected: &'static str, found: &PgValue) -> Self {
        CodecError::TypeMismatch { expected, found: found.preview(100) }
    }
}
