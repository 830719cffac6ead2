// @generated by pg-typegen. Do not edit.
// decoders for namespace `public`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;
pub use super::super::schemas::public::*;

pub fn decode_address(value: rt::PgValue) -> Result<Address, rt::CodecError> {
    let mut v = rt::expect_indexed(value)?;
    Ok(Address {
        street: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(25, v.take(0))?)?,
        zipCode: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(23, v.take(1))?)?,
        tags: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(1009, v.take(2))?)?,
    })
}

impl rt::FromPgValue for Address {
    fn from_pg_value(value: rt::PgValue) -> Result<Self, rt::CodecError> {
        decode_address(value)
    }
}

pub fn decode_email(value: rt::PgValue) -> Result<Email, rt::CodecError> {
    Ok(rt::FromPgValue::from_pg_value(rt::decode_by_type_id(25, value)?)?)
}

pub fn decode_mood(value: rt::PgValue) -> Result<Mood, rt::CodecError> {
    let label: String = rt::FromPgValue::from_pg_value(value)?;
    match label.as_str() {
        "happy" => Ok(Mood::Happy),
        "sad" => Ok(Mood::Sad),
        "in progress" => Ok(Mood::InProgress),
        _ => Err(rt::invalid_enum_label("public.mood", label.as_str())),
    }
}

impl rt::FromPgValue for Mood {
    fn from_pg_value(value: rt::PgValue) -> Result<Self, rt::CodecError> {
        decode_mood(value)
    }
}

pub fn decode_person(value: rt::PgValue) -> Result<Person, rt::CodecError> {
    let mut v = rt::expect_indexed(value)?;
    Ok(Person {
        name: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(25, v.take(0))?)?,
        home: decode_address(v.take(1))?,
        moods: rt::decode_array(v.take(2), decode_mood)?,
        contact: decode_email(v.take(3))?,
    })
}

impl rt::FromPgValue for Person {
    fn from_pg_value(value: rt::PgValue) -> Result<Self, rt::CodecError> {
        decode_person(value)
    }
}
