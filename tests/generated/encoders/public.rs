// @generated by pg-typegen. Do not edit.
// encoders for namespace `public`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;
pub use super::super::schemas::public::*;

pub fn encode_address(value: &Address) -> Result<String, rt::CodecError> {
    Ok(rt::encode_record(&[
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.street))?),
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.zipCode))?),
        rt::quote_element(rt::encode_nested(&rt::encode_value, 1, &rt::ToPgValue::to_pg_value(&value.tags))?),
    ]))
}

impl rt::ToPgValue for Address {
    fn to_pg_value(&self) -> rt::PgValue {
        rt::PgValue::Record(vec![
            rt::ToPgValue::to_pg_value(&self.street),
            rt::ToPgValue::to_pg_value(&self.zipCode),
            rt::ToPgValue::to_pg_value(&self.tags),
        ].into_iter().collect())
    }
}

pub fn encode_email(value: &Email) -> Result<String, rt::CodecError> {
    rt::encode_value(&rt::ToPgValue::to_pg_value(value))
}

impl rt::ToPgValue for Mood {
    fn to_pg_value(&self) -> rt::PgValue {
        rt::PgValue::Text(self.as_str().to_string())
    }
}

pub fn encode_person(value: &Person) -> Result<String, rt::CodecError> {
    Ok(rt::encode_record(&[
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.name))?),
        rt::quote_element(encode_address(&value.home)?),
        rt::quote_element(rt::encode_nested(&rt::encode_value, 1, &rt::ToPgValue::to_pg_value(&value.moods))?),
        rt::quote_element(encode_email(&value.contact)?),
    ]))
}

impl rt::ToPgValue for Person {
    fn to_pg_value(&self) -> rt::PgValue {
        rt::PgValue::Record(vec![
            rt::ToPgValue::to_pg_value(&self.name),
            rt::ToPgValue::to_pg_value(&self.home),
            rt::ToPgValue::to_pg_value(&self.moods),
            rt::ToPgValue::to_pg_value(&self.contact),
        ].into_iter().collect())
    }
}

/// Column encoders for columns of composite or domain type.
pub fn register(registry: &mut rt::EncoderRegistry) {
    registry.insert("public", "users", "email", rt::with_cast(|value: &rt::PgValue| {
        let v: Email = rt::FromPgValue::from_pg_value(value.clone())?;
        rt::encode_scalar(&rt::ToPgValue::to_pg_value(&v))
    }, "public.email"));
    registry.insert("public", "users", "address", rt::with_cast(|value: &rt::PgValue| {
        let v: Address = rt::FromPgValue::from_pg_value(value.clone())?;
        encode_address(&v)
    }, "public.address"));
    registry.insert("public", "users", "previous_addresses", rt::with_cast(|value: &rt::PgValue| {
        let v: Vec<Address> = rt::FromPgValue::from_pg_value(value.clone())?;
        rt::encode_array(&v, encode_address)
    }, "public.address[]"));
}
