// @generated by pg-typegen. Do not edit.
// decoders for namespace `billing`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;
use super::public as ns_public;
pub use super::super::schemas::billing::*;

pub fn decode_invoice(value: rt::PgValue) -> Result<Invoice, rt::CodecError> {
    let mut v = rt::expect_indexed(value)?;
    Ok(Invoice {
        id: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(20, v.take(0))?)?,
        billedTo: ns_public::decode_person(v.take(1))?,
        amount: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(1700, v.take(2))?)?,
        issued: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(1082, v.take(3))?)?,
    })
}

impl rt::FromPgValue for Invoice {
    fn from_pg_value(value: rt::PgValue) -> Result<Self, rt::CodecError> {
        decode_invoice(value)
    }
}
