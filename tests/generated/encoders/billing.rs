// @generated by pg-typegen. Do not edit.
// encoders for namespace `billing`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;
use super::public as ns_public;
pub use super::super::schemas::billing::*;

pub fn encode_invoice(value: &Invoice) -> Result<String, rt::CodecError> {
    Ok(rt::encode_record(&[
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.id))?),
        rt::quote_element(ns_public::encode_person(&value.billedTo)?),
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.amount))?),
        rt::quote_element(rt::encode_value(&rt::ToPgValue::to_pg_value(&value.issued))?),
    ]))
}

impl rt::ToPgValue for Invoice {
    fn to_pg_value(&self) -> rt::PgValue {
        rt::PgValue::Record(vec![
            rt::ToPgValue::to_pg_value(&self.id),
            rt::ToPgValue::to_pg_value(&self.billedTo),
            rt::ToPgValue::to_pg_value(&self.amount),
            rt::ToPgValue::to_pg_value(&self.issued),
        ].into_iter().collect())
    }
}

/// Column encoders for columns of composite or domain type.
pub fn register(registry: &mut rt::EncoderRegistry) {
    registry.insert("billing", "invoices", "invoice", rt::with_cast(|value: &rt::PgValue| {
        let v: Invoice = rt::FromPgValue::from_pg_value(value.clone())?;
        encode_invoice(&v)
    }, "billing.invoice"));
}
