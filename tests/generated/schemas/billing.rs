// @generated by pg-typegen. Do not edit.
// declarations for namespace `billing`
#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]

use pg_typegen::runtime as rt;
use super::public as ns_public;

/// `billing.invoice`
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub billedTo: ns_public::Person,
    pub amount: String,
    pub issued: rt::chrono::NaiveDate,
}

/// `billing.invoices`
#[derive(Debug, Clone, PartialEq)]
pub struct Invoices {
    pub id: i64,
    pub invoice: Invoice,
}

impl rt::Table for Invoices {
    const NAME: &'static str = "invoices";
    const NAMESPACED_NAME: &'static str = "billing.invoices";
}

/// Tables of `billing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    pub invoices: Vec<Invoices>,
}

/// `(member, "namespace.table")` for every table above.
pub const TABLES: &[(&str, &str)] = &[
    ("invoices", "billing.invoices"),
];
