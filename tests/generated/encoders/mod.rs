// @generated by pg-typegen. Do not edit.

pub mod public;
pub mod billing;
