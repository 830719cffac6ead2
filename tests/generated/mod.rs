// @generated by pg-typegen. Do not edit.

pub mod decoders;
pub mod encoders;
pub mod schemas;

/// Registers the column encoders of every namespace.
pub fn register(registry: &mut pg_typegen::runtime::EncoderRegistry) {
    encoders::public::register(registry);
    encoders::billing::register(registry);
}
