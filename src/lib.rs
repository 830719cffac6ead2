//! PostgreSQL catalog → typed Rust modules, plus the runtime those modules
//! link against.
//!
//! Pipeline: [`catalog`] rows → [`graph::build`] → [`codegen::emit`]. Generated
//! code imports [`runtime`] for the text codec ([`codec`]) and registers its
//! column encoders with the [`intercept`] layer.
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod codegen;
pub mod graph;
pub mod intercept;
pub mod ir;
pub mod naming;
pub mod path_de;
pub mod runtime;
