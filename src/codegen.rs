//! Rust source emission from a [`TypeGraph`].
//!
//! Per namespace three artifacts come out, each a standalone module:
//!
//! ```text
//! <out>/mod.rs                  pub mod schemas; pub mod decoders; pub mod encoders;
//! <out>/schemas/<ns>.rs         declarations
//! <out>/decoders/<ns>.rs        decode_* functions + FromPgValue impls
//! <out>/encoders/<ns>.rs        encode_* functions + ToPgValue impls + register()
//! ```
//!
//! Sibling namespaces are imported under a stable alias (`ns_<namespace>`),
//! the same alias in all three artifact kinds.
pub mod declarations;
pub mod decoders;
pub mod encoders;
pub mod type_map;

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ir::{EnumValue, Field, NodeKind, TypeGraph, TypeNode, TypeRef};
use crate::naming::{self, TableNaming};
pub use type_map::{TypeMap, TypeMapping, default_type_mapping};

// ————————————————————————————————————————————————————————————————————————————
// WRITER
// ————————————————————————————————————————————————————————————————————————————

/// Line-oriented source writer with block indentation.
#[derive(Debug, Default)]
pub struct Codegen {
    buf: String,
    depth: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str("    ");
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// `open`, indented `body`, `close`.
    pub fn wrap(&mut self, open: impl AsRef<str>, close: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(close);
    }

    /// `header {` ... `}`
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.wrap(format!("{} {{", header.as_ref()), "}", body);
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OPTIONS
// ————————————————————————————————————————————————————————————————————————————

/// Everything emission can be tuned with. Loadable from JSON; all fields
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenOptions {
    /// Member naming of the per-namespace table aggregate.
    pub table_naming: TableNaming,
    /// Extra or replacement entries over [`default_type_mapping`].
    pub type_mapping: TypeMapping,
    /// Host type for catalog types with no mapping.
    pub fallback_type: String,
    /// Path generated code imports the runtime from (as `rt`).
    pub helper_import: String,
    /// Path from a decoder/encoder module to the declarations directory.
    pub schemas_import: String,
    /// Name of the per-namespace table aggregate.
    pub database_struct: String,
    /// `namespace → type → fn(PgValue) -> Result<T, CodecError>` replacing
    /// the generated or built-in decoder for that type.
    pub decoder_overrides: IndexMap<String, IndexMap<String, String>>,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            table_naming: TableNaming::default(),
            type_mapping: TypeMapping::new(),
            fallback_type: "rt::PgValue".to_string(),
            helper_import: "pg_typegen::runtime".to_string(),
            schemas_import: "super::super::schemas".to_string(),
            database_struct: "Database".to_string(),
            decoder_overrides: IndexMap::new(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT
// ————————————————————————————————————————————————————————————————————————————

/// The three artifacts of one namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceArtifacts {
    pub namespace: String,
    pub module: String,
    pub declarations: String,
    pub decoders: String,
    pub encoders: String,
}

/// A file to write, relative to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

pub const SCHEMAS_DIR: &str = "schemas";
pub const DECODERS_DIR: &str = "decoders";
pub const ENCODERS_DIR: &str = "encoders";

const GENERATED_HEADER: &str = "// @generated by pg-typegen. Do not edit.";

/// Emit every namespace of `graph`.
pub fn emit(graph: &TypeGraph, options: &CodegenOptions) -> Vec<NamespaceArtifacts> {
    let type_map = TypeMap::new(&options.type_mapping);
    graph
        .by_namespace()
        .into_iter()
        .map(|(namespace, nodes)| {
            let scope = Scope { graph, options, type_map: &type_map, namespace };
            let artifacts = NamespaceArtifacts {
                namespace: namespace.to_string(),
                module: naming::module_name(namespace),
                declarations: declarations::emit(&scope, &nodes),
                decoders: decoders::emit(&scope, &nodes),
                encoders: encoders::emit(&scope, &nodes),
            };
            debug!(namespace, types = nodes.len(), "emitted namespace");
            artifacts
        })
        .collect()
}

/// [`emit`] plus the `mod.rs` files, as a list of files to write.
pub fn emit_files(graph: &TypeGraph, options: &CodegenOptions) -> Vec<Artifact> {
    let namespaces = emit(graph, options);
    let mut files = Vec::with_capacity(namespaces.len() * 3 + 4);
    files.push(Artifact {
        path: PathBuf::from("mod.rs"),
        contents: root_index(&namespaces, options),
    });
    for dir in [SCHEMAS_DIR, DECODERS_DIR, ENCODERS_DIR] {
        files.push(Artifact {
            path: PathBuf::from(dir).join("mod.rs"),
            contents: module_index(&namespaces),
        });
    }
    for artifacts in namespaces {
        let file = format!("{}.rs", naming::module_file_stem(&artifacts.namespace));
        files.push(Artifact { path: PathBuf::from(SCHEMAS_DIR).join(&file), contents: artifacts.declarations });
        files.push(Artifact { path: PathBuf::from(DECODERS_DIR).join(&file), contents: artifacts.decoders });
        files.push(Artifact { path: PathBuf::from(ENCODERS_DIR).join(&file), contents: artifacts.encoders });
    }
    files
}

/// `mod.rs` of one artifact directory.
pub fn module_index(namespaces: &[NamespaceArtifacts]) -> String {
    let mut cg = Codegen::new();
    cg.line(GENERATED_HEADER);
    cg.blank();
    for artifacts in namespaces {
        cg.line(format!("pub mod {};", artifacts.module));
    }
    cg.into_string()
}

/// Top-level `mod.rs`, with one `register` covering every namespace.
pub fn root_index(namespaces: &[NamespaceArtifacts], options: &CodegenOptions) -> String {
    let mut cg = Codegen::new();
    cg.line(GENERATED_HEADER);
    cg.blank();
    cg.line(format!("pub mod {DECODERS_DIR};"));
    cg.line(format!("pub mod {ENCODERS_DIR};"));
    cg.line(format!("pub mod {SCHEMAS_DIR};"));
    cg.blank();
    cg.line("/// Registers the column encoders of every namespace.");
    cg.block(
        format!("pub fn register(registry: &mut {}::EncoderRegistry)", options.helper_import),
        |cg| {
            for artifacts in namespaces {
                cg.line(format!("{ENCODERS_DIR}::{}::register(registry);", artifacts.module));
            }
        },
    );
    cg.into_string()
}

// ————————————————————————————————————————————————————————————————————————————
// SHARED EMISSION CONTEXT
// ————————————————————————————————————————————————————————————————————————————

/// One namespace being emitted, with access to the whole graph.
pub(crate) struct Scope<'a> {
    pub graph: &'a TypeGraph,
    pub options: &'a CodegenOptions,
    pub type_map: &'a TypeMap,
    pub namespace: &'a str,
}

impl Scope<'_> {
    /// `// @generated`, lint allowances, the runtime import, sibling aliases.
    pub fn header(&self, cg: &mut Codegen, nodes: &[&TypeNode], what: &str) {
        cg.line(GENERATED_HEADER);
        cg.line(format!("// {what} for namespace `{}`", self.namespace));
        cg.line(
            "#![allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, unused_mut, unused_variables)]",
        );
        cg.blank();
        cg.line(format!("use {} as rt;", self.options.helper_import));
        for namespace in self.sibling_namespaces(nodes) {
            cg.line(format!(
                "use super::{} as {};",
                naming::module_name(namespace),
                naming::namespace_alias(namespace)
            ));
        }
    }

    /// `pub use <schemas>::<ns>::*;` so decoders/encoders see the declarations.
    pub fn reexport_declarations(&self, cg: &mut Codegen) {
        cg.line(format!(
            "pub use {}::{}::*;",
            self.options.schemas_import,
            naming::module_name(self.namespace)
        ));
    }

    /// Other namespaces whose user-defined types `nodes` reference, sorted.
    fn sibling_namespaces<'g>(&'g self, nodes: &[&'g TypeNode]) -> BTreeSet<&'g str> {
        nodes
            .iter()
            .flat_map(|node| node.original().references())
            .filter_map(|reference| self.user_type(reference))
            .map(|target| target.namespace())
            .filter(|namespace| *namespace != self.namespace)
            .collect()
    }

    /// The node a catalog reference points at, if it is a user-defined
    /// composite, domain or enum. Table row types are treated as opaque.
    pub fn user_type(&self, reference: &TypeRef) -> Option<&TypeNode> {
        self.graph
            .resolve(reference)
            .filter(|target| target.kind() != NodeKind::Table)
    }

    /// `item` as seen from this namespace.
    pub fn qualify(&self, namespace: &str, item: &str) -> String {
        if namespace == self.namespace {
            item.to_string()
        } else {
            format!("{}::{item}", naming::namespace_alias(namespace))
        }
    }

    /// Host type of a scalar reference.
    pub fn host_type(&self, reference: &TypeRef) -> String {
        if let Some(target) = self.user_type(reference) {
            return self.qualify(target.namespace(), &type_ident(target));
        }
        self.type_map
            .get(&reference.namespace, &reference.name)
            .map(str::to_string)
            .unwrap_or_else(|| self.options.fallback_type.clone())
    }

    /// Host type of a field, one `Vec` per array dimension.
    pub fn field_type(&self, field: &Field) -> String {
        let mut ty = self.host_type(&field.type_ref);
        for _ in 0..field.array_dimensions {
            ty = format!("Vec<{ty}>");
        }
        ty
    }

    pub fn decoder_override(&self, reference: &TypeRef) -> Option<&str> {
        self.options
            .decoder_overrides
            .get(&reference.namespace)?
            .get(&reference.name)
            .map(String::as_str)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NAMES
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn type_ident(node: &TypeNode) -> String {
    naming::rust_ident(&naming::sanitize(node.name()))
}

pub(crate) fn field_ident(field: &Field) -> String {
    naming::rust_ident(&field.name)
}

pub(crate) fn decoder_fn(node: &TypeNode) -> String {
    format!("decode_{}", naming::to_snake(&naming::sanitize(node.name())))
}

pub(crate) fn encoder_fn(node: &TypeNode) -> String {
    format!("encode_{}", naming::to_snake(&naming::sanitize(node.name())))
}

/// Variant identifiers for enum labels, disambiguated when two labels
/// sanitise to the same name.
pub(crate) fn enum_variants(values: &[EnumValue]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| {
            let base = naming::rust_ident(&naming::to_upper_camel(&naming::sanitize(&value.name)));
            let mut candidate = base.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                n += 1;
                candidate = format!("{base}{n}");
            }
            candidate
        })
        .collect()
}

/// Rust string literal for `s`.
pub(crate) fn literal(s: &str) -> String {
    format!("{s:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRows, CatalogTypes};
    use crate::graph::{self, Ordering};

    fn fixture() -> Vec<NamespaceArtifacts> {
        let rows = CatalogRows::from_json(include_str!("../fixtures/catalog.json")).unwrap();
        let graph = graph::build(CatalogTypes::from_rows(rows).unwrap(), Ordering::Alphabetical).unwrap();
        emit(&graph, &CodegenOptions::default())
    }

    fn namespace<'a>(artifacts: &'a [NamespaceArtifacts], name: &str) -> &'a NamespaceArtifacts {
        artifacts.iter().find(|a| a.namespace == name).unwrap()
    }

    #[test]
    fn declarations_follow_column_shapes() {
        let artifacts = fixture();
        let public = &namespace(&artifacts, "public").declarations;
        assert!(public.starts_with(GENERATED_HEADER));
        assert!(public.contains("pub type Email = String;"));
        assert!(public.contains("    pub zipCode: i32,\n    pub tags: Vec<String>,\n"));
        assert!(public.contains("    pub id: rt::HasDefault<i32>,\n"));
        assert!(public.contains("    pub address: Option<Address>,\n"));
        assert!(public.contains("    pub previousAddresses: rt::HasDefault<Vec<Address>>,\n"));
        assert!(public.contains("pub const ALL: &'static [Mood] = &[Mood::Happy, Mood::Sad, Mood::InProgress];"));
        assert!(public.contains("    pub users: Vec<Users>,\n"));
        assert!(public.contains(r#"    ("users", "public.users"),"#));

        let billing = &namespace(&artifacts, "billing").declarations;
        assert!(billing.contains("use super::public as ns_public;"));
        assert!(billing.contains("    pub billedTo: ns_public::Person,\n"));
        assert!(billing.contains("    pub issued: rt::chrono::NaiveDate,\n"));
    }

    #[test]
    fn decoders_dispatch_on_type_ids_and_siblings() {
        let artifacts = fixture();
        let public = &namespace(&artifacts, "public").decoders;
        assert!(public.contains("pub use super::super::schemas::public::*;"));
        assert!(public.contains("tags: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(1009, v.take(2))?)?,"));
        assert!(public.contains("moods: rt::decode_array(v.take(2), decode_mood)?,"));
        assert!(public.contains(r#""in progress" => Ok(Mood::InProgress),"#));
        assert!(public.contains(r#"_ => Err(rt::invalid_enum_label("public.mood", label.as_str())),"#));

        let billing = &namespace(&artifacts, "billing").decoders;
        assert!(billing.contains("billedTo: ns_public::decode_person(v.take(1))?,"));
        assert!(billing.contains("id: rt::FromPgValue::from_pg_value(rt::decode_by_type_id(20, v.take(0))?)?,"));
    }

    #[test]
    fn encoders_quote_record_elements_and_register_columns() {
        let artifacts = fixture();
        let public = &namespace(&artifacts, "public").encoders;
        assert!(public.contains("pub fn encode_address(value: &Address) -> Result<String, rt::CodecError> {"));
        assert!(public.contains(
            "        rt::quote_element(rt::encode_nested(&rt::encode_value, 1, &rt::ToPgValue::to_pg_value(&value.tags))?),\n"
        ));
        assert!(public.contains("        rt::quote_element(encode_address(&value.home)?),\n"));
        assert!(public.contains(concat!(
            "    registry.insert(\"public\", \"users\", \"email\", rt::with_cast(|value: &rt::PgValue| {\n",
            "        let v: Email = rt::FromPgValue::from_pg_value(value.clone())?;\n",
            "        rt::encode_scalar(&rt::ToPgValue::to_pg_value(&v))\n",
            "    }, \"public.email\"));\n",
        )));
        assert!(public.contains("        rt::encode_array(&v, encode_address)\n    }, \"public.address[]\"));"));
        assert!(!public.contains(r#""users", "mood""#));

        let billing = &namespace(&artifacts, "billing").encoders;
        assert!(billing.contains("rt::quote_element(ns_public::encode_person(&value.billedTo)?),"));
        assert!(billing.contains("}, \"billing.invoice\"));"));
    }

    #[test]
    fn root_index_registers_every_namespace() {
        let rows = CatalogRows::from_json(include_str!("../fixtures/catalog.json")).unwrap();
        let graph = graph::build(CatalogTypes::from_rows(rows).unwrap(), Ordering::Alphabetical).unwrap();
        let files = emit_files(&graph, &CodegenOptions::default());
        assert_eq!(files.len(), 4 + 2 * 3);
        assert_eq!(files[0].path, PathBuf::from("mod.rs"));
        assert!(files[0].contents.contains(
            "    encoders::public::register(registry);\n    encoders::billing::register(registry);\n"
        ));
        assert!(files.iter().any(|f| f.path == PathBuf::from("decoders").join("billing.rs")));
    }

    #[test]
    fn writer_indents_blocks() {
        let mut cg = Codegen::new();
        cg.block("fn main()", |cg| {
            cg.line("let x = 1;");
            cg.blank();
        });
        assert_eq!(cg.into_string(), "fn main() {\n    let x = 1;\n\n}\n");
    }

    #[test]
    fn enum_variants_are_unique_identifiers() {
        let values: Vec<EnumValue> = ["in progress", "in_progress", "done", "1st", "self"]
            .iter()
            .enumerate()
            .map(|(i, name)| EnumValue { name: name.to_string(), order: i as f64 })
            .collect();
        assert_eq!(enum_variants(&values), ["InProgress", "InProgress2", "Done", "_1st", "Self_"]);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CodegenOptions = serde_json::from_str(r#"{"table_naming": "pascal"}"#).unwrap();
        assert_eq!(options.table_naming, TableNaming::Pascal);
        assert_eq!(options.fallback_type, "rt::PgValue");
    }
}
