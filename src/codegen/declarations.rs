//! Type declarations: structs for composites and tables, enums, domain aliases,
//! and the per-namespace table aggregate.
use super::{Codegen, Scope, enum_variants, field_ident, literal, type_ident};
use crate::naming;
use crate::ir::{Column, CompositeType, DomainType, EnumType, Node, TableType, TypeNode};

pub(crate) fn emit(scope: &Scope, nodes: &[&TypeNode]) -> String {
    let mut cg = Codegen::new();
    scope.header(&mut cg, nodes, "declarations");
    for node in nodes {
        cg.blank();
        match node {
            TypeNode::Composite(n) => composite(scope, &mut cg, node, n),
            TypeNode::Domain(n) => domain(scope, &mut cg, node, n),
            TypeNode::Enum(n) => enumeration(&mut cg, node, n),
            TypeNode::Table(n) => table(scope, &mut cg, node, n),
        }
    }
    database(scope, &mut cg, nodes);
    cg.into_string()
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn doc_key(cg: &mut Codegen, node: &TypeNode) {
    cg.line(format!("/// `{}`", node.key()));
}

fn composite(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<CompositeType>) {
    doc_key(cg, node);
    cg.line("#[derive(Debug, Clone, PartialEq)]");
    cg.block(format!("pub struct {}", type_ident(node)), |cg| {
        for (rendered, original) in n.rendered.fields.iter().zip(&n.original.fields) {
            cg.line(format!("pub {}: {},", field_ident(rendered), scope.field_type(original)));
        }
    });
}

fn domain(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<DomainType>) {
    doc_key(cg, node);
    if let Some(constraint) = &n.original.constraint {
        cg.line("///");
        cg.line(format!("/// `{}`", one_line(constraint)));
    }
    cg.line(format!("pub type {} = {};", type_ident(node), scope.host_type(&n.original.underlying)));
}

fn enumeration(cg: &mut Codegen, node: &TypeNode, n: &Node<EnumType>) {
    let name = type_ident(node);
    let variants = enum_variants(&n.original.values);

    doc_key(cg, node);
    cg.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    cg.block(format!("pub enum {name}"), |cg| {
        for variant in &variants {
            cg.line(format!("{variant},"));
        }
    });
    cg.blank();
    cg.block(format!("impl {name}"), |cg| {
        let all: Vec<String> = variants.iter().map(|v| format!("{name}::{v}")).collect();
        cg.line(format!("pub const ALL: &'static [{name}] = &[{}];", all.join(", ")));
        cg.blank();
        cg.line("/// The catalog label.");
        cg.block("pub fn as_str(&self) -> &'static str", |cg| {
            cg.block("match *self", |cg| {
                for (variant, value) in variants.iter().zip(&n.original.values) {
                    cg.line(format!("{name}::{variant} => {},", literal(&value.name)));
                }
            });
        });
    });
}

/// Nullable wraps the mapped type, a default wraps that.
fn column_type(scope: &Scope, original: &Column) -> String {
    let mut ty = scope.field_type(&original.field);
    if original.nullable {
        ty = format!("Option<{ty}>");
    }
    if original.default_expr.is_some() {
        ty = format!("rt::HasDefault<{ty}>");
    }
    ty
}

fn table(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<TableType>) {
    let name = type_ident(node);
    doc_key(cg, node);
    cg.line("#[derive(Debug, Clone, PartialEq)]");
    cg.block(format!("pub struct {name}"), |cg| {
        for (rendered, original) in n.rendered.columns.iter().zip(&n.original.columns) {
            if let Some(default) = &original.default_expr {
                cg.line(format!("/// default `{}`", one_line(default)));
            }
            cg.line(format!("pub {}: {},", field_ident(&rendered.field), column_type(scope, original)));
        }
    });
    cg.blank();
    cg.block(format!("impl rt::Table for {name}"), |cg| {
        let member = scope.options.table_naming.apply(&n.original.name);
        cg.line(format!("const NAME: &'static str = {};", literal(&member)));
        cg.line(format!("const NAMESPACED_NAME: &'static str = {};", literal(&node.key())));
    });
}

/// One member per table named by the configured convention, plus a
/// `TABLES` list keyed by `namespace.table`.
fn database(scope: &Scope, cg: &mut Codegen, nodes: &[&TypeNode]) {
    let tables: Vec<(&TypeNode, String)> = nodes
        .iter()
        .filter_map(|node| match node {
            TypeNode::Table(n) => Some((*node, scope.options.table_naming.apply(&n.original.name))),
            _ => None,
        })
        .collect();
    if tables.is_empty() {
        return;
    }

    cg.blank();
    cg.line(format!("/// Tables of `{}`.", scope.namespace));
    cg.line("#[derive(Debug, Clone, Default, PartialEq)]");
    cg.block(format!("pub struct {}", scope.options.database_struct), |cg| {
        for (node, member) in &tables {
            cg.line(format!("pub {}: Vec<{}>,", naming::rust_ident(member), type_ident(node)));
        }
    });
    cg.blank();
    cg.line("/// `(member, \"namespace.table\")` for every table above.");
    cg.wrap("pub const TABLES: &[(&str, &str)] = &[", "];", |cg| {
        for (node, member) in &tables {
            cg.line(format!("({}, {}),", literal(member), literal(&node.key())));
        }
    });
}
