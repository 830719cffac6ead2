//! `decode_*` functions: generic text value → declared type.
use super::{Codegen, Scope, decoder_fn, enum_variants, field_ident, literal, type_ident};
use crate::codec::oid;
use crate::ir::{CompositeType, DomainType, EnumType, Field, Node, TypeNode};

pub(crate) fn emit(scope: &Scope, nodes: &[&TypeNode]) -> String {
    let mut cg = Codegen::new();
    scope.header(&mut cg, nodes, "decoders");
    scope.reexport_declarations(&mut cg);
    for node in nodes {
        match node {
            TypeNode::Composite(n) => composite(scope, &mut cg, node, n),
            TypeNode::Domain(n) => domain(scope, &mut cg, node, n),
            TypeNode::Enum(n) => enumeration(&mut cg, node, n),
            TypeNode::Table(_) => {}
        }
    }
    cg.into_string()
}

fn signature(node: &TypeNode) -> String {
    format!(
        "pub fn {}(value: rt::PgValue) -> Result<{}, rt::CodecError>",
        decoder_fn(node),
        type_ident(node)
    )
}

fn from_pg_value_impl(cg: &mut Codegen, node: &TypeNode) {
    cg.blank();
    cg.block(format!("impl rt::FromPgValue for {}", type_ident(node)), |cg| {
        cg.block("fn from_pg_value(value: rt::PgValue) -> Result<Self, rt::CodecError>", |cg| {
            cg.line(format!("{}(value)", decoder_fn(node)));
        });
    });
}

/// Attributes by ordinal position out of the indexed container.
fn composite(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<CompositeType>) {
    cg.blank();
    cg.block(signature(node), |cg| {
        cg.line("let mut v = rt::expect_indexed(value)?;");
        cg.wrap(format!("Ok({} {{", type_ident(node)), "})", |cg| {
            for (position, (rendered, original)) in n.rendered.fields.iter().zip(&n.original.fields).enumerate() {
                let input = format!("v.take({position})");
                cg.line(format!("{}: {},", field_ident(rendered), decode_expr(scope, original, &input)));
            }
        });
    });
    from_pg_value_impl(cg, node);
}

fn domain(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<DomainType>) {
    let underlying = Field {
        name: String::new(),
        type_ref: n.original.underlying.clone(),
        array_dimensions: 0,
    };
    cg.blank();
    cg.block(signature(node), |cg| {
        cg.line(format!("Ok({})", decode_expr(scope, &underlying, "value")));
    });
}

/// Membership check against the declared labels.
fn enumeration(cg: &mut Codegen, node: &TypeNode, n: &Node<EnumType>) {
    let name = type_ident(node);
    let variants = enum_variants(&n.original.values);
    cg.blank();
    cg.block(signature(node), |cg| {
        cg.line("let label: String = rt::FromPgValue::from_pg_value(value)?;");
        cg.block("match label.as_str()", |cg| {
            for (variant, value) in variants.iter().zip(&n.original.values) {
                cg.line(format!("{} => Ok({name}::{variant}),", literal(&value.name)));
            }
            cg.line(format!(
                "_ => Err(rt::invalid_enum_label({}, label.as_str())),",
                literal(&node.key())
            ));
        });
    });
    from_pg_value_impl(cg, node);
}

/// Expression decoding `input` (a `rt::PgValue`) as `field`'s host type.
///
/// User-defined and overridden types go through a decode function, one
/// `decode_array` per dimension. Built-ins dispatch on their type
/// identifier. Arrays of built-ins go through their array identifier when
/// it is known, so element text is kept as the database wrote it; otherwise
/// leaves are decoded with the element identifier.
pub(crate) fn decode_expr(scope: &Scope, field: &Field, input: &str) -> String {
    let reference = &field.type_ref;
    let dims = field.array_dimensions;

    let callable = match scope.decoder_override(reference) {
        Some(path) => Some(path.to_string()),
        None => scope
            .user_type(reference)
            .map(|target| scope.qualify(target.namespace(), &decoder_fn(target))),
    };

    match callable {
        Some(callable) if dims == 0 => format!("{callable}({input})?"),
        Some(callable) => {
            let mut item = callable;
            for _ in 1..dims {
                item = format!("|x| rt::decode_array(x, {item})");
            }
            format!("rt::decode_array({input}, {item})?")
        }
        None if dims == 0 => format!(
            "rt::FromPgValue::from_pg_value(rt::decode_by_type_id({}, {input})?)?",
            reference.type_id
        ),
        None if matches!(oid::classify(reference.type_id), Some(oid::TypeClass::Array(_))) => format!(
            "rt::FromPgValue::from_pg_value(rt::decode_by_type_id({}, {input})?)?",
            reference.type_id
        ),
        None => format!(
            "rt::FromPgValue::from_pg_value(rt::decode_nested(&|x| rt::decode_by_type_id({}, x), rt::PgValue::Array(rt::expect_array({input})?))?)?",
            oid::element_type_id(reference.type_id)
        ),
    }
}
