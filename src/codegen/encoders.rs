//! `encode_*` functions, `ToPgValue` impls and the column encoder registration.
use super::{Codegen, Scope, encoder_fn, field_ident, literal, type_ident};
use crate::ir::{CompositeType, DomainType, EnumType, Field, Node, NodeKind, TableType, TypeNode, TypeRef};
use crate::naming::sql_ident;

pub(crate) fn emit(scope: &Scope, nodes: &[&TypeNode]) -> String {
    let mut cg = Codegen::new();
    scope.header(&mut cg, nodes, "encoders");
    scope.reexport_declarations(&mut cg);
    for node in nodes {
        match node {
            TypeNode::Composite(n) => composite(scope, &mut cg, node, n),
            TypeNode::Domain(n) => domain(scope, &mut cg, node, n),
            TypeNode::Enum(n) => enumeration(&mut cg, node, n),
            TypeNode::Table(_) => {}
        }
    }
    register(scope, &mut cg, nodes);
    cg.into_string()
}

fn signature(node: &TypeNode) -> String {
    format!(
        "pub fn {}(value: &{}) -> Result<String, rt::CodecError>",
        encoder_fn(node),
        type_ident(node)
    )
}

fn composite(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<CompositeType>) {
    let pairs: Vec<_> = n.rendered.fields.iter().zip(&n.original.fields).collect();
    cg.blank();
    cg.block(signature(node), |cg| {
        cg.wrap("Ok(rt::encode_record(&[", "]))", |cg| {
            for (rendered, original) in &pairs {
                let input = format!("&value.{}", field_ident(rendered));
                cg.line(format!("rt::quote_element({}?),", encode_expr(scope, original, &input)));
            }
        });
    });
    cg.blank();
    cg.block(format!("impl rt::ToPgValue for {}", type_ident(node)), |cg| {
        cg.block("fn to_pg_value(&self) -> rt::PgValue", |cg| {
            if pairs.is_empty() {
                cg.line("rt::PgValue::Record(rt::Record::new())");
                return;
            }
            cg.wrap("rt::PgValue::Record(vec![", "].into_iter().collect())", |cg| {
                for (rendered, _) in &pairs {
                    cg.line(format!("rt::ToPgValue::to_pg_value(&self.{}),", field_ident(rendered)));
                }
            });
        });
    });
}

fn domain(scope: &Scope, cg: &mut Codegen, node: &TypeNode, n: &Node<DomainType>) {
    let underlying = Field {
        name: String::new(),
        type_ref: n.original.underlying.clone(),
        array_dimensions: 0,
    };
    cg.blank();
    cg.block(signature(node), |cg| {
        cg.line(encode_expr(scope, &underlying, "value"));
    });
}

fn enumeration(cg: &mut Codegen, node: &TypeNode, _n: &Node<EnumType>) {
    cg.blank();
    cg.block(format!("impl rt::ToPgValue for {}", type_ident(node)), |cg| {
        cg.block("fn to_pg_value(&self) -> rt::PgValue", |cg| {
            cg.line("rt::PgValue::Text(self.as_str().to_string())");
        });
    });
}

/// Expression of type `Result<String, rt::CodecError>` encoding `input`
/// (a reference to `field`'s host type).
pub(crate) fn encode_expr(scope: &Scope, field: &Field, input: &str) -> String {
    let dims = field.array_dimensions as usize;
    let callable = encodable_type(scope, &field.type_ref)
        .map(|target| scope.qualify(target.namespace(), &encoder_fn(target)));

    match callable {
        Some(callable) if dims == 0 => format!("{callable}({input})"),
        Some(callable) => {
            let mut expr = format!("rt::encode_array(x, {callable})");
            for _ in 1..dims {
                expr = format!("rt::encode_outer_array(x, |x| {expr})");
            }
            // the outermost level reads `input` instead of the closure argument
            expr.replacen("(x,", &format!("({input},"), 1)
        }
        None if dims == 0 => format!("rt::encode_value(&rt::ToPgValue::to_pg_value({input}))"),
        None => format!("rt::encode_nested(&rt::encode_value, {dims}, &rt::ToPgValue::to_pg_value({input}))"),
    }
}

/// Composites and domains have their own encode function; enums encode as
/// their label.
fn encodable_type<'s>(scope: &'s Scope, reference: &TypeRef) -> Option<&'s TypeNode> {
    scope
        .user_type(reference)
        .filter(|target| matches!(target.kind(), NodeKind::Composite | NodeKind::Domain))
}

/// A domain that bottoms out in a built-in or enum type. As a whole column
/// its literal is the bare scalar, not the quoted element form.
fn scalar_domain(scope: &Scope, reference: &TypeRef) -> bool {
    let mut target = scope.user_type(reference);
    if !matches!(target, Some(TypeNode::Domain(_))) {
        return false;
    }
    for _ in 0..=scope.graph.len() {
        match target {
            Some(TypeNode::Domain(n)) => target = scope.user_type(&n.original.underlying),
            _ => break,
        }
    }
    !matches!(target, Some(TypeNode::Composite(_)))
}

/// `schema.type` plus `[]` per dimension, as the database spells it.
fn cast_type(field: &Field) -> String {
    let mut cast = format!("{}.{}", sql_ident(&field.type_ref.namespace), sql_ident(&field.type_ref.name));
    for _ in 0..field.array_dimensions {
        cast.push_str("[]");
    }
    cast
}

/// Column encoders for every table column of a composite or domain type,
/// keyed by the catalog's table and column names.
fn register(scope: &Scope, cg: &mut Codegen, nodes: &[&TypeNode]) {
    let tables: Vec<&Node<TableType>> = nodes
        .iter()
        .filter_map(|node| match node {
            TypeNode::Table(n) => Some(n),
            _ => None,
        })
        .collect();

    cg.blank();
    cg.line("/// Column encoders for columns of composite or domain type.");
    cg.block("pub fn register(registry: &mut rt::EncoderRegistry)", |cg| {
        for table in tables {
            for column in &table.original.columns {
                let field = &column.field;
                if encodable_type(scope, &field.type_ref).is_none() {
                    continue;
                }
                let body = if field.array_dimensions == 0 && scalar_domain(scope, &field.type_ref) {
                    "rt::encode_scalar(&rt::ToPgValue::to_pg_value(&v))".to_string()
                } else {
                    encode_expr(scope, field, "&v")
                };
                cg.wrap(
                    format!(
                        "registry.insert({}, {}, {}, rt::with_cast(|value: &rt::PgValue| {{",
                        literal(&table.original.namespace),
                        literal(&table.original.name),
                        literal(&field.name)
                    ),
                    &format!("}}, {}));", literal(&cast_type(field))),
                    |cg| {
                        cg.line(format!(
                            "let v: {} = rt::FromPgValue::from_pg_value(value.clone())?;",
                            scope.field_type(field)
                        ));
                        cg.line(body);
                    },
                );
            }
        }
    });
}
