//! Type-graph construction: host renaming, dependency tracking, ordering.
//!
//! Every node keeps the catalog spelling in `original` and gets a renamed
//! copy in `rendered`:
//! - type names become word-capitalised (`user_address` → `UserAddress`),
//! - field and column names become lower camel (`zip_code` → `zipCode`),
//! - references to user-defined types take the referenced type's new name;
//!   built-in references keep the catalog name.
use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogTypes};
use crate::ir::{
    Column, CompositeType, DomainType, EnumType, Field, Node, TableType, TypeDef, TypeGraph, TypeNode, TypeRef,
};
use crate::naming::{to_lower_camel, to_upper_camel};

/// Node order of the built graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    /// Stable sort by rendered name.
    #[default]
    Alphabetical,
    /// Dependencies before dependents; back-edges of a cycle are skipped.
    Topological,
    /// Like `Topological`, but a cycle is a [`CatalogError::CyclicDependency`].
    TopologicalStrict,
}

pub fn build(types: CatalogTypes, ordering: Ordering) -> Result<TypeGraph, CatalogError> {
    // 1) index the catalog spellings
    let mut known: HashSet<(String, String)> = HashSet::new();
    {
        let defs = types
            .composites
            .iter()
            .map(|d| d as &dyn TypeDef)
            .chain(types.domains.iter().map(|d| d as &dyn TypeDef))
            .chain(types.enums.iter().map(|d| d as &dyn TypeDef))
            .chain(types.tables.iter().map(|d| d as &dyn TypeDef));
        for def in defs {
            if def.namespace().is_empty() {
                return Err(CatalogError::MissingNamespace { what: format!("type {}", def.name()) });
            }
            for reference in def.references() {
                if reference.namespace.is_empty() {
                    return Err(CatalogError::MissingNamespace {
                        what: format!("reference {} on {}.{}", reference.name, def.namespace(), def.name()),
                    });
                }
            }
            if !known.insert((def.namespace().to_string(), def.name().to_string())) {
                return Err(CatalogError::DuplicateType {
                    key: format!("{}.{}", def.namespace(), def.name()),
                });
            }
        }
    }

    // 2) render
    let renderer = Renderer {
        known: &known,
        track_dependencies: ordering != Ordering::Alphabetical,
    };
    let mut nodes = Vec::with_capacity(known.len());
    nodes.extend(types.composites.into_iter().map(|t| TypeNode::Composite(renderer.composite(t))));
    nodes.extend(types.domains.into_iter().map(|t| TypeNode::Domain(renderer.domain(t))));
    nodes.extend(types.enums.into_iter().map(|t| TypeNode::Enum(renderer.enumeration(t))));
    nodes.extend(types.tables.into_iter().map(|t| TypeNode::Table(renderer.table(t))));

    // 3) order
    nodes.sort_by(|a, b| a.name().cmp(b.name()));
    let nodes = match ordering {
        Ordering::Alphabetical => nodes,
        Ordering::Topological => topological(nodes, false)?,
        Ordering::TopologicalStrict => topological(nodes, true)?,
    };

    debug!(nodes = nodes.len(), ?ordering, "built type graph");
    Ok(TypeGraph { nodes })
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

struct Renderer<'a> {
    known: &'a HashSet<(String, String)>,
    track_dependencies: bool,
}

impl Renderer<'_> {
    fn type_ref(&self, reference: &TypeRef, owner: &str, dependencies: &mut BTreeSet<String>) -> TypeRef {
        let user_defined = self
            .known
            .contains(&(reference.namespace.clone(), reference.name.clone()));
        if !user_defined {
            return reference.clone();
        }
        let key = reference.key();
        if self.track_dependencies && key != owner {
            dependencies.insert(key);
        }
        TypeRef {
            name: to_upper_camel(&reference.name),
            ..reference.clone()
        }
    }

    fn field(&self, field: &Field, owner: &str, dependencies: &mut BTreeSet<String>) -> Field {
        Field {
            name: to_lower_camel(&field.name),
            type_ref: self.type_ref(&field.type_ref, owner, dependencies),
            array_dimensions: field.array_dimensions,
        }
    }

    fn composite(&self, original: CompositeType) -> Node<CompositeType> {
        let owner = format!("{}.{}", original.namespace, original.name);
        let mut dependencies = BTreeSet::new();
        let rendered = CompositeType {
            namespace: original.namespace.clone(),
            name: to_upper_camel(&original.name),
            fields: original
                .fields
                .iter()
                .map(|f| self.field(f, &owner, &mut dependencies))
                .collect(),
        };
        Node { original, rendered, dependencies }
    }

    fn domain(&self, original: DomainType) -> Node<DomainType> {
        let owner = format!("{}.{}", original.namespace, original.name);
        let mut dependencies = BTreeSet::new();
        let rendered = DomainType {
            namespace: original.namespace.clone(),
            name: to_upper_camel(&original.name),
            underlying: self.type_ref(&original.underlying, &owner, &mut dependencies),
            constraint: original.constraint.clone(),
        };
        Node { original, rendered, dependencies }
    }

    fn enumeration(&self, original: EnumType) -> Node<EnumType> {
        let rendered = EnumType {
            namespace: original.namespace.clone(),
            name: to_upper_camel(&original.name),
            values: original.values.clone(),
        };
        Node { original, rendered, dependencies: BTreeSet::new() }
    }

    fn table(&self, original: TableType) -> Node<TableType> {
        let owner = format!("{}.{}", original.namespace, original.name);
        let mut dependencies = BTreeSet::new();
        let rendered = TableType {
            namespace: original.namespace.clone(),
            name: to_upper_camel(&original.name),
            columns: original
                .columns
                .iter()
                .map(|c| Column {
                    field: self.field(&c.field, &owner, &mut dependencies),
                    nullable: c.nullable,
                    default_expr: c.default_expr.clone(),
                })
                .collect(),
        };
        Node { original, rendered, dependencies }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TOPOLOGICAL ORDER
// ————————————————————————————————————————————————————————————————————————————

/// Depth-first, roots in the incoming (alphabetical) order, dependencies in
/// key order, so the result is deterministic.
fn topological(nodes: Vec<TypeNode>, strict: bool) -> Result<Vec<TypeNode>, CatalogError> {
    let order = {
        let mut search = Search {
            nodes: &nodes,
            index: nodes.iter().enumerate().map(|(i, n)| (n.key(), i)).collect(),
            path: Vec::new(),
            on_path: vec![false; nodes.len()],
            done: vec![false; nodes.len()],
            order: Vec::with_capacity(nodes.len()),
            strict,
        };
        for idx in 0..nodes.len() {
            search.visit(idx)?;
        }
        search.order
    };
    let mut slots: Vec<Option<TypeNode>> = nodes.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|idx| slots[idx].take()).collect())
}

struct Search<'a> {
    nodes: &'a [TypeNode],
    index: HashMap<String, usize>,
    path: Vec<usize>,
    on_path: Vec<bool>,   // "visiting"
    done: Vec<bool>,
    order: Vec<usize>,
    strict: bool,
}

impl Search<'_> {
    fn visit(&mut self, idx: usize) -> Result<(), CatalogError> {
        if self.done[idx] {
            return Ok(());
        }
        let nodes = self.nodes;
        self.path.push(idx);
        self.on_path[idx] = true;

        for dependency in nodes[idx].dependencies() {
            let Some(&next) = self.index.get(dependency) else {
                continue;
            };
            if self.on_path[next] {
                if self.strict {
                    let start = self.path.iter().position(|&i| i == next).unwrap_or(0);
                    let mut cycle: Vec<String> = self.path[start..].iter().map(|&i| nodes[i].key()).collect();
                    cycle.push(nodes[next].key());
                    return Err(CatalogError::CyclicDependency { path: cycle });
                }
                warn!(from = %nodes[idx].key(), to = %dependency, "skipping cyclic type dependency");
                continue;
            }
            self.visit(next)?;
        }

        self.path.pop();
        self.on_path[idx] = false;
        self.done[idx] = true;
        self.order.push(idx);
        Ok(())
    }
}
