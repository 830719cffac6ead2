//! Typed model of the catalog: the four kinds of user-defined type and the
//! graph the emitter walks.
use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

// ————————————————————————————————————————————————————————————————————————————
// REFERENCES & MEMBERS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub namespace: String,
    pub name: String,
    pub type_id: u32,        // built-in decoder dispatch key
}

impl TypeRef {
    /// `namespace.name`, the dependency key format.
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub array_dimensions: u32,   // 0 = scalar
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub field: Field,
    pub nullable: bool,
    pub default_expr: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub order: f64,
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE DEFINITIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub namespace: String,
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainType {
    pub namespace: String,
    pub name: String,
    pub underlying: TypeRef,
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub namespace: String,
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableType {
    pub namespace: String,
    pub name: String,
    pub columns: Vec<Column>,
}

/// Common surface over the four definitions.
pub trait TypeDef {
    fn namespace(&self) -> &str;
    fn name(&self) -> &str;
    /// Every type this definition points at, in declaration order.
    fn references(&self) -> Vec<&TypeRef>;
}

macro_rules! type_def {
    ($ty:ty, |$this:ident| $refs:expr) => {
        impl TypeDef for $ty {
            fn namespace(&self) -> &str {
                &self.namespace
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn references(&self) -> Vec<&TypeRef> {
                let $this = self;
                $refs
            }
        }
    };
}

type_def!(CompositeType, |this| this.fields.iter().map(|f| &f.type_ref).collect());
type_def!(DomainType, |this| vec![&this.underlying]);
type_def!(EnumType, |_this| Vec::new());
type_def!(TableType, |this| this.columns.iter().map(|c| &c.field.type_ref).collect());

// ————————————————————————————————————————————————————————————————————————————
// GRAPH
// ————————————————————————————————————————————————————————————————————————————

/// One type in two views: the catalog's spelling and the host spelling.
///
/// Both are fixed once the graph is built. `dependencies` holds
/// `namespace.originalName` keys and is only filled for topological builds.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub original: T,
    pub rendered: T,
    pub dependencies: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Composite(Node<CompositeType>),
    Domain(Node<DomainType>),
    Enum(Node<EnumType>),
    Table(Node<TableType>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Composite,
    Domain,
    Enum,
    Table,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Composite => "composite",
            NodeKind::Domain => "domain",
            NodeKind::Enum => "enum",
            NodeKind::Table => "table",
        })
    }
}

impl TypeNode {
    fn parts(&self) -> (&dyn TypeDef, &dyn TypeDef, &BTreeSet<String>) {
        match self {
            TypeNode::Composite(n) => (&n.original, &n.rendered, &n.dependencies),
            TypeNode::Domain(n) => (&n.original, &n.rendered, &n.dependencies),
            TypeNode::Enum(n) => (&n.original, &n.rendered, &n.dependencies),
            TypeNode::Table(n) => (&n.original, &n.rendered, &n.dependencies),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TypeNode::Composite(_) => NodeKind::Composite,
            TypeNode::Domain(_) => NodeKind::Domain,
            TypeNode::Enum(_) => NodeKind::Enum,
            TypeNode::Table(_) => NodeKind::Table,
        }
    }

    pub fn namespace(&self) -> &str {
        self.parts().0.namespace()
    }

    /// Host spelling.
    pub fn name(&self) -> &str {
        self.parts().1.name()
    }

    /// Catalog spelling.
    pub fn original_name(&self) -> &str {
        self.parts().0.name()
    }

    /// `namespace.originalName`
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace(), self.original_name())
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        self.parts().2
    }

    pub fn original(&self) -> &dyn TypeDef {
        self.parts().0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeGraph {
    pub nodes: Vec<TypeNode>,
}

impl TypeGraph {
    /// Node owning the catalog type `namespace.name`, if it is user-defined.
    pub fn lookup(&self, namespace: &str, original_name: &str) -> Option<&TypeNode> {
        self.nodes
            .iter()
            .find(|n| n.namespace() == namespace && n.original_name() == original_name)
    }

    /// Like [`lookup`](Self::lookup), keyed by a catalog-spelled reference.
    pub fn resolve(&self, reference: &TypeRef) -> Option<&TypeNode> {
        self.lookup(&reference.namespace, &reference.name)
    }

    /// Nodes grouped by namespace, first-seen namespace order, graph order within.
    pub fn by_namespace(&self) -> IndexMap<&str, Vec<&TypeNode>> {
        let mut groups: IndexMap<&str, Vec<&TypeNode>> = IndexMap::new();
        for node in &self.nodes {
            groups.entry(node.namespace()).or_default().push(node);
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
