//! Closed query IR the interceptor walks and `compile` renders.
use crate::codec::PgValue;

// ————————————————————————————————————————————————————————————————————————————
// QUERIES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub columns: Vec<Expr>,             // empty selects `*`
    pub from: Vec<TableExpr>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub into: Option<TableExpr>,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),             // one row per entry, positional by `columns`
    Select(Box<SelectQuery>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub table: TableExpr,
    pub from: Vec<TableExpr>,
    pub set: Vec<ColumnUpdate>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUpdate {
    pub column: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub from: TableExpr,
    pub using: Vec<TableExpr>,
    pub where_clause: Option<Expr>,
}

// ————————————————————————————————————————————————————————————————————————————
// TABLES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

/// A table in a FROM / JOIN / target position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExpr {
    pub table: TableName,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableExpr,
    pub on: Expr,
}

// ————————————————————————————————————————————————————————————————————————————
// EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// `column` or `table.column`; `table` may name an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<TableName>,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Reference(ColumnRef),
    /// Sent as a bind parameter.
    Value(PgValue),
    ValueList(Vec<PgValue>),
    /// Spliced into the SQL text verbatim.
    Raw(String),
    RawList(Vec<String>),
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Like,
    And,
    Or,
}

impl BinaryOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::In => "IN",
            BinaryOperator::NotIn => "NOT IN",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        TableName { schema: None, name: name.into() }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        TableName { schema: Some(schema.into()), name: name.into() }
    }
}

impl TableExpr {
    pub fn new(table: TableName) -> Self {
        TableExpr { table, alias: None }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<TableName> for TableExpr {
    fn from(table: TableName) -> Self {
        TableExpr::new(table)
    }
}

impl Expr {
    pub fn column(column: impl Into<String>) -> Self {
        Expr::Reference(ColumnRef { table: None, column: column.into() })
    }

    /// `table.column`, where `table` is a table name or alias.
    pub fn qualified_column(table: TableName, column: impl Into<String>) -> Self {
        Expr::Reference(ColumnRef { table: Some(table), column: column.into() })
    }

    pub fn value(value: impl Into<PgValue>) -> Self {
        Expr::Value(value.into())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn eq(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn in_list(self, values: Vec<PgValue>) -> Self {
        Expr::binary(self, BinaryOperator::In, Expr::ValueList(values))
    }

    pub fn and(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::And, right)
    }

    pub fn or(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Or, right)
    }
}

impl SelectQuery {
    pub fn from(table: impl Into<TableExpr>) -> Self {
        SelectQuery { from: vec![table.into()], ..SelectQuery::default() }
    }

    pub fn join(mut self, kind: JoinKind, table: impl Into<TableExpr>, on: Expr) -> Self {
        self.joins.push(Join { kind, table: table.into(), on });
        self
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }
}

impl UpdateQuery {
    pub fn new(table: impl Into<TableExpr>) -> Self {
        UpdateQuery { table: table.into(), from: Vec::new(), set: Vec::new(), where_clause: None }
    }

    pub fn set(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.set.push(ColumnUpdate { column: column.into(), value });
        self
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }
}

impl InsertQuery {
    pub fn values(table: impl Into<TableExpr>, columns: &[&str], rows: Vec<Vec<Expr>>) -> Self {
        InsertQuery {
            into: Some(table.into()),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            source: InsertSource::Values(rows),
        }
    }
}

impl DeleteQuery {
    pub fn new(table: impl Into<TableExpr>) -> Self {
        DeleteQuery { from: table.into(), using: Vec::new(), where_clause: None }
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }
}
