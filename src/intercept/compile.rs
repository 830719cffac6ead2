//! Render the query IR as SQL text with `$n` bind placeholders.
use super::InterceptError;
use super::query::{
    ColumnRef, DeleteQuery, Expr, InsertQuery, InsertSource, Join, JoinKind, Query, SelectQuery, TableExpr,
    TableName, UpdateQuery,
};
use crate::codec::PgValue;
use crate::naming::sql_ident;

/// SQL text plus the values bound to `$1`, `$2`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<PgValue>,
}

pub fn compile(query: &Query) -> Result<CompiledQuery, InterceptError> {
    let mut w = SqlWriter::default();
    match query {
        Query::Select(select) => w.select(select),
        Query::Insert(insert) => w.insert(insert)?,
        Query::Update(update) => w.update(update),
        Query::Delete(delete) => w.delete(delete),
    }
    Ok(CompiledQuery { sql: w.sql, params: w.params })
}

#[derive(Default)]
struct SqlWriter {
    sql: String,
    params: Vec<PgValue>,
}

impl SqlWriter {
    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn bind(&mut self, value: &PgValue) {
        self.params.push(value.clone());
        let placeholder = format!("${}", self.params.len());
        self.push(&placeholder);
    }

    fn list<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            each(self, item);
        }
    }

    // ————————————————————————————————————————————————————————————————————————
    // STATEMENTS
    // ————————————————————————————————————————————————————————————————————————

    fn select(&mut self, select: &SelectQuery) {
        self.push("SELECT ");
        if select.columns.is_empty() {
            self.push("*");
        } else {
            self.list(&select.columns, |w, column| w.expr(column));
        }
        if !select.from.is_empty() {
            self.push(" FROM ");
            self.list(&select.from, |w, table| w.table_expr(table));
        }
        for join in &select.joins {
            self.join(join);
        }
        self.where_clause(select.where_clause.as_ref());
    }

    fn insert(&mut self, insert: &InsertQuery) -> Result<(), InterceptError> {
        let into = insert
            .into
            .as_ref()
            .ok_or_else(|| InterceptError::Context("insert without a target table".to_string()))?;
        self.push("INSERT INTO ");
        self.table_expr(into);
        if !insert.columns.is_empty() {
            self.push(" (");
            self.list(&insert.columns, |w, column| w.push(&sql_ident(column)));
            self.push(")");
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                self.push(" VALUES ");
                self.list(rows, |w, row| {
                    w.push("(");
                    w.list(row, |w, cell| w.expr(cell));
                    w.push(")");
                });
            }
            InsertSource::Select(select) => {
                self.push(" ");
                self.select(select);
            }
        }
        Ok(())
    }

    fn update(&mut self, update: &UpdateQuery) {
        self.push("UPDATE ");
        self.table_expr(&update.table);
        self.push(" SET ");
        self.list(&update.set, |w, assignment| {
            w.push(&sql_ident(&assignment.column));
            w.push(" = ");
            w.expr(&assignment.value);
        });
        if !update.from.is_empty() {
            self.push(" FROM ");
            self.list(&update.from, |w, table| w.table_expr(table));
        }
        self.where_clause(update.where_clause.as_ref());
    }

    fn delete(&mut self, delete: &DeleteQuery) {
        self.push("DELETE FROM ");
        self.table_expr(&delete.from);
        if !delete.using.is_empty() {
            self.push(" USING ");
            self.list(&delete.using, |w, table| w.table_expr(table));
        }
        self.where_clause(delete.where_clause.as_ref());
    }

    // ————————————————————————————————————————————————————————————————————————
    // CLAUSES
    // ————————————————————————————————————————————————————————————————————————

    fn table_name(&mut self, table: &TableName) {
        if let Some(schema) = &table.schema {
            self.push(&sql_ident(schema));
            self.push(".");
        }
        self.push(&sql_ident(&table.name));
    }

    fn table_expr(&mut self, table: &TableExpr) {
        self.table_name(&table.table);
        if let Some(alias) = &table.alias {
            self.push(" AS ");
            self.push(&sql_ident(alias));
        }
    }

    fn join(&mut self, join: &Join) {
        self.push(match join.kind {
            JoinKind::Inner => " JOIN ",
            JoinKind::Left => " LEFT JOIN ",
            JoinKind::Right => " RIGHT JOIN ",
            JoinKind::Full => " FULL JOIN ",
        });
        self.table_expr(&join.table);
        self.push(" ON ");
        self.expr(&join.on);
    }

    fn where_clause(&mut self, clause: Option<&Expr>) {
        if let Some(expr) = clause {
            self.push(" WHERE ");
            self.expr(expr);
        }
    }

    fn column(&mut self, column: &ColumnRef) {
        if let Some(table) = &column.table {
            self.table_name(table);
            self.push(".");
        }
        self.push(&sql_ident(&column.column));
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Reference(column) => self.column(column),
            Expr::Value(PgValue::Null) => self.push("NULL"),
            Expr::Value(value) => self.bind(value),
            Expr::ValueList(values) => {
                self.push("(");
                self.list(values, |w, value| w.bind(value));
                self.push(")");
            }
            Expr::Raw(raw) => self.push(raw),
            Expr::RawList(raws) => {
                self.push("(");
                self.list(raws, |w, raw| w.push(raw));
                self.push(")");
            }
            Expr::Binary { left, op, right } => {
                self.operand(left, op.is_logical());
                self.push(" ");
                self.push(op.as_sql());
                self.push(" ");
                self.operand(right, op.is_logical());
            }
        }
    }

    /// Logical operands that are themselves logical get parenthesised.
    fn operand(&mut self, expr: &Expr, parent_is_logical: bool) {
        let nested_logical = matches!(expr, Expr::Binary { op, .. } if op.is_logical());
        if parent_is_logical && nested_logical {
            self.push("(");
            self.expr(expr);
            self.push(")");
        } else {
            self.expr(expr);
        }
    }
}
