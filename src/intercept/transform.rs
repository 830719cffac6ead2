//! The rewriting pass: literal values bound for composite or domain columns
//! are replaced with their text encoding.
//!
//! Each pass starts from an empty table context. SELECT and DELETE fill it
//! from their source and join tables, UPDATE from its target (and `FROM`,
//! for WHERE only), INSERT from its target. A WHERE comparison is rewritten when its left
//! operand resolves through that context to a column with a registered
//! encoder; the right operand becomes a cast literal. UPDATE assignments and
//! INSERT rows are encoded without the cast.
use std::sync::Arc;

use tracing::trace;

use super::query::{
    ColumnRef, ColumnUpdate, DeleteQuery, Expr, InsertQuery, InsertSource, Query, SelectQuery, TableExpr,
    UpdateQuery,
};
use super::registry::{DEFAULT_NAMESPACE, EncoderRegistry};
use super::{InterceptError, QueryPlugin};
use crate::codec::{ColumnEncoder, PgValue};

#[derive(Debug, Clone)]
pub struct ValueInterceptor {
    registry: Arc<EncoderRegistry>,
    tables: Vec<TableExpr>,
}

/// A column reference resolved against the table context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub namespace: Option<String>,
    pub table: String,
    pub column: String,
}

impl ValueInterceptor {
    pub fn new(registry: Arc<EncoderRegistry>) -> Self {
        ValueInterceptor { registry, tables: Vec::new() }
    }

    /// Rewrite one query. Table context from a previous pass is discarded.
    pub fn rewrite(&mut self, query: Query) -> Result<Query, InterceptError> {
        self.tables.clear();
        match query {
            Query::Select(select) => self.select(select).map(Query::Select),
            Query::Insert(insert) => self.insert(insert).map(Query::Insert),
            Query::Update(update) => self.update(update).map(Query::Update),
            Query::Delete(delete) => self.delete(delete).map(Query::Delete),
        }
    }

    // ————————————————————————————————————————————————————————————————————————
    // STATEMENTS
    // ————————————————————————————————————————————————————————————————————————

    fn select(&mut self, mut select: SelectQuery) -> Result<SelectQuery, InterceptError> {
        self.tables.extend(select.from.iter().cloned());
        self.tables.extend(select.joins.iter().map(|join| join.table.clone()));
        select.where_clause = self.where_clause(select.where_clause.take())?;
        Ok(select)
    }

    fn delete(&mut self, mut delete: DeleteQuery) -> Result<DeleteQuery, InterceptError> {
        self.tables.push(delete.from.clone());
        self.tables.extend(delete.using.iter().cloned());
        delete.where_clause = self.where_clause(delete.where_clause.take())?;
        Ok(delete)
    }

    fn update(&mut self, mut update: UpdateQuery) -> Result<UpdateQuery, InterceptError> {
        self.tables.push(update.table.clone());
        self.tables.extend(update.from.iter().cloned());
        let target = update.table.clone();
        update.set = std::mem::take(&mut update.set)
            .into_iter()
            .map(|assignment| self.assignment(&target, assignment))
            .collect::<Result<_, _>>()?;
        update.where_clause = self.where_clause(update.where_clause.take())?;
        Ok(update)
    }

    fn insert(&mut self, mut insert: InsertQuery) -> Result<InsertQuery, InterceptError> {
        let target = insert
            .into
            .clone()
            .ok_or_else(|| InterceptError::Context("insert without a target table".to_string()))?;
        self.tables.push(target.clone());

        // 1) positional encoder per column
        let encoders: Vec<Option<&ColumnEncoder>> = insert
            .columns
            .iter()
            .map(|column| {
                self.registry
                    .get(&target.table.name, column, target.table.schema.as_deref())
            })
            .collect();
        if encoders.iter().all(Option::is_none) {
            return Ok(insert);
        }

        // 2) rewrite literal rows only
        match &mut insert.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    for (cell, encoder) in row.iter_mut().zip(&encoders) {
                        if let Some(encoder) = encoder {
                            encode_in_place(cell, encoder)?;
                        }
                    }
                }
            }
            InsertSource::Select(_) => {
                return Err(InterceptError::UnhandledNodeKind(
                    "insert from a sub-select into a column with an encoder".to_string(),
                ));
            }
        }
        Ok(insert)
    }

    /// SET always targets the updated table, whatever `FROM` adds.
    fn assignment(&self, target: &TableExpr, mut assignment: ColumnUpdate) -> Result<ColumnUpdate, InterceptError> {
        let Some(encoder) = self
            .registry
            .get(&target.table.name, &assignment.column, target.table.schema.as_deref())
        else {
            return Ok(assignment);
        };
        encode_in_place(&mut assignment.value, encoder)?;
        Ok(assignment)
    }

    // ————————————————————————————————————————————————————————————————————————
    // WHERE
    // ————————————————————————————————————————————————————————————————————————

    fn where_clause(&self, clause: Option<Expr>) -> Result<Option<Expr>, InterceptError> {
        clause.map(|expr| self.condition(expr)).transpose()
    }

    fn condition(&self, expr: Expr) -> Result<Expr, InterceptError> {
        let Expr::Binary { left, op, right } = expr else {
            return Ok(expr);
        };
        if op.is_logical() {
            let left = self.condition(*left)?;
            let right = self.condition(*right)?;
            return Ok(Expr::binary(left, op, right));
        }
        let Expr::Reference(column) = left.as_ref() else {
            return Ok(Expr::Binary { left, op, right });
        };
        let Some(encoder) = self.encoder_for(column)? else {
            return Ok(Expr::Binary { left, op, right });
        };

        let right = match *right {
            Expr::Value(value) if value.is_null() => Expr::Value(value),
            Expr::Value(value) => {
                let literal = encoder(&value, true)?;
                trace!(column = %column.column, %literal, "rewrote comparison literal");
                Expr::Raw(literal)
            }
            Expr::ValueList(values) => Expr::RawList(
                values
                    .iter()
                    .map(|value| encoder(value, true))
                    .collect::<Result<_, _>>()?,
            ),
            other @ (Expr::Reference(_) | Expr::Raw(_) | Expr::RawList(_)) => other,
            Expr::Binary { .. } => {
                return Err(InterceptError::UnhandledNodeKind(format!(
                    "expression compared to encoded column `{}`",
                    column.column
                )));
            }
        };
        Ok(Expr::Binary { left, op, right: Box::new(right) })
    }

    // ————————————————————————————————————————————————————————————————————————
    // RESOLUTION
    // ————————————————————————————————————————————————————————————————————————

    fn encoder_for(&self, column: &ColumnRef) -> Result<Option<&ColumnEncoder>, InterceptError> {
        let resolved = self.resolve(column)?;
        Ok(self
            .registry
            .get(&resolved.table, &resolved.column, resolved.namespace.as_deref()))
    }

    /// Unqualified columns belong to the first table in context; qualified
    /// ones match a table by name or alias, and by schema when one is given.
    pub fn resolve(&self, column: &ColumnRef) -> Result<ResolvedColumn, InterceptError> {
        let table = match &column.table {
            None => self.tables.first().ok_or_else(|| {
                InterceptError::Context(format!("no table in context for column `{}`", column.column))
            })?,
            Some(reference) => self
                .tables
                .iter()
                .find(|candidate| {
                    let named = candidate.table.name == reference.name
                        || candidate.alias.as_deref() == Some(reference.name.as_str());
                    let schema_matches = match &reference.schema {
                        None => true,
                        Some(schema) => {
                            candidate.table.schema.as_deref().unwrap_or(DEFAULT_NAMESPACE) == schema
                        }
                    };
                    named && schema_matches
                })
                .ok_or_else(|| {
                    InterceptError::Context(format!(
                        "`{}` does not match any table in context",
                        reference.name
                    ))
                })?,
        };
        Ok(ResolvedColumn {
            namespace: table.table.schema.clone(),
            table: table.table.name.clone(),
            column: column.column.clone(),
        })
    }
}

impl QueryPlugin for ValueInterceptor {
    fn transform_query(&mut self, query: Query) -> Result<Query, InterceptError> {
        self.rewrite(query)
    }
}

/// Replace a non-null literal with its uncast encoding, still sent as a
/// bind parameter.
fn encode_in_place(cell: &mut Expr, encoder: &ColumnEncoder) -> Result<(), InterceptError> {
    if let Expr::Value(value) = cell {
        if !value.is_null() {
            let encoded = encoder(value, false)?;
            trace!(%encoded, "encoded literal");
            *cell = Expr::Value(PgValue::Text(encoded));
        }
    }
    Ok(())
}
