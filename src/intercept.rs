//! Query value interception.
//!
//! Outgoing queries pass through a [`QueryPipeline`] of [`QueryPlugin`]s
//! before they are compiled. The [`ValueInterceptor`] plugin replaces literal
//! values bound for composite or domain columns with their text encoding,
//! using the column encoders generated code registers in an
//! [`EncoderRegistry`].
pub mod compile;
pub mod query;
pub mod registry;
pub mod transform;

use thiserror::Error;

use crate::codec::CodecError;
pub use compile::{CompiledQuery, compile};
pub use query::{
    BinaryOperator, ColumnRef, ColumnUpdate, DeleteQuery, Expr, InsertQuery, InsertSource, Join, JoinKind, Query,
    SelectQuery, TableExpr, TableName, UpdateQuery,
};
pub use registry::{DEFAULT_NAMESPACE, EncoderRegistry};
pub use transform::{ResolvedColumn, ValueInterceptor};

#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("cannot resolve table context: {0}")]
    Context(String),
    #[error("unhandled query node: {0}")]
    UnhandledNodeKind(String),
    #[error("failed to encode value: {0}")]
    Encode(#[from] CodecError),
}

/// A transform applied to every outgoing query.
pub trait QueryPlugin {
    fn transform_query(&mut self, query: Query) -> Result<Query, InterceptError>;
}

/// Plugins in registration order.
#[derive(Default)]
pub struct QueryPipeline {
    plugins: Vec<Box<dyn QueryPlugin + Send>>,
}

impl QueryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, plugin: impl QueryPlugin + Send + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin; the first failure stops the query.
    pub fn transform(&mut self, query: Query) -> Result<Query, InterceptError> {
        self.plugins
            .iter_mut()
            .try_fold(query, |query, plugin| plugin.transform_query(query))
    }

    /// [`transform`](Self::transform), then [`compile`].
    pub fn prepare(&mut self, query: Query) -> Result<CompiledQuery, InterceptError> {
        let query = self.transform(query)?;
        compile(&query)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::{PgValue, with_cast};

    struct Limit;

    impl QueryPlugin for Limit {
        fn transform_query(&mut self, query: Query) -> Result<Query, InterceptError> {
            match query {
                Query::Select(mut select) => {
                    select.columns.push(Expr::Raw("1".to_string()));
                    Ok(Query::Select(select))
                }
                other => Ok(other),
            }
        }
    }

    #[test]
    fn pipeline_runs_plugins_in_order_then_compiles() {
        let mut registry = EncoderRegistry::new();
        registry.insert(
            "public",
            "users",
            "tag",
            with_cast(|value: &PgValue| Ok(format!("<{}>", value.preview(20))), "public.tag"),
        );
        let mut pipeline = QueryPipeline::new()
            .with(ValueInterceptor::new(Arc::new(registry)))
            .with(Limit);
        assert_eq!(pipeline.len(), 2);

        let query = Query::Select(
            SelectQuery::from(TableName::new("users")).filter(Expr::column("tag").eq(Expr::value(true))),
        );
        let compiled = pipeline.prepare(query).unwrap();
        assert_eq!(compiled.sql, "SELECT 1 FROM users WHERE tag = '<Bool(true)>'::public.tag");
        assert!(compiled.params.is_empty());
    }
}
