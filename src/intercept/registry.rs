//! Column encoders keyed by namespace, table and column.
use std::fmt;

use indexmap::IndexMap;

use crate::codec::ColumnEncoder;

/// Namespace assumed when neither the query nor the lookup names one.
pub const DEFAULT_NAMESPACE: &str = "public";

/// `namespace → table → column → encoder`, filled by the generated
/// `register` functions.
#[derive(Clone, Default)]
pub struct EncoderRegistry {
    encoders: IndexMap<String, IndexMap<String, IndexMap<String, ColumnEncoder>>>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations for the same column replace earlier ones.
    pub fn insert(&mut self, namespace: &str, table: &str, column: &str, encoder: ColumnEncoder) {
        self.encoders
            .entry(namespace.to_string())
            .or_default()
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), encoder);
    }

    pub fn get(&self, table: &str, column: &str, namespace: Option<&str>) -> Option<&ColumnEncoder> {
        self.encoders
            .get(namespace.unwrap_or(DEFAULT_NAMESPACE))?
            .get(table)?
            .get(column)
    }

    pub fn contains(&self, table: &str, column: &str, namespace: Option<&str>) -> bool {
        self.get(table, column, namespace).is_some()
    }

    /// `(namespace, table, column)` of every registered encoder.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.encoders.iter().flat_map(|(namespace, tables)| {
            tables.iter().flat_map(move |(table, columns)| {
                columns
                    .keys()
                    .map(move |column| (namespace.as_str(), table.as_str(), column.as_str()))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.columns().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .columns()
            .map(|(namespace, table, column)| format!("{namespace}.{table}.{column}"))
            .collect();
        f.debug_struct("EncoderRegistry").field("columns", &keys).finish()
    }
}
