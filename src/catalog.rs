//! Catalog rows as supplied by the introspection side, and their grouping
//! into per-type definitions.
//!
//! Input documents look like
//!
//! ```json
//! { "composites": [...], "domains": [...], "enums": [...], "tables": [...] }
//! ```
//!
//! with every list optional and row fields in camelCase.
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::{Column, CompositeType, DomainType, EnumType, EnumValue, Field, TableType, TypeRef};
use crate::path_de::{self, PathError};

// ————————————————————————————————————————————————————————————————————————————
// ERRORS
// ————————————————————————————————————————————————————————————————————————————

/// Malformed catalog input. Always fatal for a generation run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{what} has no namespace")]
    MissingNamespace { what: String },
    #[error("{owner} declares ordinal {ordinal} more than once")]
    DuplicateOrdinal { owner: String, ordinal: i64 },
    #[error("type {key} is declared more than once")]
    DuplicateType { key: String },
    #[error("cyclic type dependency: {}", path.join(" → "))]
    CyclicDependency { path: Vec<String> },
    #[error("failed to read catalog document")]
    Deserialize(#[from] PathError),
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// ROWS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeAttributeRow {
    #[serde(default)]
    pub owner_namespace: Option<String>,
    pub owner_name: String,
    pub attr_ordinal: i64,
    pub attr_name: String,
    pub attr_type_name: String,
    pub attr_type_id: u32,
    #[serde(default)]
    pub attr_type_namespace: Option<String>,
    #[serde(default)]
    pub attr_array_dims: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRow {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub underlying_type_name: String,
    pub underlying_type_id: u32,
    #[serde(default)]
    pub underlying_namespace: Option<String>,
    #[serde(default)]
    pub constraint_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueRow {
    pub type_name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub value_name: String,
    pub sort_order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumnRow {
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    pub column_name: String,
    pub ordinal: i64,
    pub type_name: String,
    #[serde(default)]
    pub type_namespace: Option<String>,
    pub type_id: u32,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub default_expr: Option<String>,
    #[serde(default)]
    pub array_dims: u32,
}

/// One catalog snapshot, possibly merged from several documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRows {
    #[serde(default)]
    pub composites: Vec<CompositeAttributeRow>,
    #[serde(default)]
    pub domains: Vec<DomainRow>,
    #[serde(default)]
    pub enums: Vec<EnumValueRow>,
    #[serde(default)]
    pub tables: Vec<TableColumnRow>,
}

impl CatalogRows {
    pub fn from_json(src: &str) -> Result<Self, CatalogError> {
        Ok(path_de::from_str_with_path(src)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path_de::from_slice_with_path(&bytes)?)
    }

    /// Append `other`'s rows after ours.
    pub fn merge(&mut self, other: CatalogRows) {
        self.composites.extend(other.composites);
        self.domains.extend(other.domains);
        self.enums.extend(other.enums);
        self.tables.extend(other.tables);
    }

    pub fn row_count(&self) -> usize {
        self.composites.len() + self.domains.len() + self.enums.len() + self.tables.len()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// GROUPING
// ————————————————————————————————————————————————————————————————————————————

/// Catalog rows grouped into definitions, ordinal ordered, still in the
/// catalog's spelling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTypes {
    pub composites: Vec<CompositeType>,
    pub domains: Vec<DomainType>,
    pub enums: Vec<EnumType>,
    pub tables: Vec<TableType>,
}

impl CatalogTypes {
    pub fn from_rows(rows: CatalogRows) -> Result<Self, CatalogError> {
        Ok(CatalogTypes {
            composites: group_composites(rows.composites)?,
            domains: rows.domains.into_iter().map(domain).collect::<Result<_, _>>()?,
            enums: group_enums(rows.enums)?,
            tables: group_tables(rows.tables)?,
        })
    }
}

fn require_namespace(namespace: Option<String>, what: impl FnOnce() -> String) -> Result<String, CatalogError> {
    match namespace {
        Some(ns) if !ns.is_empty() => Ok(ns),
        _ => Err(CatalogError::MissingNamespace { what: what() }),
    }
}

/// Array columns sometimes arrive with the catalog's `_` element marker
/// still attached (`_int4`); drop it.
fn strip_array_marker(type_name: String, dims: u32) -> String {
    match type_name.strip_prefix('_') {
        Some(element) if dims > 0 && !element.is_empty() => element.to_string(),
        _ => type_name,
    }
}

/// Stable sort by ordinal, rejecting repeats.
fn order_members<T>(owner: &str, mut members: Vec<(i64, T)>) -> Result<Vec<T>, CatalogError> {
    members.sort_by_key(|(ordinal, _)| *ordinal);
    for pair in members.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(CatalogError::DuplicateOrdinal {
                owner: owner.to_string(),
                ordinal: pair[0].0,
            });
        }
    }
    Ok(members.into_iter().map(|(_, member)| member).collect())
}

fn group_composites(rows: Vec<CompositeAttributeRow>) -> Result<Vec<CompositeType>, CatalogError> {
    let mut owners: IndexMap<(String, String), Vec<(i64, Field)>> = IndexMap::new();
    for row in rows {
        let namespace = require_namespace(row.owner_namespace, || format!("composite type {}", row.owner_name))?;
        let type_namespace = require_namespace(row.attr_type_namespace, || {
            format!("type of attribute {}.{}.{}", namespace, row.owner_name, row.attr_name)
        })?;
        let field = Field {
            name: row.attr_name,
            type_ref: TypeRef {
                namespace: type_namespace,
                name: strip_array_marker(row.attr_type_name, row.attr_array_dims),
                type_id: row.attr_type_id,
            },
            array_dimensions: row.attr_array_dims,
        };
        owners.entry((namespace, row.owner_name)).or_default().push((row.attr_ordinal, field));
    }
    owners
        .into_iter()
        .map(|((namespace, name), members)| {
            let fields = order_members(&format!("{namespace}.{name}"), members)?;
            Ok(CompositeType { namespace, name, fields })
        })
        .collect()
}

fn domain(row: DomainRow) -> Result<DomainType, CatalogError> {
    let namespace = require_namespace(row.namespace, || format!("domain {}", row.name))?;
    let underlying_namespace = require_namespace(row.underlying_namespace, || {
        format!("underlying type of domain {}.{}", namespace, row.name)
    })?;
    Ok(DomainType {
        namespace,
        name: row.name,
        underlying: TypeRef {
            namespace: underlying_namespace,
            name: row.underlying_type_name,
            type_id: row.underlying_type_id,
        },
        constraint: row.constraint_text,
    })
}

fn group_enums(rows: Vec<EnumValueRow>) -> Result<Vec<EnumType>, CatalogError> {
    let mut owners: IndexMap<(String, String), Vec<EnumValue>> = IndexMap::new();
    for row in rows {
        let namespace = require_namespace(row.namespace, || format!("enum {}", row.type_name))?;
        owners.entry((namespace, row.type_name)).or_default().push(EnumValue {
            name: row.value_name,
            order: row.sort_order,
        });
    }
    Ok(owners
        .into_iter()
        .map(|((namespace, name), mut values)| {
            values.sort_by(|a, b| a.order.total_cmp(&b.order));
            EnumType { namespace, name, values }
        })
        .collect())
}

fn group_tables(rows: Vec<TableColumnRow>) -> Result<Vec<TableType>, CatalogError> {
    let mut owners: IndexMap<(String, String), Vec<(i64, Column)>> = IndexMap::new();
    for row in rows {
        let namespace = require_namespace(row.schema, || format!("table {}", row.table))?;
        let type_namespace = require_namespace(row.type_namespace, || {
            format!("type of column {}.{}.{}", namespace, row.table, row.column_name)
        })?;
        let column = Column {
            field: Field {
                name: row.column_name,
                type_ref: TypeRef {
                    namespace: type_namespace,
                    name: strip_array_marker(row.type_name, row.array_dims),
                    type_id: row.type_id,
                },
                array_dimensions: row.array_dims,
            },
            nullable: !row.not_null,
            default_expr: row.default_expr,
        };
        owners.entry((namespace, row.table)).or_default().push((row.ordinal, column));
    }
    owners
        .into_iter()
        .map(|((namespace, name), members)| {
            let columns = order_members(&format!("{namespace}.{name}"), members)?;
            Ok(TableType { namespace, name, columns })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "composites": [
            {"ownerNamespace": "public", "ownerName": "address", "attrOrdinal": 2, "attrName": "zip_code",
             "attrTypeName": "text", "attrTypeId": 25, "attrTypeNamespace": "pg_catalog"},
            {"ownerNamespace": "public", "ownerName": "address", "attrOrdinal": 1, "attrName": "lines",
             "attrTypeName": "_text", "attrTypeId": 1009, "attrTypeNamespace": "pg_catalog", "attrArrayDims": 1}
        ],
        "enums": [
            {"typeName": "mood", "namespace": "public", "valueName": "sad", "sortOrder": 2},
            {"typeName": "mood", "namespace": "public", "valueName": "happy", "sortOrder": 1.5}
        ],
        "tables": [
            {"schema": "public", "table": "users", "columnName": "id", "ordinal": 1, "typeName": "int4",
             "typeNamespace": "pg_catalog", "typeId": 23, "notNull": true, "defaultExpr": "nextval('users_id_seq')"}
        ]
    }"#;

    #[test]
    fn groups_rows_in_ordinal_order() {
        let types = CatalogTypes::from_rows(CatalogRows::from_json(DOCUMENT).unwrap()).unwrap();
        let address = &types.composites[0];
        let names: Vec<_> = address.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["lines", "zip_code"]);
        assert_eq!(address.fields[0].type_ref.name, "text");
        let labels: Vec<_> = types.enums[0].values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(labels, ["happy", "sad"]);
        assert!(!types.tables[0].columns[0].nullable);
        assert!(types.domains.is_empty());
    }

    #[test]
    fn duplicate_ordinals_are_rejected() {
        let mut rows = CatalogRows::from_json(DOCUMENT).unwrap();
        rows.composites[0].attr_ordinal = 1;
        let err = CatalogTypes::from_rows(rows).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateOrdinal { ordinal: 1, .. }));
    }

    #[test]
    fn missing_namespace_is_rejected() {
        let mut rows = CatalogRows::from_json(DOCUMENT).unwrap();
        rows.tables[0].schema = Some(String::new());
        assert!(matches!(
            CatalogTypes::from_rows(rows),
            Err(CatalogError::MissingNamespace { .. })
        ));
    }

    #[test]
    fn deserialize_errors_carry_the_json_path() {
        let err = CatalogRows::from_json(r#"{"tables": [{"table": 1}]}"#).unwrap_err();
        let CatalogError::Deserialize(inner) = err else { panic!("unexpected error") };
        assert_eq!(inner.path, "tables[0].table");
    }

    #[test]
    fn merge_appends() {
        let mut rows = CatalogRows::from_json(DOCUMENT).unwrap();
        rows.merge(CatalogRows::from_json(DOCUMENT).unwrap());
        assert_eq!(rows.row_count(), 10);
    }
}
