//! Catalog type name → host type name.
use indexmap::IndexMap;

/// `namespace → catalog type name → host type`
pub type TypeMapping = IndexMap<String, IndexMap<String, String>>;

const BUILTIN_NAMESPACE: &str = "pg_catalog";

const STRING: &str = "String";

const BUILTINS: &[(&str, &str)] = &[
    // string-like
    ("text", STRING),
    ("varchar", STRING),
    ("bpchar", STRING),
    ("char", STRING),
    ("name", STRING),
    ("uuid", STRING),
    ("inet", STRING),
    ("cidr", STRING),
    ("macaddr", STRING),
    ("time", STRING),
    ("timetz", STRING),
    ("interval", STRING),
    ("numeric", STRING),
    ("float4", STRING),
    ("float8", STRING),
    ("money", STRING),
    ("xml", STRING),
    ("oid", STRING),
    ("regclass", STRING),
    ("regtype", STRING),
    ("regproc", STRING),
    // integers
    ("int2", "i16"),
    ("int4", "i32"),
    ("xid", "i64"),
    ("int8", "i64"),
    // boolean
    ("bool", "bool"),
    // bytes
    ("bytea", "rt::PgBytes"),
    // temporal
    ("date", "rt::chrono::NaiveDate"),
    ("timestamp", "rt::chrono::NaiveDateTime"),
    ("timestamptz", "rt::chrono::DateTime<rt::chrono::FixedOffset>"),
    // json
    ("json", "rt::serde_json::Value"),
    ("jsonb", "rt::serde_json::Value"),
    // geometric
    ("point", "rt::PgPoint"),
    ("box", "rt::PgBox"),
    ("circle", "rt::PgCircle"),
    ("line", "rt::PgLine"),
    ("lseg", "rt::PgLineSegment"),
    ("path", "rt::PgPath"),
    ("polygon", "rt::PgPolygon"),
    ("tid", "rt::PgTid"),
];

/// Built-in mapping for the `pg_catalog` namespace.
pub fn default_type_mapping() -> TypeMapping {
    let builtins = BUILTINS
        .iter()
        .map(|(name, host)| (name.to_string(), host.to_string()))
        .collect();
    IndexMap::from([(BUILTIN_NAMESPACE.to_string(), builtins)])
}

/// Defaults with per-entry overrides applied on top.
#[derive(Debug, Clone)]
pub struct TypeMap(TypeMapping);

impl TypeMap {
    pub fn new(overrides: &TypeMapping) -> Self {
        let mut mapping = default_type_mapping();
        for (namespace, entries) in overrides {
            let target = mapping.entry(namespace.clone()).or_default();
            for (name, host) in entries {
                target.insert(name.clone(), host.clone());
            }
        }
        TypeMap(mapping)
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&str> {
        self.0.get(namespace)?.get(name).map(String::as_str)
    }
}
