//! Name conversions between catalog spelling and Rust spelling.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap());

const SEPARATOR: char = '_';

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `foo_bar` → `FooBar`. Idempotent.
pub fn to_upper_camel(name: &str) -> String {
    name.split(SEPARATOR).map(capitalize).collect()
}

/// `foo_bar` → `fooBar`; the first segment is kept as is. Idempotent.
pub fn to_lower_camel(name: &str) -> String {
    let mut segments = name.split(SEPARATOR).filter(|s| !s.is_empty());
    let Some(first) = segments.next() else {
        return String::new();
    };
    let mut out = first.to_string();
    out.extend(segments.map(capitalize));
    out
}

/// `FooBar` / `fooBar` → `foo_bar`.
pub fn to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() {
            if matches!(previous, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push(SEPARATOR);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

/// How table names become member names of the generated aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableNaming {
    /// lower-separated, `user_accounts`
    #[default]
    Snake,
    /// lower camel, `userAccounts`
    Camel,
    /// upper camel, `UserAccounts`
    Pascal,
}

impl TableNaming {
    pub fn apply(self, table: &str) -> String {
        match self {
            TableNaming::Snake => to_snake(table),
            TableNaming::Camel => to_lower_camel(table),
            TableNaming::Pascal => to_upper_camel(table),
        }
    }
}

/// Replace every non-identifier character with `_`.
pub fn sanitize(name: &str) -> String {
    NON_IDENT.replace_all(name, "_").into_owned()
}

/// Module name for a namespace: non-identifier characters become `_`.
pub fn module_name(namespace: &str) -> String {
    rust_ident(namespace)
}

/// File stem holding a namespace's module (`r#type` lives in `type.rs`).
pub fn module_file_stem(namespace: &str) -> String {
    let module = module_name(namespace);
    module.strip_prefix("r#").map(str::to_string).unwrap_or(module)
}

/// Stable alias a namespace is imported under by its siblings.
pub fn namespace_alias(namespace: &str) -> String {
    format!("ns_{}", NON_IDENT.replace_all(namespace, "_"))
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

/// Any catalog name as a usable Rust identifier.
pub fn rust_ident(name: &str) -> String {
    let cleaned = NON_IDENT.replace_all(name, "_");
    match cleaned.as_ref() {
        "" => "_".to_string(),
        "self" | "Self" | "super" | "crate" => format!("{cleaned}_"),
        word if KEYWORDS.contains(&word) => format!("r#{word}"),
        word if word.starts_with(|c: char| c.is_ascii_digit()) => format!("_{word}"),
        word => word.to_string(),
    }
}

/// SQL identifier, double-quoted unless it is a plain lower-case name.
pub fn sql_ident(name: &str) -> String {
    static PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_$]*$").unwrap());
    if PLAIN.is_match(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
