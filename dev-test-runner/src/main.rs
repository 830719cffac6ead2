//! Smoke harness: catalog fixture → graph → artifacts, then the text codec
//! over a set of sample values. Prints a JSON report; exits non-zero on any
//! failure.
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use pg_typegen::catalog::{CatalogRows, CatalogTypes};
use pg_typegen::codec::{PgValue, decode_by_type_id, oid, parse_value};
use pg_typegen::codegen::{self, CodegenOptions};
use pg_typegen::graph::{self, Ordering};

/// `(input, expected to parse)`
const PARSE_SAMPLES: &[(&str, bool)] = &[
    ("{true, fAlSe, TRUE1, TRUE, FALSE}", true),
    ("{1, 2.2, .3, 4e5, 5.67e+8}", true),
    (r#"("foo()\"{},", "bar", 1.23, {"string", 1, NULL, true}, ("nested()", NULL), true)"#, true),
    (r#"(,"(""2 Elm"",9,{})",{sad},2024-01-01)"#, true),
    ("{{1,2},{3,4}}", true),
    (r#"("a", "b","#, false),
    (r#"("a", "b""#, false),
    ("{1.2.3}", false),
    ("(1,2) trailing", false),
];

/// `(type id, text, expected to decode)`
const PRIMITIVE_SAMPLES: &[(u32, &str, bool)] = &[
    (oid::DATE, "2024-02-29", true),
    (oid::TIMESTAMPTZ, "2024-02-29 12:30:00.5+05:30", true),
    (oid::BYTEA, r"\x00ff10", true),
    (oid::JSONB, r#"{"a": [1, 2]}"#, true),
    (oid::POINT, "(1.5,-2)", true),
    (oid::INT4_ARRAY, "{1,NULL,3}", true),
    (oid::BOOL, "maybe", false),
    (oid::DATE, "2024-13-01", false),
];

#[derive(Debug, Serialize)]
struct Report {
    catalog: String,
    rows: usize,
    types: usize,
    files: usize,
    failures: Vec<Failure>,
}

#[derive(Debug, Serialize)]
struct Failure {
    sample: String,
    detail: String,
}

fn catalog_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/catalog.json"))
}

fn check<T: std::fmt::Debug, E: std::fmt::Display>(
    failures: &mut Vec<Failure>,
    sample: String,
    result: Result<T, E>,
    should_succeed: bool,
) {
    match (result, should_succeed) {
        (Ok(value), true) => eprintln!("{} {sample} → {value:?}", "✅".green()),
        (Err(error), false) => eprintln!("{} {sample} rejected: {error}", "✅".green()),
        (Ok(value), false) => {
            eprintln!("{} {sample} unexpectedly parsed", "❌".red());
            failures.push(Failure { sample, detail: format!("accepted as {value:?}") });
        }
        (Err(error), true) => {
            eprintln!("{} {sample}: {error}", "❌".red());
            failures.push(Failure { sample, detail: error.to_string() });
        }
    }
}

fn main() -> Result<()> {
    // 1) catalog → graph → artifacts
    let path = catalog_path();
    let rows = CatalogRows::from_path(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let row_count = rows.row_count();
    let graph = graph::build(CatalogTypes::from_rows(rows)?, Ordering::Topological)?;
    let files = codegen::emit_files(&graph, &CodegenOptions::default());
    eprintln!("—— {} types → {} files ——", graph.len(), files.len());

    // 2) codec samples
    let mut failures = Vec::new();
    for (input, ok) in PARSE_SAMPLES {
        check(&mut failures, input.to_string(), parse_value(input), *ok);
    }
    for (type_id, input, ok) in PRIMITIVE_SAMPLES {
        let result = decode_by_type_id(*type_id, PgValue::Text(input.to_string()));
        check(&mut failures, format!("{input} as {type_id}"), result, *ok);
    }

    let failed = !failures.is_empty();
    let report = Report {
        catalog: path.display().to_string(),
        rows: row_count,
        types: graph.len(),
        files: files.len(),
        failures,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    if failed {
        anyhow::bail!("{} sample(s) failed", report.failures.len());
    }
    Ok(())
}
