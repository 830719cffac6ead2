//! CLI: catalog → generated modules, plus a text-value inspector.
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::debug;

use crate::catalog::{CatalogRows, CatalogTypes};
use crate::codec::{PgValue, decode_by_type_id, parse_value};
use crate::codegen::{self, Artifact, CodegenOptions};
use crate::graph::{self, Ordering};
use crate::naming::TableNaming;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed Rust modules from a PostgreSQL catalog dump
#[derive(Parser, Debug)]
#[command(name = "pg-typegen", version)]
pub struct CommandLineInterface {
    /// debug logging (RUST_LOG is honoured otherwise)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build the type graph and write declarations, decoders and encoders
    Gen(GenOut),
    /// parse a text-encoded value and print it
    Parse(ParseIn),
}

#[derive(Args, Debug, Clone)]
struct GenOut {
    /// One or more catalog JSON files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    catalog: Vec<String>,

    /// output directory (receives mod.rs, schemas/, decoders/, encoders/)
    #[arg(short, long)]
    out: PathBuf,

    /// member naming of the per-namespace table aggregate
    #[arg(long, value_enum)]
    table_naming: Option<TableNaming>,

    /// path generated code imports the runtime from
    #[arg(long)]
    helper_import: Option<String>,

    /// path from decoder/encoder modules to the declarations
    #[arg(long)]
    schemas_import: Option<String>,

    /// dependencies before dependents instead of alphabetical order
    #[arg(long)]
    topological: bool,

    /// with --topological: fail on reference cycles instead of skipping the back edge
    #[arg(long)]
    strict_cycles: bool,

    /// JSON file of codegen options; flags win over file values
    #[arg(long)]
    config: Option<PathBuf>,

    /// build the graph, report, write nothing
    #[arg(long)]
    no_op: bool,
}

#[derive(Args, Debug, Clone)]
struct ParseIn {
    /// decode the text as this built-in type identifier
    #[arg(long)]
    type_id: Option<u32>,

    /// value text (stdin if omitted)
    text: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl GenOut {
    fn options(&self) -> Result<CodegenOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                crate::path_de::from_str_with_path::<CodegenOptions>(&source)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => CodegenOptions::default(),
        };
        if let Some(table_naming) = self.table_naming {
            options.table_naming = table_naming;
        }
        if let Some(helper_import) = &self.helper_import {
            options.helper_import = helper_import.clone();
        }
        if let Some(schemas_import) = &self.schemas_import {
            options.schemas_import = schemas_import.clone();
        }
        Ok(options)
    }

    fn ordering(&self) -> Ordering {
        match (self.topological, self.strict_cycles) {
            (_, true) => Ordering::TopologicalStrict,
            (true, false) => Ordering::Topological,
            (false, false) => Ordering::Alphabetical,
        }
    }

    fn load_rows(&self) -> Result<CatalogRows> {
        let mut rows = CatalogRows::default();
        for path in resolve_file_path_patterns(&self.catalog)? {
            let file = CatalogRows::from_path(&path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            debug!(path = %path.display(), rows = file.row_count(), "loaded catalog");
            rows.merge(file);
        }
        Ok(rows)
    }

    fn run(&self) -> Result<()> {
        let options = self.options()?;

        // 1) catalog → graph; nothing is written if this fails
        let rows = self.load_rows()?;
        let row_count = rows.row_count();
        let types = CatalogTypes::from_rows(rows).context("malformed catalog")?;
        let graph = graph::build(types, self.ordering()).context("failed to build the type graph")?;
        let namespaces = graph.by_namespace().len();
        if self.no_op {
            eprintln!(
                "{} {row_count} catalog rows → {} types in {namespaces} namespaces",
                "no-op".yellow().bold(),
                graph.len()
            );
            return Ok(());
        }

        // 2) emit & write
        let files = codegen::emit_files(&graph, &options);
        write_artifacts(&self.out, &files)?;
        eprintln!(
            "{} {} files for {} types in {namespaces} namespaces → {}",
            "generated".green().bold(),
            files.len(),
            graph.len(),
            self.out.display()
        );
        Ok(())
    }
}

impl ParseIn {
    fn run(&self) -> Result<()> {
        let text = match &self.text {
            Some(text) => text.clone(),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read stdin")?;
                buf
            }
        };
        let value = match self.type_id {
            Some(type_id) => decode_by_type_id(type_id, PgValue::Text(text.trim().to_string()))?,
            None => parse_value(&text)?,
        };
        println!("{value:#?}");
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Gen(target) => target.run(),
            Command::Parse(target) => target.run(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Write every artifact under `out`, creating directories first.
pub fn write_artifacts(out: &Path, files: &[Artifact]) -> Result<()> {
    let mut dirs: Vec<PathBuf> = files
        .iter()
        .filter_map(|file| out.join(&file.path).parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs.dedup();
    for dir in &dirs {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    files.par_iter().try_for_each(|file| {
        let path = out.join(&file.path);
        std::fs::write(&path, &file.contents).with_context(|| format!("failed to write {}", path.display()))
    })
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
