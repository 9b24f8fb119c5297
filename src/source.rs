// src/source.rs
//! Table sources: where purchase tables come from.
//!
//! The warehouse query itself is an external collaborator. `QuerySource` keeps
//! the query text and project id and hands execution to an injected
//! `QueryRunner`; `FileSource` reads exported CSV or JSON tables from disk.
//! Every call is a single synchronous fetch without retries.

use crate::table::{Cell, PurchaseTable, Row};
use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait TableSource {
    fn fetch(&self) -> Result<PurchaseTable>;
    fn name(&self) -> &'static str;
}

/// Executes SQL against a warehouse and returns the result set.
pub trait QueryRunner {
    fn run(&self, query: &str, project_id: &str) -> Result<PurchaseTable>;
}

pub struct QuerySource<'a> {
    pub query: String,
    pub project_id: String,
    runner: &'a dyn QueryRunner,
}

impl<'a> QuerySource<'a> {
    pub fn new(query: impl Into<String>, project_id: impl Into<String>, runner: &'a dyn QueryRunner) -> Self {
        Self {
            query: query.into(),
            project_id: project_id.into(),
            runner,
        }
    }
}

impl TableSource for QuerySource<'_> {
    fn fetch(&self) -> Result<PurchaseTable> {
        let table = self
            .runner
            .run(&self.query, &self.project_id)
            .with_context(|| format!("query against project {}", self.project_id))?;
        info!(target: "source", source = self.name(), rows = table.len(), "query finished");
        Ok(table)
    }

    fn name(&self) -> &'static str {
        "query"
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileSource {
    fn fetch(&self) -> Result<PurchaseTable> {
        let table = load_table(&self.path)?;
        info!(
            target: "source",
            source = self.name(),
            path = %self.path.display(),
            rows = table.len(),
            "table loaded"
        );
        Ok(table)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Load a table from `.csv` or `.json`, picked by extension.
pub fn load_table(path: &Path) -> Result<PurchaseTable> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => {
            let file = fs::File::open(path)
                .with_context(|| format!("opening table {}", path.display()))?;
            read_csv(file).with_context(|| format!("reading CSV table {}", path.display()))
        }
        "json" => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading table {}", path.display()))?;
            parse_json(&content).with_context(|| format!("parsing JSON table {}", path.display()))
        }
        other => Err(anyhow!(
            "unsupported table format '{other}' for {}",
            path.display()
        )),
    }
}

/// CSV with a header row; every cell is text.
pub fn read_csv<R: Read>(reader: R) -> Result<PurchaseTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error at line {}", line_num + 2))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), Cell::Text(v.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(PurchaseTable::new(headers, rows))
}

/// JSON array of flat objects; cells keep their JSON kind. Columns follow the
/// key order of the objects, first-seen.
pub fn parse_json(s: &str) -> Result<PurchaseTable> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(s)?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(objects.len());
    for (n, object) in objects.into_iter().enumerate() {
        let mut row = Row::new();
        for (key, value) in object {
            if !columns.contains(&key) {
                columns.push(key.clone());
            }
            let cell: Cell = serde_json::from_value(value)
                .with_context(|| format!("row {n}, column '{key}': not a flat value"))?;
            row.insert(key, cell);
        }
        rows.push(row);
    }
    Ok(PurchaseTable::new(columns, rows))
}
