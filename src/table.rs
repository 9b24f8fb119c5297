// src/table.rs
//! In-memory tabular records as delivered by a `TableSource`.
//!
//! A `PurchaseTable` is an ordered list of rows keyed by column name. Cells keep
//! the kind they had at the source (CSV gives text only, JSON keeps numbers,
//! bools and nulls), so text accessors can fail fast on a non-text value instead
//! of coercing it.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

pub const PRODUCT_TITLE: &str = "product_title";
pub const ASIN: &str = "asin";
pub const START_DATE: &str = "start_date";

/// One cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Number(_) => "number",
            Cell::Bool(_) => "bool",
            Cell::Null => "null",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

pub type Row = BTreeMap<String, Cell>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl PurchaseTable {
    /// Build a table. Columns are the union of the declared ones and any key
    /// seen in a row, in first-seen order.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut seen: HashSet<String> = columns.iter().cloned().collect();
        let mut columns = columns;
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Convenience for tests and small fixtures: every cell is text.
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Result<Self> {
        let mut out = Vec::with_capacity(rows.len());
        for (n, r) in rows.iter().enumerate() {
            if r.len() != columns.len() {
                bail!(
                    "row {n}: expected {} cells, got {}",
                    columns.len(),
                    r.len()
                );
            }
            out.push(
                columns
                    .iter()
                    .zip(r.iter())
                    .map(|(c, v)| (c.to_string(), Cell::from(*v)))
                    .collect(),
            );
        }
        Ok(Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            out,
        ))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(anyhow!("column '{name}' not found"))
        }
    }

    /// Text value of `column` in row `idx`.
    pub fn text_at(&self, idx: usize, column: &str) -> Result<&str> {
        self.require_column(column)?;
        let row = self
            .rows
            .get(idx)
            .ok_or_else(|| anyhow!("row {idx} out of range ({} rows)", self.rows.len()))?;
        match row.get(column) {
            Some(Cell::Text(s)) => Ok(s.as_str()),
            Some(other) => bail!(
                "column '{column}' row {idx}: expected text, got {}",
                other.kind()
            ),
            None => bail!("column '{column}' row {idx}: expected text, got missing"),
        }
    }

    /// All values of a text column, in row order.
    pub fn text_column(&self, column: &str) -> Result<Vec<&str>> {
        self.require_column(column)?;
        (0..self.rows.len())
            .map(|idx| self.text_at(idx, column))
            .collect()
    }

    /// Every value of `column` rendered as a string, whatever its kind. Missing
    /// cells render like nulls.
    pub fn display_column(&self, column: &str) -> Result<Vec<String>> {
        self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(column).unwrap_or(&Cell::Null).to_string())
            .collect())
    }

    /// Text cells of `column` only, row order; other kinds are skipped.
    pub fn text_cells(&self, column: &str) -> Result<Vec<&str>> {
        self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Cell::as_text))
            .collect())
    }

    /// Distinct values of a text column, first-seen order.
    pub fn distinct_text(&self, column: &str) -> Result<Vec<&str>> {
        let mut seen = HashSet::new();
        Ok(self
            .text_column(column)?
            .into_iter()
            .filter(|v| seen.insert(*v))
            .collect())
    }

    /// Rows whose `column` contains `needle` (case-sensitive substring).
    pub fn filter_contains(&self, column: &str, needle: &str) -> Result<PurchaseTable> {
        let values = self.text_column(column)?;
        let rows = values
            .iter()
            .zip(self.rows.iter())
            .filter(|(v, _)| v.contains(needle))
            .map(|(_, r)| r.clone())
            .collect();
        Ok(PurchaseTable {
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PurchaseTable {
        PurchaseTable::from_text_rows(
            &["asin", "product_title"],
            &[&["A1", "Colgate Total"], &["A2", "Crest Pro"], &["A3", "Colgate Total"]],
        )
        .unwrap()
    }

    #[test]
    fn missing_column_is_an_error() {
        let t = sample();
        let err = t.text_column("nope").unwrap_err();
        assert!(err.to_string().contains("column 'nope' not found"));
    }

    #[test]
    fn non_text_cell_fails_fast() {
        let mut row = Row::new();
        row.insert("product_title".into(), Cell::Number(3.0));
        let t = PurchaseTable::new(vec!["product_title".into()], vec![row]);
        let err = t.text_column("product_title").unwrap_err();
        assert!(err.to_string().contains("expected text, got number"));
    }

    #[test]
    fn lenient_readers_accept_any_cell_kind() {
        let mut a = Row::new();
        a.insert("asin".into(), Cell::Number(1234567890.0));
        a.insert("product_title".into(), Cell::Null);
        let mut b = Row::new();
        b.insert("asin".into(), Cell::from("B02"));
        b.insert("product_title".into(), Cell::from("Crest Pro"));
        let t = PurchaseTable::new(Vec::new(), vec![a, b]);

        assert_eq!(t.display_column("asin").unwrap(), vec!["1234567890", "B02"]);
        assert_eq!(t.display_column("product_title").unwrap(), vec!["null", "Crest Pro"]);
        assert_eq!(t.text_cells("product_title").unwrap(), vec!["Crest Pro"]);
        assert!(t.display_column("nope").is_err());
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let t = sample();
        assert_eq!(
            t.distinct_text("product_title").unwrap(),
            vec!["Colgate Total", "Crest Pro"]
        );
    }

    #[test]
    fn filter_is_case_sensitive() {
        let t = sample();
        assert_eq!(t.filter_contains("product_title", "Colgate").unwrap().len(), 2);
        assert_eq!(t.filter_contains("product_title", "colgate").unwrap().len(), 0);
    }
}
