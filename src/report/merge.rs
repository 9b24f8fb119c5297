// src/report/merge.rs
//! Combine per-rank classification tables into one wide table.
//!
//! The join key is `product_title`. It is an inner join: a key that occurs
//! `a` times on the left and `b` times on the right yields `a * b` rows.
//! Per-rank tables built from the same purchase table repeat titles whenever a
//! product appears on several dates, so the row count can blow up. Callers that
//! need one row per title use `MergePolicy::RequireUnique`.

use crate::classify::{ClassificationRecord, ClassificationTable, Label};
use crate::table::{ASIN, PRODUCT_TITLE, START_DATE};
use anyhow::{bail, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Keep inner-join row multiplication on duplicate keys (logs a warning).
    #[default]
    AllowDuplicates,
    /// Fail on the first duplicate `product_title`.
    RequireUnique,
}

impl MergePolicy {
    pub fn from_require_unique(require_unique: bool) -> Self {
        if require_unique {
            MergePolicy::RequireUnique
        } else {
            MergePolicy::AllowDuplicates
        }
    }
}

/// One rank's contribution to a merged row.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCells {
    pub alternate_title: String,
    pub internal: Label,
    pub substitute: Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub start_date: String,
    pub asin: String,
    pub product_title: String,
    /// Aligned with `MergedTable::ranks`.
    pub ranks: Vec<RankCells>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    /// `(column, prefix)` per rank, in merge order.
    pub ranks: Vec<(String, String)>,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut m = Map::new();
                m.insert(START_DATE.into(), Value::from(row.start_date.as_str()));
                m.insert(ASIN.into(), Value::from(row.asin.as_str()));
                m.insert(PRODUCT_TITLE.into(), Value::from(row.product_title.as_str()));
                for ((column, prefix), cells) in self.ranks.iter().zip(row.ranks.iter()) {
                    m.insert(column.clone(), Value::from(cells.alternate_title.as_str()));
                    m.insert(
                        format!("{prefix}_internal"),
                        Value::from(cells.internal.as_str()),
                    );
                    m.insert(
                        format!("{prefix}_substitute"),
                        Value::from(cells.substitute.as_str()),
                    );
                }
                Value::Object(m)
            })
            .collect()
    }
}

fn cells(r: &ClassificationRecord) -> RankCells {
    RankCells {
        alternate_title: r.alternate_title.clone(),
        internal: r.internal,
        substitute: r.substitute,
    }
}

fn first_duplicate<'a, I: IntoIterator<Item = &'a str>>(keys: I) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    keys.into_iter().find(|k| !seen.insert(*k))
}

/// Join `tables` on `product_title`. The first table supplies `start_date` and
/// `asin`; later tables only add their rank columns.
pub fn merge_ranks(tables: &[ClassificationTable], policy: MergePolicy) -> Result<MergedTable> {
    let Some((first, rest)) = tables.split_first() else {
        bail!("merge needs at least one classification table");
    };

    let mut merged = MergedTable {
        ranks: vec![(first.column.clone(), first.prefix.clone())],
        rows: first
            .records
            .iter()
            .map(|r| MergedRow {
                start_date: r.start_date.clone(),
                asin: r.asin.clone(),
                product_title: r.product_title.clone(),
                ranks: vec![cells(r)],
            })
            .collect(),
    };

    for right in rest {
        let left_dup = first_duplicate(merged.rows.iter().map(|r| r.product_title.as_str()))
            .map(str::to_string);
        let right_dup =
            first_duplicate(right.records.iter().map(|r| r.product_title.as_str()));
        if let Some(key) = left_dup.as_deref().or(right_dup) {
            match policy {
                MergePolicy::RequireUnique => {
                    bail!("duplicate product_title '{key}' while merging {}", right.column)
                }
                MergePolicy::AllowDuplicates => warn!(
                    target: "report",
                    column = %right.column,
                    key,
                    "duplicate merge key; rows will multiply"
                ),
            }
        }

        let mut by_key: HashMap<&str, Vec<&ClassificationRecord>> = HashMap::new();
        for r in &right.records {
            by_key.entry(r.product_title.as_str()).or_default().push(r);
        }

        let mut rows = Vec::with_capacity(merged.rows.len());
        for left in &merged.rows {
            if let Some(matches) = by_key.get(left.product_title.as_str()) {
                for m in matches {
                    let mut row = left.clone();
                    row.ranks.push(cells(m));
                    rows.push(row);
                }
            }
        }
        merged.rows = rows;
        merged
            .ranks
            .push((right.column.clone(), right.prefix.clone()));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(prefix: &str, rows: &[(&str, &str)]) -> ClassificationTable {
        ClassificationTable {
            column: format!("{prefix}_purchased_product_title"),
            prefix: prefix.to_string(),
            records: rows
                .iter()
                .map(|(title, alt)| ClassificationRecord {
                    start_date: "2023-01-01".into(),
                    asin: "B01".into(),
                    product_title: title.to_string(),
                    alternate_title: alt.to_string(),
                    internal: Label::No,
                    substitute: Label::Yes,
                })
                .collect(),
        }
    }

    #[test]
    fn unique_keys_merge_one_to_one() {
        let t1 = rank("n1", &[("A", "x1"), ("B", "y1")]);
        let t2 = rank("n2", &[("B", "y2"), ("A", "x2")]);
        let m = merge_ranks(&[t1, t2], MergePolicy::RequireUnique).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.rows[0].product_title, "A");
        assert_eq!(m.rows[0].ranks[1].alternate_title, "x2");
        let json = m.to_json_rows();
        assert_eq!(json[1]["n2_purchased_product_title"], "y2");
        assert_eq!(json[1]["n2_substitute"], "yes");
    }

    #[test]
    fn duplicate_keys_multiply_rows() {
        let t1 = rank("n1", &[("A", "x1"), ("A", "x1b")]);
        let t2 = rank("n2", &[("A", "x2"), ("A", "x2b"), ("A", "x2c")]);
        let m = merge_ranks(&[t1, t2], MergePolicy::AllowDuplicates).unwrap();
        assert_eq!(m.len(), 6);
    }

    #[test]
    fn duplicate_keys_rejected_when_unique_required() {
        let t1 = rank("n1", &[("A", "x1"), ("A", "x1b")]);
        let t2 = rank("n2", &[("A", "x2")]);
        let err = merge_ranks(&[t1, t2], MergePolicy::RequireUnique).unwrap_err();
        assert!(err.to_string().contains("duplicate product_title 'A'"));
    }

    #[test]
    fn unmatched_keys_drop_out() {
        let t1 = rank("n1", &[("A", "x1"), ("B", "y1")]);
        let t2 = rank("n2", &[("A", "x2")]);
        let m = merge_ranks(&[t1, t2], MergePolicy::RequireUnique).unwrap();
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(merge_ranks(&[], MergePolicy::default()).is_err());
    }
}
