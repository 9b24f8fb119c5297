// src/report/counts.rs
//! Value counts, competitor filtering, and label shares.

use crate::classify::{column_prefix, Label};
use crate::table::PurchaseTable;
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::info;

/// Count equal values; descending by count, ties in first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Hash + Eq + Copy,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<(T, usize)> = Vec::new();
    let mut slot: HashMap<T, usize> = HashMap::new();
    for v in values {
        match slot.get(&v).copied() {
            Some(i) => order[i].1 += 1,
            None => {
                slot.insert(v, order.len());
                order.push((v, 1));
            }
        }
    }
    // stable: ties keep first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Counts of one alternate-purchase column, named after its prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct AltProductCounts {
    pub title_column: String,
    pub count_column: String,
    pub counts: Vec<(String, usize)>,
}

pub fn alt_product_counts(table: &PurchaseTable, column: &str) -> Result<AltProductCounts> {
    let prefix = column_prefix(column);
    let counts = value_counts(table.text_column(column)?)
        .into_iter()
        .map(|(title, n)| (title.to_string(), n))
        .collect();
    Ok(AltProductCounts {
        title_column: format!("{prefix}_purchased_product_title"),
        count_column: format!("{prefix}_purchased_product_count"),
        counts,
    })
}

/// Rows whose `column` mentions `keyword` (case-sensitive), e.g. a named competitor.
pub fn competitor_rows(table: &PurchaseTable, column: &str, keyword: &str) -> Result<PurchaseTable> {
    let rows = table.filter_contains(column, keyword)?;
    info!(target: "report", column, keyword, rows = rows.len(), "competitor rows");
    Ok(rows)
}

/// Share of each label in percent, largest first. Empty input gives no shares.
pub fn label_shares(labels: &[Label]) -> Vec<(Label, f64)> {
    if labels.is_empty() {
        return Vec::new();
    }
    let total = labels.len() as f64;
    value_counts(labels.iter().copied())
        .into_iter()
        .map(|(label, n)| (label, n as f64 / total * 100.0))
        .collect()
}

/// Print a share table the way the charts annotate it.
pub fn print_shares(title: &str, shares: &[(Label, f64)]) {
    println!("{title}");
    for (label, pct) in shares {
        println!("{label:<4} {pct:>8.4}");
    }
    println!("************\n");
}
