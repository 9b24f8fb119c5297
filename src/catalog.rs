// src/catalog.rs
//! Internal product catalog: the distinct product titles considered "ours".

use crate::table::{PurchaseTable, PRODUCT_TITLE};
use anyhow::Result;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    titles: Vec<String>,
    index: HashSet<String>,
}

impl Catalog {
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cat = Catalog::default();
        for t in titles {
            let t = t.into();
            if cat.index.insert(t.clone()) {
                cat.titles.push(t);
            }
        }
        cat
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, title: &str) -> bool {
        self.index.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    /// Lower-cased copy; titles that collide after lowering collapse into one.
    pub fn lowercased(&self) -> Catalog {
        Catalog::from_titles(self.titles.iter().map(|t| t.to_lowercase()))
    }
}

/// Distinct `product_title` values of `table`.
pub fn product_catalog(table: &PurchaseTable) -> Result<Catalog> {
    let catalog = Catalog::from_titles(table.distinct_text(PRODUCT_TITLE)?);
    info!(target: "catalog", size = catalog.len(), "There are {} unique products", catalog.len());
    Ok(catalog)
}

/// Rows whose `product_title` contains `keyword` (case-sensitive).
pub fn subcategory(table: &PurchaseTable, keyword: &str) -> Result<PurchaseTable> {
    table.filter_contains(PRODUCT_TITLE, keyword)
}
