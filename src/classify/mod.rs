// src/classify/mod.rs
//! Alternate-purchase classification.
//!
//! Each classifier reads one alternate-purchase column of a purchase table and
//! annotates every row with two labels:
//! - `internal`:   is the alternate product part of our catalog?
//! - `substitute`: is it a competitor product of the same category?
//!
//! Two strategies share the same output shape but not the same rules:
//! - `BrandKeywordClassifier`: brand + category keyword, case-sensitive substrings.
//! - `VocabularyClassifier`:   fixed regex vocabulary, lower-cased titles.
//!
//! Matching is plain substring/regex work. A brand name embedded in
//! an unrelated longer word still counts as the brand; that is a known limitation.

pub mod brand_keyword;
pub mod vocabulary;

use crate::table::{PurchaseTable, ASIN, PRODUCT_TITLE, START_DATE};
use anyhow::Result;
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

pub use brand_keyword::{BrandKeywordClassifier, ClassifierConfig};
pub use vocabulary::VocabularyClassifier;

/// Two-valued label. Serialized lower-case; charts and exports rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Yes,
    No,
}

impl Label {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Label::Yes
        } else {
            Label::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Yes => "yes",
            Label::No => "no",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// `n1_purchased_product_title` -> `n1`. A name without `_` is its own prefix.
pub fn column_prefix(column: &str) -> &str {
    column.split('_').next().unwrap_or(column)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub start_date: String,
    pub asin: String,
    pub product_title: String,
    pub alternate_title: String,
    pub internal: Label,
    pub substitute: Label,
}

/// Classifier output for one alternate-purchase column.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTable {
    /// Source column, e.g. `n1_purchased_product_title`.
    pub column: String,
    /// Derived prefix, e.g. `n1`.
    pub prefix: String,
    pub records: Vec<ClassificationRecord>,
}

impl ClassificationTable {
    pub fn internal_column(&self) -> String {
        format!("{}_internal", self.prefix)
    }

    pub fn substitute_column(&self) -> String {
        format!("{}_substitute", self.prefix)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn internal_labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.internal).collect()
    }

    pub fn substitute_labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.substitute).collect()
    }

    pub fn alternate_titles(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.alternate_title.as_str())
            .collect()
    }

    /// Rows keyed by their exported column names:
    /// `start_date, asin, product_title, <column>, <prefix>_internal, <prefix>_substitute`.
    pub fn to_json_rows(&self) -> Vec<Value> {
        let internal_col = self.internal_column();
        let substitute_col = self.substitute_column();
        self.records
            .iter()
            .map(|r| {
                let mut m = Map::new();
                m.insert(START_DATE.into(), Value::from(r.start_date.as_str()));
                m.insert(ASIN.into(), Value::from(r.asin.as_str()));
                m.insert(PRODUCT_TITLE.into(), Value::from(r.product_title.as_str()));
                m.insert(self.column.clone(), Value::from(r.alternate_title.as_str()));
                m.insert(internal_col.clone(), Value::from(r.internal.as_str()));
                m.insert(substitute_col.clone(), Value::from(r.substitute.as_str()));
                Value::Object(m)
            })
            .collect()
    }
}

/// Common contract of both classification strategies.
pub trait AlternateClassifier {
    /// Classify every row of `table` by its `column` value. Output keeps row
    /// count and order.
    fn classify(&self, table: &PurchaseTable, column: &str) -> Result<ClassificationTable>;

    /// Short name used in logs and metrics.
    fn variant(&self) -> &'static str;
}

/// Classify several rank columns (`n1`..`n5`) one after another.
pub fn classify_ranks(
    classifier: &dyn AlternateClassifier,
    table: &PurchaseTable,
    columns: &[String],
) -> Result<Vec<ClassificationTable>> {
    columns
        .iter()
        .map(|c| classifier.classify(table, c))
        .collect()
}

/// Pass-through columns shared by both strategies, in row order.
///
/// Only the alternate column must be text. The other three are copied through
/// as rendered strings, so a numeric `asin` or a null `product_title` does not
/// stop the run.
pub(crate) struct BaseColumns<'t> {
    pub start_dates: Vec<String>,
    pub asins: Vec<String>,
    pub product_titles: Vec<String>,
    pub alternates: Vec<&'t str>,
}

impl<'t> BaseColumns<'t> {
    pub fn read(table: &'t PurchaseTable, column: &str) -> Result<Self> {
        Ok(Self {
            start_dates: table.display_column(START_DATE)?,
            asins: table.display_column(ASIN)?,
            product_titles: table.display_column(PRODUCT_TITLE)?,
            alternates: table.text_column(column)?,
        })
    }

    /// Zip pass-through columns with per-row labels into a table.
    pub fn into_table(
        self,
        column: &str,
        internal: Vec<Label>,
        substitute: Vec<Label>,
        variant: &'static str,
    ) -> ClassificationTable {
        let records: Vec<ClassificationRecord> = self
            .start_dates
            .into_iter()
            .zip(self.asins)
            .zip(self.product_titles)
            .zip(&self.alternates)
            .enumerate()
            .map(|(i, (((start_date, asin), product_title), alt))| ClassificationRecord {
                start_date,
                asin,
                product_title,
                alternate_title: alt.to_string(),
                internal: internal[i],
                substitute: substitute[i],
            })
            .collect();

        let substitutes = substitute.iter().filter(|l| **l == Label::Yes).count();
        counter!("classify_rows_total", "variant" => variant).increment(records.len() as u64);
        counter!("classify_substitutes_total", "variant" => variant)
            .increment(substitutes as u64);
        debug!(
            target: "classify",
            variant,
            column,
            rows = records.len(),
            substitutes,
            "column classified"
        );

        ClassificationTable {
            column: column.to_string(),
            prefix: column_prefix(column).to_string(),
            records,
        }
    }
}
