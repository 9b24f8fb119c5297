// src/classify/vocabulary.rs
//! Keyword-list classifier for the pet food family.
//!
//! Titles and catalog are lower-cased before any comparison. Substitutes are
//! detected with a fixed vocabulary: the brand token `hill's` followed by the
//! diet/format/treat terms. Only the first (leftmost) vocabulary hit of a title
//! is inspected:
//! - no hit                  -> no
//! - first hit is the brand  -> no
//! - first hit is any term   -> yes
//!
//! There is no reference-title check here, unlike `BrandKeywordClassifier`.

use super::{AlternateClassifier, BaseColumns, ClassificationTable, Label};
use crate::catalog::Catalog;
use crate::table::PurchaseTable;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

pub const BRAND_TOKEN: &str = "hill's";

/// Alternation order matters: at equal positions the earlier term wins.
pub const PET_FOOD_VOCABULARY: &str = "(hill's)|(dog food)|(cat food)|(dog treats)|(cat treats)|(wet dog food)|(wet cat food)|(dry dog food)|(dry cat food)|(dry dog treats)|(dry cat treats)|(wet dog treats)|(wet cat treats)|(chews)";

static VOCABULARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(PET_FOOD_VOCABULARY).expect("pet food vocabulary regex"));

/// Outcome of scanning one lower-cased title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyHit<'a> {
    None,
    Brand,
    Term(&'a str),
}

/// First vocabulary hit in an already lower-cased title.
pub fn first_hit(lowered: &str) -> VocabularyHit<'_> {
    match VOCABULARY.captures(lowered) {
        None => VocabularyHit::None,
        Some(caps) if caps.get(1).is_some() => VocabularyHit::Brand,
        Some(caps) => VocabularyHit::Term(caps.get(0).map_or("", |m| m.as_str())),
    }
}

#[derive(Debug, Clone)]
pub struct VocabularyClassifier {
    catalog_lower: Catalog,
}

impl VocabularyClassifier {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            catalog_lower: catalog.lowercased(),
        }
    }

    fn substitute(lowered: &str) -> Label {
        match first_hit(lowered) {
            VocabularyHit::None | VocabularyHit::Brand => Label::No,
            VocabularyHit::Term(_) => Label::Yes,
        }
    }
}

impl AlternateClassifier for VocabularyClassifier {
    fn classify(&self, table: &PurchaseTable, column: &str) -> Result<ClassificationTable> {
        let base = BaseColumns::read(table, column)?;
        let lowered: Vec<String> = base.alternates.iter().map(|t| t.to_lowercase()).collect();

        let internal = lowered
            .iter()
            .map(|t| Label::from_bool(self.catalog_lower.contains(t)))
            .collect();
        let substitute = lowered.iter().map(|t| Self::substitute(t)).collect();

        Ok(base.into_table(column, internal, substitute, self.variant()))
    }

    fn variant(&self) -> &'static str {
        "vocabulary"
    }
}
