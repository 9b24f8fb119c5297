// src/classify/brand_keyword.rs
//! Generic classifier driven by one brand string and one category keyword.
//!
//! Internal: exact, case-sensitive membership in the internal catalog.
//!
//! Substitute, first matching case wins:
//! 1. alternate title is one of this table's own `product_title` values -> no
//! 2. keyword absent, brand present -> no (same brand, other category)
//! 3. keyword present, brand absent -> yes (competitor in the category)
//! 4. otherwise -> no
//!
//! Case 1 checks the table's reference titles, not the internal catalog used for
//! `internal`. The two sets usually differ (the catalog may come from another
//! table or a subcategory), and both are kept as they are.

use super::{AlternateClassifier, BaseColumns, ClassificationTable, Label};
use crate::catalog::Catalog;
use crate::table::{PurchaseTable, PRODUCT_TITLE};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_BRAND: &str = "Colgate";
pub const DEFAULT_KEYWORD: &str = "Toothpaste";

/// Brand/keyword pair for one classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub brand: String,
    pub keyword: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            keyword: DEFAULT_KEYWORD.to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn new(brand: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            keyword: keyword.into(),
        }
    }

    /// Same config with another brand.
    pub fn with_brand(&self, brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            keyword: self.keyword.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrandKeywordClassifier {
    catalog: Catalog,
    config: ClassifierConfig,
}

impl BrandKeywordClassifier {
    pub fn new(catalog: Catalog, config: ClassifierConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn substitute(&self, title: &str, reference_titles: &HashSet<&str>) -> Label {
        if reference_titles.contains(title) {
            return Label::No;
        }
        let has_keyword = title.contains(self.config.keyword.as_str());
        let has_brand = title.contains(self.config.brand.as_str());
        match (has_keyword, has_brand) {
            (false, true) => Label::No,
            (true, false) => Label::Yes,
            _ => Label::No,
        }
    }
}

impl AlternateClassifier for BrandKeywordClassifier {
    fn classify(&self, table: &PurchaseTable, column: &str) -> Result<ClassificationTable> {
        let base = BaseColumns::read(table, column)?;
        // A non-text title can never equal a text alternate.
        let reference_titles: HashSet<&str> =
            table.text_cells(PRODUCT_TITLE)?.into_iter().collect();

        let internal = base
            .alternates
            .iter()
            .map(|t| Label::from_bool(self.catalog.contains(t)))
            .collect();
        let substitute = base
            .alternates
            .iter()
            .map(|t| self.substitute(t, &reference_titles))
            .collect();

        Ok(base.into_table(column, internal, substitute, self.variant()))
    }

    fn variant(&self) -> &'static str {
        "brand_keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMN: &str = "n1_purchased_product_title";

    fn table(rows: &[(&str, &str)]) -> PurchaseTable {
        let owned: Vec<[&str; 4]> = rows
            .iter()
            .enumerate()
            .map(|(i, (title, alt))| {
                let asin = if i % 2 == 0 { "B000EVEN" } else { "B000ODD" };
                ["2023-03-01", asin, *title, *alt]
            })
            .collect();
        let refs: Vec<&[&str]> = owned.iter().map(|r| &r[..]).collect();
        PurchaseTable::from_text_rows(&["start_date", "asin", "product_title", COLUMN], &refs)
            .unwrap()
    }

    fn classifier(catalog: &[&str]) -> BrandKeywordClassifier {
        BrandKeywordClassifier::new(
            Catalog::from_titles(catalog.iter().copied()),
            ClassifierConfig::default(),
        )
    }

    fn labels(t: &ClassificationTable) -> Vec<(Label, Label)> {
        t.records.iter().map(|r| (r.internal, r.substitute)).collect()
    }

    #[test]
    fn cascade_cases() {
        let t = table(&[
            ("Colgate Total Toothpaste", "Colgate Optic White Toothpaste"),
            ("Colgate Total Toothpaste", "Crest 3D White Toothpaste"),
            ("Colgate Total Toothpaste", "Colgate Mouthwash"),
            ("Colgate Total Toothpaste", "Oral-B Floss"),
        ]);
        let out = classifier(&["Colgate Total Toothpaste"]).classify(&t, COLUMN).unwrap();
        let subs: Vec<Label> = out.substitute_labels();
        assert_eq!(subs, vec![Label::No, Label::Yes, Label::No, Label::No]);
    }

    #[test]
    fn reference_title_is_never_a_substitute() {
        // "Crest 3D White Toothpaste" would match case 3, but it is also a
        // product_title of this table.
        let t = table(&[
            ("Crest 3D White Toothpaste", "Sensodyne Toothpaste"),
            ("Colgate Total Toothpaste", "Crest 3D White Toothpaste"),
        ]);
        let out = classifier(&[]).classify(&t, COLUMN).unwrap();
        assert_eq!(out.substitute_labels(), vec![Label::Yes, Label::No]);
    }

    #[test]
    fn internal_is_case_sensitive() {
        let t = table(&[
            ("x", "Colgate Total Toothpaste"),
            ("x", "colgate total toothpaste"),
        ]);
        let out = classifier(&["Colgate Total Toothpaste"]).classify(&t, COLUMN).unwrap();
        assert_eq!(
            labels(&out),
            vec![(Label::Yes, Label::No), (Label::No, Label::No)]
        );
    }

    #[test]
    fn substring_match_is_plain() {
        // Lower-case keyword does not match "Toothpaste"; brand embedded in a
        // longer word still counts.
        let t = table(&[("x", "Crest toothpaste"), ("x", "Colgatezz Toothpaste")]);
        let out = classifier(&[]).classify(&t, COLUMN).unwrap();
        assert_eq!(out.substitute_labels(), vec![Label::No, Label::No]);
    }

    #[test]
    fn brand_comes_from_config() {
        let t = table(&[("x", "Colgate Total Toothpaste"), ("x", "Crest Pro Toothpaste")]);
        let cfg = ClassifierConfig::default().with_brand("Crest");
        let out = BrandKeywordClassifier::new(Catalog::default(), cfg)
            .classify(&t, COLUMN)
            .unwrap();
        assert_eq!(out.substitute_labels(), vec![Label::Yes, Label::No]);
        // the default stays untouched
        assert_eq!(ClassifierConfig::default().brand, "Colgate");
    }

    #[test]
    fn missing_alternate_column_fails() {
        let t = table(&[("x", "y")]);
        let err = classifier(&[]).classify(&t, "n2_purchased_product_title").unwrap_err();
        assert!(err.to_string().contains("n2_purchased_product_title"));
    }
}
