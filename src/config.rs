// src/config.rs
//! Report configuration (TOML) with environment overrides.
//!
//! Resolution order for the file: `$ALT_PURCHASE_CONFIG_PATH`, then
//! `config/alt_purchase.toml`. `ALT_PURCHASE_BRAND`, `ALT_PURCHASE_KEYWORD` and
//! `ALT_PURCHASE_INPUT` override the matching fields after parsing;
//! `ALT_PURCHASE_NO_CHARTS=1` turns `charts` off.

use crate::classify::brand_keyword::{DEFAULT_BRAND, DEFAULT_KEYWORD};
use crate::classify::ClassifierConfig;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/alt_purchase.toml";

pub const ENV_CONFIG_PATH: &str = "ALT_PURCHASE_CONFIG_PATH";
pub const ENV_BRAND: &str = "ALT_PURCHASE_BRAND";
pub const ENV_KEYWORD: &str = "ALT_PURCHASE_KEYWORD";
pub const ENV_INPUT: &str = "ALT_PURCHASE_INPUT";
pub const ENV_NO_CHARTS: &str = "ALT_PURCHASE_NO_CHARTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    BrandKeyword,
    Vocabulary,
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}
fn default_keyword() -> String {
    DEFAULT_KEYWORD.to_string()
}
fn default_columns() -> Vec<String> {
    (1..=5)
        .map(|n| format!("n{n}_purchased_product_title"))
        .collect()
}
fn default_competitor() -> Option<String> {
    Some("Crest".to_string())
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}
fn default_charts() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Purchase table (`.csv` or `.json`).
    pub input: PathBuf,
    /// Table whose `product_title` column forms the internal catalog.
    /// Defaults to `input`.
    #[serde(default)]
    pub catalog_input: Option<PathBuf>,
    /// Keep only catalog rows whose title contains this keyword.
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    #[serde(default = "default_competitor")]
    pub competitor: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub require_unique_merge_keys: bool,
    /// Render the PNG share charts next to the JSON exports.
    #[serde(default = "default_charts")]
    pub charts: bool,
}

impl ReportConfig {
    /// Load from `$ALT_PURCHASE_CONFIG_PATH` or the default path, then apply
    /// env overrides.
    pub fn from_toml() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read report config at {}", path.display()))?;

        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: ReportConfig = toml::from_str(toml_str)?;
        if cfg.columns.is_empty() {
            return Err(anyhow!("report config: `columns` must not be empty"));
        }
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(b) = non_empty_env(ENV_BRAND) {
            self.brand = b;
        }
        if let Some(k) = non_empty_env(ENV_KEYWORD) {
            self.keyword = k;
        }
        if let Some(i) = non_empty_env(ENV_INPUT) {
            self.input = PathBuf::from(i);
        }
        if non_empty_env(ENV_NO_CHARTS).as_deref() == Some("1") {
            self.charts = false;
        }
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::new(self.brand.clone(), self.keyword.clone())
    }

    pub fn catalog_path(&self) -> &PathBuf {
        self.catalog_input.as_ref().unwrap_or(&self.input)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = ReportConfig::from_toml_str(r#"input = "data/purchases.csv""#).unwrap();
        assert_eq!(cfg.variant, Variant::BrandKeyword);
        assert_eq!(cfg.brand, "Colgate");
        assert_eq!(cfg.keyword, "Toothpaste");
        assert_eq!(cfg.columns.len(), 5);
        assert_eq!(cfg.columns[4], "n5_purchased_product_title");
        assert_eq!(cfg.competitor.as_deref(), Some("Crest"));
        assert_eq!(cfg.catalog_path(), &PathBuf::from("data/purchases.csv"));
        assert!(!cfg.require_unique_merge_keys);
        assert!(cfg.charts);
    }

    #[test]
    fn vocabulary_variant_parses() {
        let cfg = ReportConfig::from_toml_str(
            r#"
input = "pets.json"
variant = "vocabulary"
columns = ["n1_purchased_product_title"]
charts = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.variant, Variant::Vocabulary);
        assert_eq!(cfg.columns, vec!["n1_purchased_product_title".to_string()]);
        assert!(!cfg.charts);
    }

    #[test]
    fn empty_columns_rejected() {
        let err = ReportConfig::from_toml_str("input = \"x.csv\"\ncolumns = []").unwrap_err();
        assert!(err.to_string().contains("columns"));
    }
}
