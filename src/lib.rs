// src/lib.rs
// Public library surface for the report binary and integration tests.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod table;

// ---- Re-exports for stable public API ----
pub use crate::catalog::{product_catalog, subcategory, Catalog};
pub use crate::classify::{
    classify_ranks, column_prefix, AlternateClassifier, BrandKeywordClassifier,
    ClassificationRecord, ClassificationTable, ClassifierConfig, Label, VocabularyClassifier,
};
pub use crate::pipeline::{run_report, ReportSummary};
pub use crate::table::{Cell, PurchaseTable, Row};
