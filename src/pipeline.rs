// src/pipeline.rs
//! End-to-end report run: load, classify every rank, merge, export, chart.

use crate::catalog::{product_catalog, subcategory, Catalog};
use crate::classify::{
    classify_ranks, AlternateClassifier, BrandKeywordClassifier, ClassificationTable,
    VocabularyClassifier,
};
use crate::config::{ReportConfig, Variant};
use crate::report::{
    alt_product_counts, competitor_rows, label_shares, merge_ranks, render_rank_grid,
    render_share_chart, MergePolicy, ShareKind,
};
use crate::source::{FileSource, TableSource};
use crate::table::PurchaseTable;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub catalog_size: usize,
    pub ranks: Vec<String>,
    pub merged_rows: Option<usize>,
    pub competitor_rows: Option<usize>,
    pub files: Vec<PathBuf>,
}

pub fn build_classifier(cfg: &ReportConfig, catalog: Catalog) -> Box<dyn AlternateClassifier> {
    match cfg.variant {
        Variant::BrandKeyword => Box::new(BrandKeywordClassifier::new(
            catalog,
            cfg.classifier_config(),
        )),
        Variant::Vocabulary => Box::new(VocabularyClassifier::new(&catalog)),
    }
}

fn load_catalog(cfg: &ReportConfig, input: &PurchaseTable) -> Result<Catalog> {
    let owned;
    let source_table = if cfg.catalog_input.is_some() {
        owned = FileSource::new(cfg.catalog_path().clone()).fetch()?;
        &owned
    } else {
        input
    };
    match &cfg.subcategory {
        Some(keyword) => product_catalog(&subcategory(source_table, keyword)?),
        None => product_catalog(source_table),
    }
}

fn write_json(path: &Path, rows: &[serde_json::Value]) -> Result<()> {
    let body = serde_json::to_string_pretty(rows)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

/// Run the full report. Charts are skipped when `charts` is false.
pub fn run_report(cfg: &ReportConfig, charts: bool) -> Result<ReportSummary> {
    let table = FileSource::new(cfg.input.clone()).fetch()?;
    let catalog = load_catalog(cfg, &table)?;
    let classifier = build_classifier(cfg, catalog.clone());

    let tables: Vec<ClassificationTable> = classify_ranks(classifier.as_ref(), &table, &cfg.columns)?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;

    let mut summary = ReportSummary {
        rows: table.len(),
        catalog_size: catalog.len(),
        ranks: tables.iter().map(|t| t.prefix.clone()).collect(),
        ..Default::default()
    };

    for t in &tables {
        let path = cfg.output_dir.join(format!("{}_classified.json", t.prefix));
        write_json(&path, &t.to_json_rows())?;
        summary.files.push(path);

        let counts = alt_product_counts(&table, &t.column)?;
        println!("{:<60} {}", counts.title_column, counts.count_column);
        for (title, n) in counts.counts.iter().take(10) {
            println!("{title:<60} {n}");
        }
    }

    if tables.len() > 1 {
        let policy = MergePolicy::from_require_unique(cfg.require_unique_merge_keys);
        let merged = merge_ranks(&tables, policy)?;
        let path = cfg.output_dir.join("merged.json");
        write_json(&path, &merged.to_json_rows())?;
        summary.merged_rows = Some(merged.len());
        summary.files.push(path);
    }

    if let (Some(keyword), Some(first)) = (&cfg.competitor, cfg.columns.first()) {
        summary.competitor_rows = Some(competitor_rows(&table, first, keyword)?.len());
    }

    if let (true, Some(first)) = (charts, tables.first()) {
        let internal = label_shares(&first.internal_labels());
        let substitute = label_shares(&first.substitute_labels());

        let path = cfg.output_dir.join("internal_share.png");
        render_share_chart(&internal, ShareKind::Internal, &path)?;
        summary.files.push(path);

        let path = cfg.output_dir.join("substitute_share.png");
        render_share_chart(&substitute, ShareKind::Substitute, &path)?;
        summary.files.push(path);

        let per_rank_internal: Vec<_> = tables
            .iter()
            .map(|t| label_shares(&t.internal_labels()))
            .collect();
        let path = cfg.output_dir.join("internal_by_rank.png");
        render_rank_grid(&per_rank_internal, ShareKind::Internal, "Internal Product", &path)?;
        summary.files.push(path);

        let per_rank_substitute: Vec<_> = tables
            .iter()
            .map(|t| label_shares(&t.substitute_labels()))
            .collect();
        let path = cfg.output_dir.join("substitute_by_rank.png");
        render_rank_grid(
            &per_rank_substitute,
            ShareKind::Substitute,
            "Substitute Product",
            &path,
        )?;
        summary.files.push(path);
    }

    info!(
        target: "report",
        rows = summary.rows,
        catalog = summary.catalog_size,
        ranks = summary.ranks.len(),
        files = summary.files.len(),
        "report finished"
    );
    Ok(summary)
}
