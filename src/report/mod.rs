// src/report/mod.rs
//! Reporting on top of classifier output: counts, competitor filtering,
//! rank merging and share charts.

pub mod chart;
pub mod counts;
pub mod merge;

pub use chart::{render_rank_grid, render_share_chart, ShareKind};
pub use counts::{
    alt_product_counts, competitor_rows, label_shares, print_shares, value_counts,
    AltProductCounts,
};
pub use merge::{merge_ranks, MergePolicy, MergedRow, MergedTable, RankCells};
