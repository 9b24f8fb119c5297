// src/report/chart.rs
//! Percentage bar charts of label shares, rendered with Plotters.

use crate::classify::Label;
use crate::report::counts::print_shares;
use anyhow::Result;
use metrics::counter;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// How a label is named on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareKind {
    Internal,
    Substitute,
}

impl ShareKind {
    pub fn axis_name(self, label: Label) -> &'static str {
        match (self, label) {
            (ShareKind::Internal, Label::Yes) => "Internal",
            (ShareKind::Internal, Label::No) => "External",
            (ShareKind::Substitute, Label::Yes) => "Yes",
            (ShareKind::Substitute, Label::No) => "No",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ShareKind::Internal => "Share of Alternate Purchases: Internal Product",
            ShareKind::Substitute => "Substitute Products",
        }
    }
}

fn draw_share_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    shares: &[(Label, f64)],
    kind: ShareKind,
    caption: &str,
    y_desc: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let names: Vec<&'static str> = shares.iter().map(|(l, _)| kind.axis_name(*l)).collect();
    let n = shares.len().max(1) as i32;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => names
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(20)
            .data(shares.iter().enumerate().map(|(i, (_, pct))| (i as i32, *pct))),
    )?;

    Ok(())
}

/// Single bar chart of one label distribution.
pub fn render_share_chart(shares: &[(Label, f64)], kind: ShareKind, output_path: &Path) -> Result<()> {
    print_shares(kind.title(), shares);

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_share_panel(&root, shares, kind, kind.title(), "Percentage")?;
    root.present()?;

    counter!("report_charts_rendered_total").increment(1);
    info!(target: "report", path = %output_path.display(), "share chart saved");
    Ok(())
}

/// One panel per rank, side by side ("Frequently Purchased 1".."N").
pub fn render_rank_grid(
    per_rank: &[Vec<(Label, f64)>],
    kind: ShareKind,
    title: &str,
    output_path: &Path,
) -> Result<()> {
    for shares in per_rank {
        print_shares(title, shares);
    }

    let cols = per_rank.len().max(1);
    let root = BitMapBackend::new(output_path, (400 * cols as u32, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 36))?;

    for (i, (panel, shares)) in root
        .split_evenly((1, cols))
        .iter()
        .zip(per_rank.iter())
        .enumerate()
    {
        let y_desc = if i == 0 { "Percentage" } else { "" };
        let caption = format!("Frequently Purchased {}", i + 1);
        draw_share_panel(panel, shares, kind, &caption, y_desc)?;
    }
    root.present()?;

    counter!("report_charts_rendered_total").increment(1);
    info!(target: "report", path = %output_path.display(), panels = per_rank.len(), "rank grid saved");
    Ok(())
}
