//! Alternate-purchase report — binary entrypoint.
//! Loads the report config, classifies every configured rank, writes the JSON
//! exports and renders the share charts.

use alt_purchase_analyzer::config::ReportConfig;
use alt_purchase_analyzer::run_report;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs; `RUST_LOG` wins over the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog=info,source=info,classify=info,report=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ReportConfig::from_toml()?;
    let summary = run_report(&cfg, cfg.charts)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
