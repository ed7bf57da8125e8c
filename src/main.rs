//! Sales Charts - Orders/Products Analysis & Static Chart Viewer
//!
//! Joins orders with products, pivots sales by category against market and
//! region, and renders four charts that are then shown in the system viewer.

mod analysis;
mod charts;
mod config;
mod data;

use analysis::SalesAnalysis;
use anyhow::Context;
use charts::ChartRenderer;
use config::{Settings, CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn init_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_level.as_str())
        .with_target(false)
        .init();

    debug!("Settings: {:?}", settings);
}

/// Open each chart with the platform's default image viewer.
fn show_charts(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = open::that(path) {
            warn!("Could not open {}: {}", path.display(), e);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load settings")?;
    init_logging(&settings);

    let analysis = SalesAnalysis::build(&settings).context("Failed to prepare sales data")?;

    let charts = ChartRenderer::render_all(&analysis, &settings)
        .context("Failed to render charts")?;
    info!(
        "{} charts written to {}",
        charts.len(),
        settings.chart_dir().display()
    );

    if settings.open_charts {
        show_charts(&charts);
    }

    Ok(())
}
