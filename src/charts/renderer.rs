//! Static Chart Renderer
//! Draws the four sales charts to PNG files with plotters.
//!
//! 1. Heatmap: sales by category and market
//! 2. Heatmap: sales by category and region
//! 3. Scatter: top five products per category (size = total sales)
//! 4. Bubble: profit vs sales per order (size = quantity)
//!
//! Categorical axes use a half-step integer grid: label `i` sits at `2 * i + 1`
//! so cell centres and tick labels line up.

use crate::analysis::SalesAnalysis;
use crate::charts::plotter::{
    annotation_color, padded_range, palette, sample, ColorScale, SizeScale, COOLWARM, MAGMA,
    MISSING_CELL,
};
use crate::config::Settings;
use crate::data::{JoinedRecord, PivotTable, TopProduct};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const BUBBLE_ALPHA: f64 = 0.75;
const COLOR_BAR_STEPS: usize = 100;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot create chart directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to render {chart}: {message}")]
    Draw { chart: String, message: String },
}

/// One heatmap cell on the half-step grid; `value` is `None` for empty combinations.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub x: i32,
    pub y: i32,
    pub value: Option<f64>,
}

/// Lay pivot cells out with the first row at the top.
pub fn heatmap_cells(pivot: &PivotTable) -> Vec<HeatmapCell> {
    let rows = pivot.row_labels();
    let columns = pivot.column_labels();
    let n_rows = rows.len() as i32;

    let mut cells = Vec::with_capacity(rows.len() * columns.len());
    for (r, row) in rows.iter().enumerate() {
        for (c, column) in columns.iter().enumerate() {
            cells.push(HeatmapCell {
                x: 2 * c as i32,
                y: 2 * (n_rows - 1 - r as i32),
                value: pivot.get(row, column),
            });
        }
    }
    cells
}

/// Label for a half-step grid position; even positions are cell edges.
pub fn label_at(labels: &[String], position: i32) -> String {
    if position < 0 || position % 2 == 0 {
        return String::new();
    }
    labels
        .get((position / 2) as usize)
        .cloned()
        .unwrap_or_default()
}

/// Distinct values in order of first appearance.
pub fn hue_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        if !order.contains(&value) {
            order.push(value);
        }
    }
    order
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render all four charts into the configured directory and return their paths.
    pub fn render_all(
        analysis: &SalesAnalysis,
        settings: &Settings,
    ) -> Result<Vec<PathBuf>, RenderError> {
        let dir = settings.chart_dir();
        fs::create_dir_all(&dir).map_err(|source| RenderError::OutputDir {
            path: dir.clone(),
            source,
        })?;

        let market_path = dir.join("sales_by_category_market.png");
        Self::render(&market_path, |path| {
            Self::draw_heatmap(&analysis.sales_by_market, path, settings.heatmap_size)
        })?;

        let region_path = dir.join("sales_by_category_region.png");
        Self::render(&region_path, |path| {
            Self::draw_heatmap(&analysis.sales_by_region, path, settings.heatmap_size)
        })?;

        let top_path = dir.join("top_products_by_category.png");
        Self::render(&top_path, |path| {
            Self::draw_top_products(&analysis.top_products, path, settings.top_products_size)
        })?;

        let bubble_path = dir.join("profit_vs_sales.png");
        Self::render(&bubble_path, |path| {
            Self::draw_profit_vs_sales(&analysis.joined, path, settings.bubble_size)
        })?;

        Ok(vec![market_path, region_path, top_path, bubble_path])
    }

    fn render(path: &Path, draw: impl FnOnce(&Path) -> DrawResult<()>) -> Result<(), RenderError> {
        draw(path).map_err(|e| RenderError::Draw {
            chart: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!("Rendered {}", path.display());
        Ok(())
    }

    /// Annotated heatmap of a pivot table with a colour bar on the right.
    fn draw_heatmap(pivot: &PivotTable, path: &Path, size: (u32, u32)) -> DrawResult<()> {
        if pivot.is_empty() {
            warn!("{}: no joined rows to plot", pivot.title());
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let rows = pivot.row_labels();
        let columns = pivot.column_labels();
        let n_rows = rows.len().max(1) as i32;
        let n_cols = columns.len().max(1) as i32;

        let (min, max) = pivot.value_range().unwrap_or((0.0, 1.0));
        let scale = ColorScale::new(min, max);

        let bar_width = (size.0 / 10).clamp(80, 160);
        let (main, bar) = root.split_horizontally(size.0.saturating_sub(bar_width) as i32);

        let mut chart = ChartBuilder::on(&main)
            .caption(pivot.title(), (FONT, 26))
            .margin(15)
            .x_label_area_size(55)
            .y_label_area_size(150)
            .build_cartesian_2d(0..2 * n_cols, 0..2 * n_rows)?;

        let column_label = |x: &i32| label_at(&columns, *x);
        let row_label = |y: &i32| {
            if *y % 2 == 0 {
                return String::new();
            }
            let index = n_rows - 1 - *y / 2;
            label_at(&rows, 2 * index + 1)
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels((2 * n_cols + 1) as usize)
            .y_labels((2 * n_rows + 1) as usize)
            .x_label_formatter(&column_label)
            .y_label_formatter(&row_label)
            .x_desc(pivot.column_field.label())
            .y_desc(pivot.row_field.label())
            .label_style((FONT, 14))
            .axis_desc_style((FONT, 16))
            .draw()?;

        let cells = heatmap_cells(pivot);

        chart.draw_series(cells.iter().map(|cell| {
            let fill = cell
                .value
                .map(|v| sample(&COOLWARM, scale.normalize(v)))
                .unwrap_or(MISSING_CELL);
            Rectangle::new([(cell.x, cell.y), (cell.x + 2, cell.y + 2)], fill.filled())
        }))?;

        chart.draw_series(cells.iter().map(|cell| {
            Rectangle::new(
                [(cell.x, cell.y), (cell.x + 2, cell.y + 2)],
                WHITE.stroke_width(1),
            )
        }))?;

        chart.draw_series(cells.iter().filter_map(|cell| {
            let value = cell.value?;
            let fill = sample(&COOLWARM, scale.normalize(value));
            let style = (FONT, 14)
                .into_font()
                .color(&annotation_color(fill))
                .pos(Pos::new(HPos::Center, VPos::Center));
            Some(Text::new(format!("{value:.2}"), (cell.x + 1, cell.y + 1), style))
        }))?;

        Self::draw_color_bar(&bar, min, max)?;

        root.present()?;
        Ok(())
    }

    fn draw_color_bar(
        area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        min: f64,
        max: f64,
    ) -> DrawResult<()> {
        let (lo, hi) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
        let scale = ColorScale::new(lo, hi);

        let mut bar = ChartBuilder::on(area)
            .margin_top(55)
            .margin_bottom(70)
            .margin_right(10)
            .right_y_label_area_size(70)
            .build_cartesian_2d(0f64..1f64, lo..hi)?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(6)
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style((FONT, 12))
            .draw()?;

        let step = (hi - lo) / COLOR_BAR_STEPS as f64;
        bar.draw_series((0..COLOR_BAR_STEPS).map(|i| {
            let y0 = lo + step * i as f64;
            let color = sample(&COOLWARM, scale.normalize(y0 + step / 2.0));
            Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
        }))?;

        Ok(())
    }

    /// Profit per product, one row per product, hue by category, size by total sales.
    fn draw_top_products(products: &[TopProduct], path: &Path, size: (u32, u32)) -> DrawResult<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let names: Vec<String> = hue_order(products.iter().map(|p| p.product_name.as_str()))
            .into_iter()
            .map(str::to_string)
            .collect();
        let categories = hue_order(products.iter().map(|p| p.category.as_str()));
        let colors = palette(&MAGMA, categories.len(), false);
        let sizes = SizeScale::from_values(products.iter().map(|p| p.total_sales));

        let (x_min, x_max) = padded_range(products.iter().map(|p| p.total_profit), 0.08);
        let n_names = names.len().max(1) as i32;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d(x_min..x_max, 0..2 * n_names)?;

        let name_label = |y: &i32| label_at(&names, *y);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels((2 * n_names + 1) as usize)
            .y_label_formatter(&name_label)
            .x_desc("Product Total Profit")
            .y_desc("Product Name")
            .label_style((FONT, 13))
            .axis_desc_style((FONT, 16))
            .draw()?;

        for (category, color) in categories.iter().zip(colors) {
            chart
                .draw_series(
                    products
                        .iter()
                        .filter(|p| p.category == *category)
                        .filter_map(|p| {
                            let row = names.iter().position(|n| *n == p.product_name)? as i32;
                            Some(Circle::new(
                                (p.total_profit, 2 * row + 1),
                                sizes.radius(p.total_sales),
                                color.filled(),
                            ))
                        }),
                )?
                .label(*category)
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((FONT, 13))
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// One bubble per joined order: sales against profit, hue by category, size by quantity.
    fn draw_profit_vs_sales(rows: &[JoinedRecord], path: &Path, size: (u32, u32)) -> DrawResult<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let categories = hue_order(rows.iter().map(|r| r.category.as_str()));
        let colors = palette(&MAGMA, categories.len(), true);
        let sizes = SizeScale::from_values(rows.iter().map(|r| r.quantity as f64));

        let (x_min, x_max) = padded_range(rows.iter().map(|r| r.sales), 0.05);
        let (y_min, y_max) = padded_range(rows.iter().map(|r| r.profit), 0.05);

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Total Sales")
            .y_desc("Total Profit")
            .label_style((FONT, 13))
            .axis_desc_style((FONT, 16))
            .draw()?;

        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label("Product")
            .legend(|(x, y)| PathElement::new(vec![(x, y)], &TRANSPARENT));

        for (category, color) in categories.iter().zip(colors) {
            chart
                .draw_series(
                    rows.iter()
                        .filter(|r| r.category == *category)
                        .map(|r| {
                            Circle::new(
                                (r.sales, r.profit),
                                sizes.radius(r.quantity as f64),
                                color.mix(BUBBLE_ALPHA).filled(),
                            )
                        }),
                )?
                .label(*category)
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((FONT, 13))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{KeyField, ValueField};

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn heatmap_cells_put_first_row_on_top() {
        let mut pivot = PivotTable::new(ValueField::Sales, KeyField::Category, KeyField::Market);
        pivot.add("A", "EU", 1.0);
        pivot.add("A", "US", 2.0);
        pivot.add("B", "US", 3.0);

        let cells = heatmap_cells(&pivot);

        assert_eq!(
            cells,
            vec![
                HeatmapCell { x: 0, y: 2, value: Some(1.0) },
                HeatmapCell { x: 2, y: 2, value: Some(2.0) },
                HeatmapCell { x: 0, y: 0, value: None },
                HeatmapCell { x: 2, y: 0, value: Some(3.0) },
            ]
        );
    }

    #[test]
    fn labels_only_at_cell_centres() {
        let names = labels(&["EU", "US"]);
        assert_eq!(label_at(&names, 1), "EU");
        assert_eq!(label_at(&names, 3), "US");
        assert_eq!(label_at(&names, 0), "");
        assert_eq!(label_at(&names, 2), "");
        assert_eq!(label_at(&names, 5), "");
        assert_eq!(label_at(&names, -1), "");
    }

    #[test]
    fn hue_order_keeps_first_appearance() {
        let order = hue_order(["Tech", "Office", "Tech", "Furniture", "Office"]);
        assert_eq!(order, vec!["Tech", "Office", "Furniture"]);
    }
}
