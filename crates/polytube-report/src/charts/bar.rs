use std::path::Path;

use ab_glyph::FontVec;

use super::canvas::{draw_categories, palette, ChartCanvas, PlotArea, ValueAxis};
use super::{legend_entries, series_max, Labels, Series};
use crate::error::ReportError;

/// Side-by-side bars: one cluster per category, one bar per series.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_grouped_bars(
    path: &Path,
    font: Option<&FontVec>,
    labels: Labels<'_>,
    categories: &[String],
    series: &[Series],
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(labels.title);
    let area = PlotArea::for_canvas(&canvas, 220.0);

    let axis = ValueAxis::linear(0.0, series_max(series));
    axis.draw(&mut canvas, &area, labels.y);
    draw_categories(&mut canvas, &area, categories, labels.x);

    let count = categories.len();
    let per_cluster = series.len().max(1) as f32;
    for c in 0..count {
        let (start, width) = area.band(c, count);
        let inner = width * 0.8;
        let bar = inner / per_cluster;
        for (i, s) in series.iter().enumerate() {
            let value = s.values.get(c).copied().unwrap_or(0.0);
            let x = start + width * 0.1 + bar * i as f32;
            canvas.fill_rect(
                (x, axis.project(0.0, &area)),
                (x + bar - 1.0, axis.project(value, &area)),
                palette(i),
            );
        }
    }

    canvas.legend(area.right + 20.0, area.top, &legend_entries(series));
    canvas.save(path)
}

/// Stacked bars: series are piled per category in order.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_stacked_bars(
    path: &Path,
    font: Option<&FontVec>,
    labels: Labels<'_>,
    categories: &[String],
    series: &[Series],
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(labels.title);
    let area = PlotArea::for_canvas(&canvas, 220.0);

    let count = categories.len();
    let totals: Vec<f64> = (0..count)
        .map(|c| series.iter().filter_map(|s| s.values.get(c)).sum::<f64>())
        .collect();
    let axis = ValueAxis::linear(0.0, totals.iter().copied().fold(0.0, f64::max));
    axis.draw(&mut canvas, &area, labels.y);
    draw_categories(&mut canvas, &area, categories, labels.x);

    for c in 0..count {
        let (start, width) = area.band(c, count);
        let (left, right) = (start + width * 0.15, start + width * 0.85);
        let mut base = 0.0;
        for (i, s) in series.iter().enumerate() {
            let value = s.values.get(c).copied().unwrap_or(0.0);
            if value <= 0.0 {
                continue;
            }
            let top = base + value;
            canvas.fill_rect(
                (left, axis.project(base, &area)),
                (right, axis.project(top, &area)),
                palette(i),
            );
            base = top;
        }
    }

    canvas.legend(area.right + 20.0, area.top, &legend_entries(series));
    canvas.save(path)
}
