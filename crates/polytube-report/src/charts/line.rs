use std::path::Path;

use ab_glyph::FontVec;

use super::canvas::{draw_categories, palette, ChartCanvas, PlotArea, ValueAxis};
use super::{legend_entries, series_max, Labels, Series};
use crate::error::ReportError;

/// One line per series across `categories`, with point markers.
///
/// With `log_scale`, zero values sit on the axis floor.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_line_chart(
    path: &Path,
    font: Option<&FontVec>,
    labels: Labels<'_>,
    categories: &[String],
    series: &[Series],
    log_scale: bool,
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(labels.title);
    let area = PlotArea::for_canvas(&canvas, 220.0);

    let max = series_max(series);
    let axis = if log_scale {
        let min_positive = series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        ValueAxis::log(if min_positive.is_finite() { min_positive } else { 1.0 }, max)
    } else {
        ValueAxis::linear(0.0, max)
    };
    axis.draw(&mut canvas, &area, labels.y);
    draw_categories(&mut canvas, &area, categories, labels.x);

    let count = categories.len();
    for (i, s) in series.iter().enumerate() {
        let color = palette(i);
        let points: Vec<(f32, f32)> = s
            .values
            .iter()
            .take(count)
            .enumerate()
            .map(|(j, v)| (area.band_center(j, count), axis.project(*v, &area)))
            .collect();
        for pair in points.windows(2) {
            canvas.thick_line(pair[0], pair[1], color);
        }
        for point in points {
            canvas.dot(point, 4, color);
        }
    }

    canvas.legend(area.right + 20.0, area.top, &legend_entries(series));
    canvas.save(path)
}
