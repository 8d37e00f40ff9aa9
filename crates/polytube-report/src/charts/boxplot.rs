use std::path::Path;

use ab_glyph::FontVec;
use image::Rgba;

use super::canvas::{draw_categories, palette, ChartCanvas, PlotArea, ValueAxis, AXIS, BLACK};
use super::Labels;
use crate::aggregate::{BoxStats, Distributions};
use crate::error::ReportError;

fn lighten(color: Rgba<u8>) -> Rgba<u8> {
    let soft = |c: u8| ((u16::from(c) + 2 * 255) / 3) as u8;
    Rgba([soft(color[0]), soft(color[1]), soft(color[2]), 255])
}

/// Box plots per group, one box per hue inside each group.
///
/// Empty cells leave a gap.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_box_plot(
    path: &Path,
    font: Option<&FontVec>,
    labels: Labels<'_>,
    distributions: &Distributions,
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(labels.title);
    let with_legend = distributions.has_hues();
    let area = PlotArea::for_canvas(&canvas, if with_legend { 220.0 } else { 0.0 });

    let all = distributions.values.iter().flatten().flatten().copied();
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let axis = if min.is_finite() {
        ValueAxis::linear(min.min(0.0), max)
    } else {
        ValueAxis::linear(0.0, 1.0)
    };
    axis.draw(&mut canvas, &area, labels.y);
    draw_categories(&mut canvas, &area, &distributions.groups, labels.x);

    let groups = distributions.groups.len();
    let hues = distributions.hues.len().max(1) as f32;
    for (g, cells) in distributions.values.iter().enumerate() {
        let (start, width) = area.band(g, groups);
        let slot = width * 0.8 / hues;
        for (h, values) in cells.iter().enumerate() {
            let Some(stats) = BoxStats::from_values(values) else {
                continue;
            };
            let color = palette(if with_legend { h } else { g });
            let left = start + width * 0.1 + slot * h as f32 + slot * 0.1;
            let right = left + slot * 0.8;
            let center = (left + right) / 2.0;
            draw_box(&mut canvas, &area, &axis, &stats, (left, center, right), color);
        }
    }

    if with_legend {
        let entries: Vec<(String, Rgba<u8>)> = distributions
            .hues
            .iter()
            .enumerate()
            .map(|(i, hue)| (hue.clone(), palette(i)))
            .collect();
        canvas.legend(area.right + 20.0, area.top, &entries);
    }
    canvas.save(path)
}

fn draw_box(
    canvas: &mut ChartCanvas<'_>,
    area: &PlotArea,
    axis: &ValueAxis,
    stats: &BoxStats,
    (left, center, right): (f32, f32, f32),
    color: Rgba<u8>,
) {
    let y = |v: f64| axis.project(v, area);
    let cap = (right - left) / 4.0;

    canvas.line((center, y(stats.lower_whisker)), (center, y(stats.q1)), AXIS);
    canvas.line((center, y(stats.q3)), (center, y(stats.upper_whisker)), AXIS);
    for whisker in [stats.lower_whisker, stats.upper_whisker] {
        canvas.line((center - cap, y(whisker)), (center + cap, y(whisker)), AXIS);
    }

    canvas.fill_rect((left, y(stats.q3)), (right, y(stats.q1)), lighten(color));
    canvas.outline_rect((left, y(stats.q3)), (right, y(stats.q1)), color);
    canvas.thick_line((left, y(stats.median)), (right, y(stats.median)), BLACK);

    for &outlier in &stats.outliers {
        canvas.dot((center, y(outlier)), 3, color);
    }
}
