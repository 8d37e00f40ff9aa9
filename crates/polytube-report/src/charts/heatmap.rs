use std::path::Path;

use ab_glyph::FontVec;
use image::Rgba;

use super::canvas::{shorten, ChartCanvas, BLACK, TICK_SIZE, WHITE};
use super::Labels;
use crate::aggregate::Pivot;
use crate::error::ReportError;

/// Yellow-green-blue ramp, light to dark.
const RAMP: [[u8; 3]; 5] = [
    [255, 255, 217],
    [199, 233, 180],
    [65, 182, 196],
    [34, 94, 168],
    [8, 29, 88],
];

/// Ramp colour at `t` in `[0, 1]`.
fn ramp(t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64;
    let i = (t.floor() as usize).min(RAMP.len() - 2);
    let frac = t - i as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (RAMP[i], RAMP[i + 1]);
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}

/// Annotated heat map of a pivot; rows down the side, columns along the
/// bottom.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_heatmap(
    path: &Path,
    font: Option<&FontVec>,
    labels: Labels<'_>,
    pivot: &Pivot,
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(labels.title);

    let (left, top) = (260.0f32, 80.0f32);
    let right = canvas.width() as f32 - 140.0;
    let bottom = canvas.height() as f32 - 130.0;
    let rows = pivot.rows.len();
    let cols = pivot.columns.len();
    let cell_w = (right - left) / cols.max(1) as f32;
    let cell_h = (bottom - top) / rows.max(1) as f32;
    let max = pivot.cells.iter().flatten().copied().max().unwrap_or(0);

    for (r, row) in pivot.cells.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let t = if max == 0 { 0.0 } else { value as f64 / max as f64 };
            let x = left + cell_w * c as f32;
            let y = top + cell_h * r as f32;
            canvas.fill_rect((x, y), (x + cell_w - 1.0, y + cell_h - 1.0), ramp(t));
            if cell_w >= 24.0 && cell_h >= 16.0 {
                let ink = if t > 0.5 { WHITE } else { BLACK };
                canvas.text_centered(
                    (x + cell_w / 2.0) as i32,
                    (y + cell_h / 2.0 - 8.0) as i32,
                    TICK_SIZE,
                    ink,
                    &value.to_string(),
                );
            }
        }
    }

    for (r, name) in pivot.rows.iter().enumerate() {
        let y = top + cell_h * r as f32 + cell_h / 2.0 - 8.0;
        canvas.text_right((left - 8.0) as i32, y as i32, TICK_SIZE, BLACK, &shorten(name, 30));
    }
    for (c, name) in pivot.columns.iter().enumerate() {
        let x = left + cell_w * c as f32 + cell_w / 2.0;
        let offset = if cols > 10 && c % 2 == 1 { 22 } else { 0 };
        canvas.text_centered(x as i32, bottom as i32 + 8 + offset, TICK_SIZE, BLACK, &shorten(name, 14));
    }
    canvas.text_centered(
        ((left + right) / 2.0) as i32,
        bottom as i32 + 70,
        18.0,
        BLACK,
        labels.x,
    );
    canvas.text(10, (top - 30.0) as i32, 18.0, BLACK, labels.y);

    // Colour bar.
    let bar_left = right + 40.0;
    let steps = 50;
    let step_h = (bottom - top) / steps as f32;
    for s in 0..steps {
        let t = 1.0 - s as f64 / f64::from(steps - 1);
        let y = top + step_h * s as f32;
        canvas.fill_rect((bar_left, y), (bar_left + 24.0, y + step_h + 1.0), ramp(t));
    }
    canvas.text(bar_left as i32 + 30, top as i32, TICK_SIZE, BLACK, &max.to_string());
    canvas.text(bar_left as i32 + 30, bottom as i32 - 16, TICK_SIZE, BLACK, "0");

    canvas.save(path)
}
