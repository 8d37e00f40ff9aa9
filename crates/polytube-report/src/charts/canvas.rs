//! Drawing primitives shared by every chart.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_text_mut,
};
use imageproc::rect::Rect;

use crate::error::ReportError;
use crate::tables::ensure_parent_dir;

pub const WIDTH: u32 = 1400;
pub const HEIGHT: u32 = 850;

pub const TITLE_SIZE: f32 = 28.0;
pub const LABEL_SIZE: f32 = 18.0;
pub const TICK_SIZE: f32 = 15.0;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([20, 20, 20, 255]);
pub const GRID: Rgba<u8> = Rgba([225, 225, 225, 255]);
pub const AXIS: Rgba<u8> = Rgba([90, 90, 90, 255]);

/// Matplotlib's `tab10` cycle.
const PALETTE: [Rgba<u8>; 10] = [
    Rgba([31, 119, 180, 255]),
    Rgba([255, 127, 14, 255]),
    Rgba([44, 160, 44, 255]),
    Rgba([214, 39, 40, 255]),
    Rgba([148, 103, 189, 255]),
    Rgba([140, 86, 75, 255]),
    Rgba([227, 119, 194, 255]),
    Rgba([127, 127, 127, 255]),
    Rgba([188, 189, 34, 255]),
    Rgba([23, 190, 207, 255]),
];

#[must_use]
pub fn palette(index: usize) -> Rgba<u8> {
    PALETTE[index % PALETTE.len()]
}

/// An RGBA image plus the optional label font.
pub struct ChartCanvas<'f> {
    image: RgbaImage,
    font: Option<&'f FontVec>,
}

impl<'f> ChartCanvas<'f> {
    #[must_use]
    pub fn new(font: Option<&'f FontVec>) -> Self {
        Self {
            image: RgbaImage::from_pixel(WIDTH, HEIGHT, WHITE),
            font,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel width of `text`, zero without a font.
    #[must_use]
    pub fn text_width(&self, size: f32, text: &str) -> u32 {
        let Some(font) = self.font else {
            return 0;
        };
        let scaled = font.as_scaled(PxScale::from(size));
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let glyph = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, glyph);
            }
            width += scaled.h_advance(glyph);
            prev = Some(glyph);
        }
        width.ceil() as u32
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn text(&mut self, x: i32, y: i32, size: f32, color: Rgba<u8>, text: &str) {
        if let Some(font) = self.font {
            draw_text_mut(&mut self.image, color, x, y, PxScale::from(size), font, text);
        }
    }

    pub fn text_centered(&mut self, center_x: i32, y: i32, size: f32, color: Rgba<u8>, text: &str) {
        let half = (self.text_width(size, text) / 2) as i32;
        self.text(center_x - half, y, size, color, text);
    }

    pub fn text_right(&mut self, right_x: i32, y: i32, size: f32, color: Rgba<u8>, text: &str) {
        let width = self.text_width(size, text) as i32;
        self.text(right_x - width, y, size, color, text);
    }

    pub fn title(&mut self, title: &str) {
        let center = (self.width() / 2) as i32;
        self.text_centered(center, 18, TITLE_SIZE, BLACK, title);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
        draw_line_segment_mut(&mut self.image, from, to, color);
    }

    /// Two-pixel line.
    pub fn thick_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
        self.line(from, to, color);
        self.line((from.0, from.1 + 1.0), (to.0, to.1 + 1.0), color);
    }

    /// Fill the rectangle spanned by two corners, in either order.
    pub fn fill_rect(&mut self, a: (f32, f32), b: (f32, f32), color: Rgba<u8>) {
        if let Some(rect) = rect_between(a, b) {
            draw_filled_rect_mut(&mut self.image, rect, color);
        }
    }

    pub fn outline_rect(&mut self, a: (f32, f32), b: (f32, f32), color: Rgba<u8>) {
        if let Some(rect) = rect_between(a, b) {
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
    }

    pub fn dot(&mut self, center: (f32, f32), radius: i32, color: Rgba<u8>) {
        draw_filled_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius,
            color,
        );
    }

    /// Colour swatches with names, stacked downwards from (`x`, `y`).
    pub fn legend(&mut self, x: f32, y: f32, entries: &[(String, Rgba<u8>)]) {
        for (i, (name, color)) in entries.iter().enumerate() {
            let top = y + i as f32 * 24.0;
            self.fill_rect((x, top + 3.0), (x + 16.0, top + 17.0), *color);
            self.text((x + 22.0) as i32, top as i32, TICK_SIZE, BLACK, name);
        }
    }

    /// Write the image as PNG, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] for directory failures and
    /// [`ReportError::Chart`] if encoding fails.
    pub fn save(self, path: &Path) -> Result<(), ReportError> {
        ensure_parent_dir(path)?;
        self.image.save(path).map_err(|source| ReportError::Chart {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(file = %path.display(), "chart written");
        Ok(())
    }
}

fn rect_between(a: (f32, f32), b: (f32, f32)) -> Option<Rect> {
    let (left, right) = (a.0.min(b.0), a.0.max(b.0));
    let (top, bottom) = (a.1.min(b.1), a.1.max(b.1));
    let width = (right - left).round() as u32;
    let height = (bottom - top).round() as u32;
    (width > 0 && height > 0)
        .then(|| Rect::at(left.round() as i32, top.round() as i32).of_size(width, height))
}

/// Pixel region inside the margins where data is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotArea {
    /// Standard margins, with `legend_width` reserved on the right.
    #[must_use]
    pub fn for_canvas(canvas: &ChartCanvas<'_>, legend_width: f32) -> Self {
        Self {
            left: 110.0,
            top: 80.0,
            right: canvas.width() as f32 - 40.0 - legend_width,
            bottom: canvas.height() as f32 - 140.0,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal band of category `index` out of `count`: (start, width).
    #[must_use]
    pub fn band(&self, index: usize, count: usize) -> (f32, f32) {
        let width = self.width() / count.max(1) as f32;
        (self.left + width * index as f32, width)
    }

    /// Centre of category `index` out of `count`.
    #[must_use]
    pub fn band_center(&self, index: usize, count: usize) -> f32 {
        let (start, width) = self.band(index, count);
        start + width / 2.0
    }
}

/// Vertical value scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxis {
    min: f64,
    max: f64,
    log: bool,
    ticks: Vec<f64>,
}

impl ValueAxis {
    /// Linear axis over rounded bounds covering `[min, max]`.
    #[must_use]
    pub fn linear(min: f64, max: f64) -> Self {
        let (min, max) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };
        let step = nice_step((max - min) / 5.0);
        let start = (min / step).floor() * step;
        let end = (max / step).ceil() * step;
        let count = ((end - start) / step).round() as usize;
        let ticks = (0..=count).map(|i| start + step * i as f64).collect();
        Self {
            min: start,
            max: end,
            log: false,
            ticks,
        }
    }

    /// Base-10 logarithmic axis over the positive values in `[min, max]`.
    #[must_use]
    pub fn log(min: f64, max: f64) -> Self {
        let low = min.max(1.0).log10().floor() as i32;
        let high = max.max(10.0).log10().ceil().max(f64::from(low + 1)) as i32;
        let ticks = (low..=high).map(|e| 10f64.powi(e)).collect();
        Self {
            min: 10f64.powi(low),
            max: 10f64.powi(high),
            log: true,
            ticks,
        }
    }

    #[must_use]
    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Pixel row of `value`; values outside the axis are clamped.
    #[must_use]
    pub fn project(&self, value: f64, area: &PlotArea) -> f32 {
        let (value, min, max) = if self.log {
            (
                value.max(self.min).log10(),
                self.min.log10(),
                self.max.log10(),
            )
        } else {
            (value, self.min, self.max)
        };
        let fraction = ((value - min) / (max - min)).clamp(0.0, 1.0);
        area.bottom - (fraction as f32) * area.height()
    }

    /// Grid lines, tick labels and the axis title.
    pub fn draw(&self, canvas: &mut ChartCanvas<'_>, area: &PlotArea, title: &str) {
        for &tick in &self.ticks {
            let y = self.project(tick, area);
            canvas.line((area.left, y), (area.right, y), GRID);
            canvas.text_right(
                (area.left - 8.0) as i32,
                (y - 8.0) as i32,
                TICK_SIZE,
                AXIS,
                &format_tick(tick),
            );
        }
        canvas.line((area.left, area.top), (area.left, area.bottom), AXIS);
        canvas.line((area.left, area.bottom), (area.right, area.bottom), AXIS);
        canvas.text(10, (area.top - 30.0) as i32, LABEL_SIZE, BLACK, title);
    }
}

/// Category names under the plot plus the x-axis title.
pub fn draw_categories(
    canvas: &mut ChartCanvas<'_>,
    area: &PlotArea,
    categories: &[String],
    title: &str,
) {
    let count = categories.len();
    let stagger = count > 12;
    for (i, name) in categories.iter().enumerate() {
        let x = area.band_center(i, count) as i32;
        let offset = if stagger && i % 2 == 1 { 22 } else { 0 };
        canvas.text_centered(
            x,
            area.bottom as i32 + 10 + offset,
            TICK_SIZE,
            AXIS,
            &shorten(name, if stagger { 10 } else { 18 }),
        );
    }
    let center = ((area.left + area.right) / 2.0) as i32;
    canvas.text_centered(center, area.bottom as i32 + 70, LABEL_SIZE, BLACK, title);
}

/// Truncate to `max` characters with a trailing `..`.
#[must_use]
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(2)).collect();
        format!("{kept}..")
    }
}

/// Smallest of 1, 2, 5 x 10^n not below `raw`.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[must_use]
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e4 {
        format!("{:.0}k", value / 1e3)
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
