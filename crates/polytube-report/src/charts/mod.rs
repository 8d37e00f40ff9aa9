//! PNG chart rendering on top of `image` + `imageproc`.
//!
//! Every chart draws onto a fixed-size [`canvas::ChartCanvas`]. Text needs
//! a font; without one the geometry is still drawn.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

pub mod bar;
pub mod boxplot;
pub mod canvas;
pub mod font;
pub mod heatmap;
pub mod line;
pub mod network;

pub use bar::{render_grouped_bars, render_stacked_bars};
pub use boxplot::render_box_plot;
pub use font::load_chart_font;
pub use heatmap::render_heatmap;
pub use line::render_line_chart;
pub use network::render_network;

/// Titles of one chart.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// One named series of values, aligned with the chart's categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Largest value across every series, or zero.
fn series_max(series: &[Series]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max)
}

fn legend_entries(series: &[Series]) -> Vec<(String, image::Rgba<u8>)> {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| (canvas::shorten(&s.name, 22), canvas::palette(i)))
        .collect()
}
