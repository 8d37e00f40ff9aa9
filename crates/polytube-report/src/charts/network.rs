use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::path::Path;

use ab_glyph::FontVec;
use image::Rgba;

use super::canvas::{palette, ChartCanvas, BLACK, LABEL_SIZE};
use crate::aggregate::CooccurrenceEdge;
use crate::error::ReportError;

const EDGE: Rgba<u8> = Rgba([150, 150, 150, 255]);

/// Node positions on a circle, in node order, starting at twelve o'clock.
fn circular_layout(count: usize, center: (f32, f32), radius: f32) -> Vec<(f32, f32)> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count.max(1) as f32 - TAU / 4.0;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Keyword graph: nodes on a circle, edge thickness by weight. Keywords
/// without any co-occurrence are not drawn.
///
/// # Errors
///
/// Returns the error of [`ChartCanvas::save`].
pub fn render_network(
    path: &Path,
    font: Option<&FontVec>,
    title: &str,
    edges: &[CooccurrenceEdge],
) -> Result<(), ReportError> {
    let mut canvas = ChartCanvas::new(font);
    canvas.title(title);

    let nodes: Vec<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let center = (canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0 + 20.0);
    let radius = canvas.height() as f32 * 0.33;
    let positions = circular_layout(nodes.len(), center, radius);
    let position = |name: &str| {
        nodes
            .iter()
            .position(|n| *n == name)
            .map(|i| positions[i])
    };

    let heaviest = edges.iter().map(|e| e.weight).max().unwrap_or(1).max(1);
    for edge in edges {
        let (Some(a), Some(b)) = (position(edge.source.as_str()), position(edge.target.as_str())) else {
            continue;
        };
        let thickness = 1 + (edge.weight * 5 / heaviest) as i32;
        for offset in 0..thickness {
            let d = offset as f32 - thickness as f32 / 2.0;
            canvas.line((a.0 + d, a.1), (b.0 + d, b.1), EDGE);
            canvas.line((a.0, a.1 + d), (b.0, b.1 + d), EDGE);
        }
    }

    for (i, (name, point)) in nodes.iter().zip(&positions).enumerate() {
        canvas.dot(*point, 14, palette(i));
        let below = point.1 >= center.1;
        let y = if below { point.1 + 18.0 } else { point.1 - 40.0 };
        canvas.text_centered(point.0 as i32, y as i32, LABEL_SIZE, BLACK, name);
    }

    canvas.save(path)
}
