//! Report generation from a run index.

use std::path::PathBuf;

use anyhow::Context;
use polytube_core::AppConfig;
use polytube_report::{generate_reports, load_chart_font, RunIndex};

/// Load the tables an index names and render every report into the
/// configured reports directory.
///
/// # Errors
///
/// Fails when the index or a table cannot be read, or any output cannot be
/// written.
pub(crate) fn run_report(
    config: &AppConfig,
    index_path: Option<PathBuf>,
) -> anyhow::Result<Vec<PathBuf>> {
    let index_path = index_path.unwrap_or_else(|| config.index_path.clone());
    let index = RunIndex::read(&index_path)
        .with_context(|| format!("failed to read run index {}", index_path.display()))?;
    let data = index.load().context("failed to load report inputs")?;

    let font = load_chart_font(config.font_path.as_deref());
    let written = generate_reports(&data, &config.reports_dir, font.as_ref())
        .with_context(|| format!("failed to write reports to {}", config.reports_dir.display()))?;

    println!(
        "{} report files written to {}",
        written.len(),
        config.reports_dir.display()
    );
    Ok(written)
}
