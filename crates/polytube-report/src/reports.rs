//! Writes the summary tables and charts of one report run.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

use crate::aggregate::{Pivot, ReportData, ReportTables};
use crate::charts::{
    render_box_plot, render_grouped_bars, render_heatmap, render_line_chart, render_network,
    render_stacked_bars, Labels, Series,
};
use crate::error::ReportError;
use crate::tables::write_rows;

/// Delete `dir` with everything in it, then recreate it empty.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if removal or creation fails.
pub fn prepare_reports_dir(dir: &Path) -> Result<(), ReportError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;
        tracing::debug!(dir = %dir.display(), "previous reports removed");
    }
    fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))
}

/// Write a pivot as CSV: the index column, then one column per pivot column.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] on write failure.
pub fn write_pivot(path: &Path, pivot: &Pivot) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::csv(path, e))?;
    let header = std::iter::once(pivot.index_name.as_str())
        .chain(pivot.columns.iter().map(String::as_str));
    writer
        .write_record(header)
        .map_err(|e| ReportError::csv(path, e))?;
    for (row, cells) in pivot.rows.iter().zip(&pivot.cells) {
        let record = std::iter::once(row.clone()).chain(cells.iter().map(u64::to_string));
        writer
            .write_record(record)
            .map_err(|e| ReportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::io(path, e))?;
    tracing::info!(file = %path.display(), rows = pivot.rows.len(), "table written");
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn pivot_series(pivot: &Pivot) -> Vec<Series> {
    pivot
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Series::new(
                name.clone(),
                pivot.column(i).into_iter().map(|v| v as f64).collect(),
            )
        })
        .collect()
}

/// Collects written paths while rendering.
struct ReportWriter<'a> {
    dir: &'a Path,
    font: Option<&'a FontVec>,
    written: Vec<PathBuf>,
}

impl ReportWriter<'_> {
    fn path(&mut self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        self.written.push(path.clone());
        path
    }

    fn line(
        &mut self,
        name: &str,
        labels: Labels<'_>,
        pivot: &Pivot,
        log_scale: bool,
    ) -> Result<(), ReportError> {
        let path = self.path(name);
        render_line_chart(
            &path,
            self.font,
            labels,
            &pivot.rows,
            &pivot_series(pivot),
            log_scale,
        )
    }

    fn stacked(&mut self, name: &str, labels: Labels<'_>, pivot: &Pivot) -> Result<(), ReportError> {
        let path = self.path(name);
        render_stacked_bars(&path, self.font, labels, &pivot.rows, &pivot_series(pivot))
    }

    fn pivot_csv(&mut self, name: &str, pivot: &Pivot) -> Result<(), ReportError> {
        let path = self.path(name);
        write_pivot(&path, pivot)
    }
}

/// Render every table and chart of the report into `reports_dir`, which
/// is wiped first. Returns the written files in creation order.
///
/// # Errors
///
/// Returns the first I/O, CSV or chart encoding failure.
pub fn generate_reports(
    data: &ReportData,
    reports_dir: &Path,
    font: Option<&FontVec>,
) -> Result<Vec<PathBuf>, ReportError> {
    let tables = ReportTables::compute(data);
    prepare_reports_dir(reports_dir)?;

    let mut out = ReportWriter {
        dir: reports_dir,
        font,
        written: Vec::new(),
    };

    let path = out.path("01_videos_summary_by_country_party.csv");
    write_rows(&path, &tables.summary)?;
    let path = out.path("02_comments_sentiment_summary_by_country_party.csv");
    write_rows(&path, &tables.sentiment)?;

    out.line(
        "03_video_popularity_time_series_by_country.png",
        Labels {
            title: "Video Popularity Over Time by Country",
            x: "5-Year Period",
            y: "Total Views (log scale)",
        },
        &tables.views_by_period,
        true,
    )?;
    out.pivot_csv(
        "03_video_popularity_time_series_by_country.csv",
        &tables.views_by_period,
    )?;

    out.line(
        "04_keyword_mentions_over_time.png",
        Labels {
            title: "Keyword Mentions Over Time",
            x: "Month",
            y: "Videos",
        },
        &tables.keyword_months,
        false,
    )?;
    out.pivot_csv("04_keyword_mentions_over_time.csv", &tables.keyword_months)?;

    let path = out.path("05_keyword_usage_by_party_and_country.png");
    render_heatmap(
        &path,
        font,
        Labels {
            title: "Keyword Usage by Party and Country",
            x: "Keyword",
            y: "Country / Party",
        },
        &tables.keyword_heatmap,
    )?;
    out.pivot_csv(
        "05_keyword_usage_by_party_and_country.csv",
        &tables.keyword_heatmap,
    )?;

    for (name, title, y, distributions) in [
        (
            "06_01_like_count_distribution_by_keyword.png",
            "Like Count Distribution by Keyword",
            "Likes",
            &tables.likes_by_keyword,
        ),
        (
            "06_02_view_count_distribution_by_keyword.png",
            "View Count Distribution by Keyword",
            "Views",
            &tables.views_by_keyword,
        ),
        (
            "07_sentiment_distribution_by_keyword.png",
            "Sentiment Distribution by Keyword",
            "Compound Sentiment",
            &tables.compound_by_keyword,
        ),
        (
            "08_sentiment_comparison_by_party_for_each_keyword.png",
            "Sentiment Comparison by Party for Each Keyword",
            "Compound Sentiment",
            &tables.compound_by_keyword_party,
        ),
    ] {
        let path = out.path(name);
        render_box_plot(&path, font, Labels { title, x: "Keyword", y }, distributions)?;
    }

    out.stacked(
        "09_keyword_popularity_by_party.png",
        Labels {
            title: "Keyword Popularity by Party",
            x: "Party",
            y: "Videos",
        },
        &tables.keyword_by_party,
    )?;
    out.stacked(
        "10_keyword_popularity_by_country.png",
        Labels {
            title: "Keyword Popularity by Country",
            x: "Country",
            y: "Videos",
        },
        &tables.keyword_by_country,
    )?;

    let countries: Vec<String> = tables
        .engagement_by_country
        .iter()
        .map(|row| row.country.clone())
        .collect();
    let engagement = vec![
        Series::new(
            "Average Likes",
            tables.engagement_by_country.iter().map(|r| r.avg_likes).collect(),
        ),
        Series::new(
            "Average Views",
            tables.engagement_by_country.iter().map(|r| r.avg_views).collect(),
        ),
    ];
    let path = out.path("11_average_video_engagement_by_country.png");
    render_grouped_bars(
        &path,
        font,
        Labels {
            title: "Average Video Engagement by Country",
            x: "Country",
            y: "Average per Video",
        },
        &countries,
        &engagement,
    )?;

    let path = out.path("12_sentiment_by_party.png");
    render_box_plot(
        &path,
        font,
        Labels {
            title: "Sentiment by Party",
            x: "Party",
            y: "Compound Sentiment",
        },
        &tables.compound_by_party,
    )?;

    let path = out.path("13_keyword_cooccurrence_network.png");
    render_network(&path, font, "Keyword Co-occurrence Network", &tables.cooccurrence)?;
    let path = out.path("13_keyword_cooccurrence_edges.csv");
    write_rows(&path, &tables.cooccurrence)?;

    tracing::info!(
        dir = %reports_dir.display(),
        files = out.written.len(),
        "reports generated"
    );
    Ok(out.written)
}
