//! Join and group the pipeline tables into report views.
//!
//! The videos table is the spine: every (country, party) and keyword it
//! contains shows up in the outputs, with zero where no data matched. Sums
//! and counts run over distinct (group, video) pairs, so a video found by
//! several keywords is counted once in groups that ignore the keyword.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use polytube_core::VideoRef;
use polytube_sentiment::SentimentLabel;
use serde::Serialize;

use crate::tables::{parse_upload_date, CommentRow, VideoStatsRow};

/// Inputs of one report run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportData {
    pub videos: Vec<VideoRef>,
    pub comments: Vec<CommentRow>,
    pub stats: Vec<VideoStatsRow>,
}

/// Engagement figures known for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFacts {
    pub views: u64,
    pub likes: u64,
    pub published: Option<NaiveDate>,
}

/// Row of `01_videos_summary_by_country_party.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Party")]
    pub party: String,
    #[serde(rename = "Number of Videos")]
    pub videos: u64,
    #[serde(rename = "Total Views")]
    pub views: u64,
    #[serde(rename = "Total Likes")]
    pub likes: u64,
}

/// Row of `02_comments_sentiment_summary_by_country_party.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentSummaryRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Party")]
    pub party: String,
    #[serde(rename = "Number of Negative Sentiments")]
    pub negative: u64,
    #[serde(rename = "Number of Neutral Sentiments")]
    pub neutral: u64,
    #[serde(rename = "Number of Positive Sentiments")]
    pub positive: u64,
}

/// Mean engagement of the videos of one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Average Likes")]
    pub avg_likes: f64,
    #[serde(rename = "Average Views")]
    pub avg_views: f64,
}

/// Weighted edge of the keyword co-occurrence graph. `source < target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrenceEdge {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    /// Number of videos matched by both keywords.
    #[serde(rename = "Weight")]
    pub weight: u64,
}

/// Zero-filled cross tabulation of counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivot {
    pub index_name: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<u64>>,
}

impl Pivot {
    fn build(
        index_name: &str,
        rows: BTreeSet<String>,
        columns: BTreeSet<String>,
        entries: impl IntoIterator<Item = ((String, String), u64)>,
    ) -> Self {
        let rows: Vec<String> = rows.into_iter().collect();
        let columns: Vec<String> = columns.into_iter().collect();
        let mut cells = vec![vec![0u64; columns.len()]; rows.len()];
        for ((row, column), value) in entries {
            let r = rows.binary_search(&row);
            let c = columns.binary_search(&column);
            if let (Ok(r), Ok(c)) = (r, c) {
                cells[r][c] += value;
            }
        }
        Self {
            index_name: index_name.to_string(),
            rows,
            columns,
            cells,
        }
    }

    /// Value at (`row`, `column`), or `None` for labels not in the pivot.
    #[must_use]
    pub fn get(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.cells[r][c])
    }

    /// One column's values in row order.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<u64> {
        self.cells.iter().map(|row| row[index]).collect()
    }
}

/// Raw values per group, optionally split by a second "hue" key.
///
/// Single-hue distributions carry one unnamed hue.
#[derive(Debug, Clone, PartialEq)]
pub struct Distributions {
    pub groups: Vec<String>,
    pub hues: Vec<String>,
    /// `values[group][hue]`
    pub values: Vec<Vec<Vec<f64>>>,
}

impl Distributions {
    fn single(values: BTreeMap<String, Vec<f64>>) -> Self {
        let (groups, values): (Vec<_>, Vec<_>) =
            values.into_iter().map(|(group, v)| (group, vec![v])).unzip();
        Self {
            groups,
            hues: vec![String::new()],
            values,
        }
    }

    fn split(
        groups: BTreeSet<String>,
        hues: BTreeSet<String>,
        values: &BTreeMap<(String, String), Vec<f64>>,
    ) -> Self {
        let groups: Vec<String> = groups.into_iter().collect();
        let hues: Vec<String> = hues.into_iter().collect();
        let values = groups
            .iter()
            .map(|group| {
                hues.iter()
                    .map(|hue| {
                        values
                            .get(&(group.clone(), hue.clone()))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        Self {
            groups,
            hues,
            values,
        }
    }

    #[must_use]
    pub fn has_hues(&self) -> bool {
        self.hues.len() > 1 || self.hues.first().is_some_and(|h| !h.is_empty())
    }
}

/// Box-plot summary with 1.5 x IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within 1.5 x IQR below `q1`.
    pub lower_whisker: f64,
    /// Largest value within 1.5 x IQR above `q3`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarise `values`; `None` when empty.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let within = |v: f64| v >= low_fence && v <= high_fence;
        let lower_whisker = sorted
            .iter()
            .copied()
            .filter(|v| within(*v))
            .fold(f64::INFINITY, f64::min);
        let upper_whisker = sorted
            .iter()
            .copied()
            .filter(|v| within(*v))
            .fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted.iter().copied().filter(|v| !within(*v)).collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Five-year period label of a year: 2019 is `"2015 - 2019"`.
#[must_use]
pub fn five_year_period(year: i32) -> String {
    let start = year.div_euclid(5) * 5;
    format!("{start} - {}", start + 4)
}

/// Every view the report renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTables {
    pub summary: Vec<SummaryRow>,
    pub sentiment: Vec<SentimentSummaryRow>,
    /// Five-year period x country, summed views.
    pub views_by_period: Pivot,
    /// `YYYY-MM` x keyword, video matches.
    pub keyword_months: Pivot,
    /// `Country / Party` x keyword, video matches.
    pub keyword_heatmap: Pivot,
    pub likes_by_keyword: Distributions,
    pub views_by_keyword: Distributions,
    pub compound_by_keyword: Distributions,
    pub compound_by_keyword_party: Distributions,
    pub keyword_by_party: Pivot,
    pub keyword_by_country: Pivot,
    pub engagement_by_country: Vec<EngagementRow>,
    pub compound_by_party: Distributions,
    pub cooccurrence: Vec<CooccurrenceEdge>,
}

impl ReportTables {
    /// Compute every view from `data`. Pure: equal inputs give equal output.
    #[must_use]
    pub fn compute(data: &ReportData) -> Self {
        let joined = Joined::new(data);
        let keywords: BTreeSet<String> = data.videos.iter().map(|v| v.keyword.clone()).collect();

        Self {
            summary: summary_by_country_party(&joined),
            sentiment: sentiment_by_country_party(&joined),
            views_by_period: views_by_period(&joined),
            keyword_months: keyword_months(&joined, &keywords),
            keyword_heatmap: keyword_heatmap(&joined, &keywords),
            likes_by_keyword: facts_by_keyword(&joined, |f| f.likes),
            views_by_keyword: facts_by_keyword(&joined, |f| f.views),
            compound_by_keyword: compound_by(&joined, |v| v.keyword.clone()),
            compound_by_keyword_party: compound_by_keyword_party(&joined),
            keyword_by_party: keyword_counts(&joined, &keywords, "Party", |v| v.party.clone()),
            keyword_by_country: keyword_counts(&joined, &keywords, "Country", |v| {
                v.country.clone()
            }),
            engagement_by_country: engagement_by_country(&joined),
            compound_by_party: compound_by(&joined, |v| v.party.clone()),
            cooccurrence: keyword_cooccurrence(&data.videos),
        }
    }
}

/// Videos joined with their facts and comments.
struct Joined<'a> {
    videos: &'a [VideoRef],
    facts: HashMap<&'a str, VideoFacts>,
    comments: HashMap<&'a str, Vec<&'a CommentRow>>,
}

impl<'a> Joined<'a> {
    /// Facts come from the statistics table when a row exists, otherwise
    /// from the first comment row of the video.
    fn new(data: &'a ReportData) -> Self {
        let mut facts: HashMap<&str, VideoFacts> = HashMap::new();
        for row in &data.stats {
            facts.entry(row.video_id.as_str()).or_insert(VideoFacts {
                views: row.view_count,
                likes: row.like_count,
                published: parse_upload_date(&row.upload_date),
            });
        }

        let mut comments: HashMap<&str, Vec<&CommentRow>> = HashMap::new();
        for row in &data.comments {
            facts.entry(row.video_id.as_str()).or_insert(VideoFacts {
                views: row.view_count,
                likes: row.like_count,
                published: parse_upload_date(&row.upload_date),
            });
            comments.entry(row.video_id.as_str()).or_default().push(row);
        }

        let unknown = data
            .videos
            .iter()
            .filter(|v| !facts.contains_key(v.video_id.as_str()))
            .map(|v| v.video_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        if unknown > 0 {
            tracing::warn!(videos = unknown, "videos without statistics count as zero");
        }

        Self {
            videos: &data.videos,
            facts,
            comments,
        }
    }

    /// Distinct video ids per group key.
    fn videos_by<K: Ord>(&self, key: impl Fn(&VideoRef) -> K) -> BTreeMap<K, BTreeSet<&'a str>> {
        let mut groups: BTreeMap<K, BTreeSet<&str>> = BTreeMap::new();
        for video in self.videos {
            groups
                .entry(key(video))
                .or_default()
                .insert(video.video_id.as_str());
        }
        groups
    }

    fn facts(&self, video_id: &str) -> Option<VideoFacts> {
        self.facts.get(video_id).copied()
    }

    fn comments(&self, video_id: &str) -> &[&'a CommentRow] {
        self.comments.get(video_id).map_or(&[], Vec::as_slice)
    }

    fn compounds(&self, ids: &BTreeSet<&str>) -> Vec<f64> {
        ids.iter()
            .flat_map(|id| self.comments(id))
            .map(|c| c.sentiment.compound)
            .collect()
    }
}

fn summary_by_country_party(joined: &Joined<'_>) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = joined
        .videos_by(|v| (v.country.clone(), v.party.clone()))
        .into_iter()
        .map(|((country, party), ids)| {
            let facts: Vec<VideoFacts> = ids.iter().filter_map(|id| joined.facts(id)).collect();
            SummaryRow {
                country,
                party,
                videos: ids.len() as u64,
                views: facts.iter().map(|f| f.views).sum(),
                likes: facts.iter().map(|f| f.likes).sum(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then(b.videos.cmp(&a.videos))
            .then(b.views.cmp(&a.views))
            .then(a.party.cmp(&b.party))
    });
    rows
}

fn sentiment_by_country_party(joined: &Joined<'_>) -> Vec<SentimentSummaryRow> {
    joined
        .videos_by(|v| (v.country.clone(), v.party.clone()))
        .into_iter()
        .map(|((country, party), ids)| {
            let mut row = SentimentSummaryRow {
                country,
                party,
                negative: 0,
                neutral: 0,
                positive: 0,
            };
            for comment in ids.iter().flat_map(|id| joined.comments(id)) {
                match comment.sentiment.label() {
                    SentimentLabel::Negative => row.negative += 1,
                    SentimentLabel::Neutral => row.neutral += 1,
                    SentimentLabel::Positive => row.positive += 1,
                }
            }
            row
        })
        .collect()
}

fn views_by_period(joined: &Joined<'_>) -> Pivot {
    let by_country = joined.videos_by(|v| v.country.clone());
    let countries: BTreeSet<String> = by_country.keys().cloned().collect();
    let mut periods = BTreeSet::new();
    let mut entries = Vec::new();

    for (country, ids) in &by_country {
        for facts in ids.iter().filter_map(|id| joined.facts(id)) {
            if let Some(published) = facts.published {
                let period = five_year_period(published.year());
                periods.insert(period.clone());
                entries.push(((period, country.clone()), facts.views));
            }
        }
    }

    Pivot::build("Period", periods, countries, entries)
}

fn keyword_months(joined: &Joined<'_>, keywords: &BTreeSet<String>) -> Pivot {
    let mut months = BTreeSet::new();
    let mut entries = Vec::new();
    for (keyword, ids) in joined.videos_by(|v| v.keyword.clone()) {
        for facts in ids.iter().filter_map(|id| joined.facts(id)) {
            if let Some(published) = facts.published {
                let month = published.format("%Y-%m").to_string();
                months.insert(month.clone());
                entries.push(((month, keyword.clone()), 1));
            }
        }
    }
    Pivot::build("Month", months, keywords.clone(), entries)
}

fn keyword_heatmap(joined: &Joined<'_>, keywords: &BTreeSet<String>) -> Pivot {
    let groups = joined.videos_by(|v| (v.country.clone(), v.party.clone(), v.keyword.clone()));
    let rows: BTreeSet<String> = groups
        .keys()
        .map(|(country, party, _)| format!("{country} / {party}"))
        .collect();
    let entries = groups.into_iter().map(|((country, party, keyword), ids)| {
        ((format!("{country} / {party}"), keyword), ids.len() as u64)
    });
    Pivot::build("Country / Party", rows, keywords.clone(), entries)
}

fn keyword_counts(
    joined: &Joined<'_>,
    keywords: &BTreeSet<String>,
    index_name: &str,
    key: impl Fn(&VideoRef) -> String,
) -> Pivot {
    let groups = joined.videos_by(|v| (key(v), v.keyword.clone()));
    let rows: BTreeSet<String> = groups.keys().map(|(row, _)| row.clone()).collect();
    let entries = groups
        .into_iter()
        .map(|((row, keyword), ids)| ((row, keyword), ids.len() as u64));
    Pivot::build(index_name, rows, keywords.clone(), entries)
}

#[allow(clippy::cast_precision_loss)]
fn facts_by_keyword(joined: &Joined<'_>, metric: impl Fn(&VideoFacts) -> u64) -> Distributions {
    let values = joined
        .videos_by(|v| v.keyword.clone())
        .into_iter()
        .map(|(keyword, ids)| {
            let values: Vec<f64> = ids
                .iter()
                .filter_map(|id| joined.facts(id))
                .map(|f| metric(&f) as f64)
                .collect();
            (keyword, values)
        })
        .collect();
    Distributions::single(values)
}

fn compound_by(joined: &Joined<'_>, key: impl Fn(&VideoRef) -> String) -> Distributions {
    let values = joined
        .videos_by(key)
        .into_iter()
        .map(|(group, ids)| (group, joined.compounds(&ids)))
        .collect();
    Distributions::single(values)
}

fn compound_by_keyword_party(joined: &Joined<'_>) -> Distributions {
    let groups = joined.videos_by(|v| (v.keyword.clone(), v.party.clone()));
    let keywords = groups.keys().map(|(k, _)| k.clone()).collect();
    let parties = groups.keys().map(|(_, p)| p.clone()).collect();
    let values: BTreeMap<(String, String), Vec<f64>> = groups
        .iter()
        .map(|(key, ids)| (key.clone(), joined.compounds(ids)))
        .collect();
    Distributions::split(keywords, parties, &values)
}

#[allow(clippy::cast_precision_loss)]
fn engagement_by_country(joined: &Joined<'_>) -> Vec<EngagementRow> {
    joined
        .videos_by(|v| v.country.clone())
        .into_iter()
        .map(|(country, ids)| {
            let facts: Vec<VideoFacts> = ids.iter().filter_map(|id| joined.facts(id)).collect();
            let n = facts.len().max(1) as f64;
            EngagementRow {
                country,
                avg_likes: facts.iter().map(|f| f.likes as f64).sum::<f64>() / n,
                avg_views: facts.iter().map(|f| f.views as f64).sum::<f64>() / n,
            }
        })
        .collect()
}

/// Count, for every unordered keyword pair, the videos both keywords matched.
#[must_use]
pub fn keyword_cooccurrence(videos: &[VideoRef]) -> Vec<CooccurrenceEdge> {
    let mut keywords_by_video: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for video in videos {
        keywords_by_video
            .entry(video.video_id.as_str())
            .or_default()
            .insert(video.keyword.as_str());
    }

    let mut weights: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for keywords in keywords_by_video.values() {
        let keywords: Vec<&str> = keywords.iter().copied().collect();
        for (i, a) in keywords.iter().enumerate() {
            for b in &keywords[i + 1..] {
                *weights.entry((*a, *b)).or_default() += 1;
            }
        }
    }

    weights
        .into_iter()
        .map(|((source, target), weight)| CooccurrenceEdge {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        })
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
