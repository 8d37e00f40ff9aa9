use polytube_sentiment::{SentimentAnalyzer, SentimentScore};

use super::*;

fn video(country: &str, party: &str, keyword: &str, id: &str) -> VideoRef {
    VideoRef {
        country: country.to_string(),
        party: party.to_string(),
        keyword: keyword.to_string(),
        video_id: id.to_string(),
    }
}

fn comment(id: &str, date: &str, likes: u64, views: u64, compound: f64) -> CommentRow {
    CommentRow {
        video_id: id.to_string(),
        upload_date: date.to_string(),
        like_count: likes,
        view_count: views,
        comment: "text".to_string(),
        sentiment: SentimentScore {
            compound,
            ..SentimentScore::default()
        },
    }
}

fn stats(id: &str, date: &str, likes: u64, views: u64) -> VideoStatsRow {
    VideoStatsRow {
        video_id: id.to_string(),
        upload_date: date.to_string(),
        like_count: likes,
        view_count: views,
        comment_count: 0,
        comments_status: "ok".to_string(),
    }
}

#[test]
fn single_video_end_to_end() {
    let analyzer = SentimentAnalyzer::new();
    let text = "Absolutely fantastic!";
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1")],
        comments: vec![CommentRow {
            video_id: "v1".to_string(),
            upload_date: "2020-01-01".to_string(),
            like_count: 10,
            view_count: 100,
            comment: text.to_string(),
            sentiment: analyzer.polarity_scores(text),
        }],
        stats: Vec::new(),
    };

    let tables = ReportTables::compute(&data);

    assert_eq!(
        tables.summary,
        vec![SummaryRow {
            country: "A".to_string(),
            party: "X".to_string(),
            videos: 1,
            views: 100,
            likes: 10,
        }]
    );
    assert_eq!(
        tables.sentiment,
        vec![SentimentSummaryRow {
            country: "A".to_string(),
            party: "X".to_string(),
            negative: 0,
            neutral: 0,
            positive: 1,
        }]
    );
    assert_eq!(tables.views_by_period.get("2020 - 2024", "A"), Some(100));
    assert_eq!(tables.keyword_months.get("2020-01", "k1"), Some(1));
}

#[test]
fn absent_sentiment_combinations_are_zero() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1"), video("B", "Y", "k1", "v2")],
        comments: vec![
            comment("v1", "2020-01-01", 1, 1, -0.6),
            comment("v1", "2020-01-01", 1, 1, -0.05),
        ],
        stats: Vec::new(),
    };

    let tables = ReportTables::compute(&data);

    assert_eq!(tables.sentiment.len(), 2);
    let a = &tables.sentiment[0];
    assert_eq!((a.negative, a.neutral, a.positive), (2, 0, 0));
    let b = &tables.sentiment[1];
    assert_eq!(b.country, "B");
    assert_eq!((b.negative, b.neutral, b.positive), (0, 0, 0));
}

#[test]
fn aggregation_is_idempotent() {
    let data = ReportData {
        videos: vec![
            video("A", "X", "k1", "v1"),
            video("A", "X", "k2", "v1"),
            video("B", "Y", "k2", "v2"),
        ],
        comments: vec![
            comment("v1", "2019-06-01", 5, 50, 0.4),
            comment("v2", "2021-02-01", 7, 70, -0.3),
        ],
        stats: vec![stats("v2", "2021-02-01T00:00:00Z", 8, 80)],
    };

    assert_eq!(ReportTables::compute(&data), ReportTables::compute(&data));
}

#[test]
fn video_matched_by_two_keywords_counts_once_per_party() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1"), video("A", "X", "k2", "v1")],
        comments: vec![comment("v1", "2020-05-05", 3, 30, 0.5)],
        stats: Vec::new(),
    };

    let tables = ReportTables::compute(&data);

    let row = &tables.summary[0];
    assert_eq!((row.videos, row.views, row.likes), (1, 30, 3));
    assert_eq!(tables.sentiment[0].positive, 1);
    // Keyword-aware views keep one entry per keyword.
    assert_eq!(tables.keyword_heatmap.get("A / X", "k1"), Some(1));
    assert_eq!(tables.keyword_heatmap.get("A / X", "k2"), Some(1));
    assert_eq!(tables.compound_by_keyword.values[0][0], vec![0.5]);
    assert_eq!(tables.compound_by_keyword.values[1][0], vec![0.5]);
}

#[test]
fn statistics_table_wins_over_comment_rows() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1"), video("A", "X", "k1", "v2")],
        comments: vec![comment("v1", "2020-01-01", 1, 10, 0.0)],
        stats: vec![
            stats("v1", "2020-01-01T00:00:00Z", 2, 20),
            stats("v2", "2015-03-01T00:00:00Z", 4, 40),
        ],
    };

    let tables = ReportTables::compute(&data);

    let row = &tables.summary[0];
    assert_eq!((row.videos, row.views, row.likes), (2, 60, 6));
    assert_eq!(tables.views_by_period.get("2015 - 2019", "A"), Some(40));
    assert_eq!(tables.views_by_period.get("2020 - 2024", "A"), Some(20));
}

#[test]
fn video_without_any_facts_counts_as_zero() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1")],
        comments: Vec::new(),
        stats: Vec::new(),
    };

    let tables = ReportTables::compute(&data);

    let row = &tables.summary[0];
    assert_eq!((row.videos, row.views, row.likes), (1, 0, 0));
    assert!(tables.views_by_period.rows.is_empty());
    assert_eq!(tables.engagement_by_country[0].avg_views, 0.0);
}

#[test]
fn time_series_zero_fills_missing_country_periods() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1"), video("B", "Y", "k1", "v2")],
        comments: vec![
            comment("v1", "2012-01-01", 1, 100, 0.0),
            comment("v2", "2023-01-01", 1, 900, 0.0),
        ],
        stats: Vec::new(),
    };

    let pivot = ReportTables::compute(&data).views_by_period;

    assert_eq!(pivot.rows, vec!["2010 - 2014", "2020 - 2024"]);
    assert_eq!(pivot.columns, vec!["A", "B"]);
    assert_eq!(pivot.cells, vec![vec![100, 0], vec![0, 900]]);
}

#[test]
fn summary_sorted_by_country_then_size() {
    let data = ReportData {
        videos: vec![
            video("B", "P", "k", "b1"),
            video("A", "Small", "k", "a1"),
            video("A", "Big", "k", "a2"),
            video("A", "Big", "k", "a3"),
        ],
        comments: Vec::new(),
        stats: Vec::new(),
    };

    let order: Vec<(String, String)> = ReportTables::compute(&data)
        .summary
        .into_iter()
        .map(|r| (r.country, r.party))
        .collect();
    assert_eq!(
        order,
        vec![
            ("A".to_string(), "Big".to_string()),
            ("A".to_string(), "Small".to_string()),
            ("B".to_string(), "P".to_string()),
        ]
    );
}

#[test]
fn five_year_periods() {
    assert_eq!(five_year_period(2019), "2015 - 2019");
    assert_eq!(five_year_period(2020), "2020 - 2024");
    assert_eq!(five_year_period(2024), "2020 - 2024");
    assert_eq!(five_year_period(2005), "2005 - 2009");
}

#[test]
fn cooccurrence_counts_shared_videos() {
    let videos = vec![
        video("A", "X", "k1", "v1"),
        video("A", "X", "k2", "v1"),
        video("A", "X", "k3", "v1"),
        video("A", "X", "k1", "v2"),
        video("A", "X", "k2", "v2"),
        video("A", "X", "k3", "v3"),
    ];

    let edges = keyword_cooccurrence(&videos);
    let as_tuples: Vec<(&str, &str, u64)> = edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.weight))
        .collect();
    assert_eq!(
        as_tuples,
        vec![("k1", "k2", 2), ("k1", "k3", 1), ("k2", "k3", 1)]
    );
}

#[test]
fn cooccurrence_ignores_single_keyword_videos() {
    let videos = vec![video("A", "X", "k1", "v1"), video("B", "Y", "k2", "v2")];
    assert!(keyword_cooccurrence(&videos).is_empty());
}

#[test]
fn keyword_party_distributions_fill_empty_cells() {
    let data = ReportData {
        videos: vec![video("A", "X", "k1", "v1"), video("A", "Y", "k2", "v2")],
        comments: vec![comment("v1", "2020-01-01", 1, 1, 0.3)],
        stats: Vec::new(),
    };

    let dist = ReportTables::compute(&data).compound_by_keyword_party;
    assert_eq!(dist.groups, vec!["k1", "k2"]);
    assert_eq!(dist.hues, vec!["X", "Y"]);
    assert_eq!(dist.values[0][0], vec![0.3]);
    assert!(dist.values[0][1].is_empty());
    assert!(dist.values[1][1].is_empty());
    assert!(dist.has_hues());
}

#[test]
fn box_stats_interpolate_quartiles() {
    let stats = BoxStats::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
    assert!((stats.q1 - 1.75).abs() < 1e-12);
    assert!((stats.median - 2.5).abs() < 1e-12);
    assert!((stats.q3 - 3.25).abs() < 1e-12);
    assert!((stats.lower_whisker - 1.0).abs() < 1e-12);
    assert!((stats.upper_whisker - 4.0).abs() < 1e-12);
    assert!(stats.outliers.is_empty());
}

#[test]
fn box_stats_separate_outliers() {
    let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    assert_eq!(stats.outliers, vec![100.0]);
    assert!((stats.upper_whisker - 4.0).abs() < 1e-12);
    assert!(BoxStats::from_values(&[]).is_none());
}
