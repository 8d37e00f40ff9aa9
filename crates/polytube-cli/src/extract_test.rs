use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polytube_sentiment::SentimentLabel;

use super::*;

fn video(keyword: &str, id: &str) -> VideoRef {
    VideoRef {
        country: "A".to_string(),
        party: "X".to_string(),
        keyword: keyword.to_string(),
        video_id: id.to_string(),
    }
}

fn stats_body(views: &str, likes: &str) -> Value {
    json!({
        "items": [{
            "statistics": { "viewCount": views, "likeCount": likes, "commentCount": "2" },
            "snippet": { "publishedAt": "2020-01-01T00:00:00Z" }
        }]
    })
}

fn comments_body(texts: &[&str]) -> Value {
    let items: Vec<Value> = texts
        .iter()
        .map(|t| json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": t } } } }))
        .collect();
    json!({ "items": items })
}

async fn mount_video(server: &MockServer, id: &str, stats: ResponseTemplate, comments: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", id))
        .respond_with(stats)
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", id))
        .respond_with(comments)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> YoutubeClient {
    YoutubeClient::with_base_url(30, "polytube-test", &server.uri()).unwrap()
}

#[tokio::test]
async fn scores_comments_and_fetches_each_video_once() {
    let server = MockServer::start().await;
    mount_video(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(stats_body("100", "10")),
        ResponseTemplate::new(200)
            .set_body_json(comments_body(&["Absolutely fantastic!", "   ", "This is the worst."])),
    )
    .await;

    let videos = vec![video("k1", "v1"), video("k2", "v1")];
    let outcome = extract(&client(&server), "key", &videos, &SentimentAnalyzer::new()).await;

    assert!(!outcome.quota_exhausted);
    assert_eq!(outcome.stats.len(), 1);
    assert_eq!(outcome.stats[0].comments_status, "ok");
    assert_eq!(outcome.comments.len(), 3);

    let first = &outcome.comments[0];
    assert_eq!(first.video_id, "v1");
    assert_eq!(first.upload_date, "2020-01-01T00:00:00Z");
    assert_eq!((first.like_count, first.view_count), (10, 100));
    assert!((first.sentiment.compound - 0.6352).abs() < 1e-9);
    assert_eq!(outcome.comments[1].comment, "   ");
    assert_eq!(outcome.comments[1].sentiment.label(), SentimentLabel::Neutral);
    assert!(outcome.comments[2].sentiment.compound < 0.0);
}

#[tokio::test]
async fn empty_comments_are_not_scored() {
    let server = MockServer::start().await;
    mount_video(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(stats_body("1", "1")),
        ResponseTemplate::new(200).set_body_json(comments_body(&["", "lol", "\t"])),
    )
    .await;

    let outcome = extract(&client(&server), "key", &[video("k", "v1")], &SentimentAnalyzer::new()).await;

    let texts: Vec<&str> = outcome.comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(texts, vec!["lol", "\t"]);
    assert_eq!(outcome.comments[0].sentiment.label(), SentimentLabel::Positive);
}

#[tokio::test]
async fn stats_failure_skips_only_that_video() {
    let server = MockServer::start().await;
    mount_video(
        &server,
        "gone",
        ResponseTemplate::new(200).set_body_json(json!({ "items": [] })),
        ResponseTemplate::new(200).set_body_json(comments_body(&[])),
    )
    .await;
    mount_video(
        &server,
        "v2",
        ResponseTemplate::new(200).set_body_json(stats_body("5", "1")),
        ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "disabled", "errors": [{ "reason": "commentsDisabled" }] }
        })),
    )
    .await;

    let videos = vec![video("k1", "gone"), video("k1", "v2")];
    let outcome = extract(&client(&server), "key", &videos, &SentimentAnalyzer::new()).await;

    assert_eq!(outcome.skipped, vec!["gone"]);
    assert_eq!(outcome.stats.len(), 1);
    assert!(outcome.stats[0].comments_status.starts_with("failed: "));
    assert!(outcome.comments.is_empty());
}

#[tokio::test]
async fn quota_on_statistics_stops_the_run() {
    let server = MockServer::start().await;
    mount_video(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(stats_body("1", "1")),
        ResponseTemplate::new(200).set_body_json(comments_body(&["fine"])),
    )
    .await;
    mount_video(
        &server,
        "v2",
        ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "quota", "errors": [{ "reason": "quotaExceeded" }] }
        })),
        ResponseTemplate::new(200).set_body_json(comments_body(&[])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body("1", "1")))
        .expect(0)
        .mount(&server)
        .await;

    let videos = vec![video("k", "v1"), video("k", "v2"), video("k", "v3")];
    let outcome = extract(&client(&server), "key", &videos, &SentimentAnalyzer::new()).await;

    assert!(outcome.quota_exhausted);
    assert_eq!(outcome.stats.len(), 1);
    assert_eq!(outcome.comments.len(), 1);
    assert!(outcome.skipped.is_empty());
}

#[test]
fn latest_table_picks_newest_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "output_final_20240101000000.csv",
        "output_final_20240301120000.csv",
        "output_incomplete_20250101000000.csv",
        "output_final_notes.txt",
    ] {
        std::fs::write(dir.path().join(name), "").unwrap();
    }

    let latest = latest_table(dir.path(), "output_final").unwrap();
    assert_eq!(latest, dir.path().join("output_final_20240301120000.csv"));
}

#[test]
fn latest_table_errors_when_nothing_matches() {
    let dir = tempfile::tempdir().unwrap();
    let err = latest_table(dir.path(), "output_final").unwrap_err();
    assert!(err.to_string().contains("no output_final_*.csv"));
}
