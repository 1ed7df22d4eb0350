//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the YouTube Data API and run
//! the full list → fetch → store cycle end-to-end.

use comment_harvest::model::VideoId;
use comment_harvest::output::{CommentSink, CsvSink, OutputError, SqliteSink};
use comment_harvest::storage::{RunStatus, SqliteStorage, Storage};
use comment_harvest::youtube::ApiError;
use comment_harvest::{HarvestError, Harvester, SkipPolicy, YouTubeClient};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

/// Builds a `search` response page
fn search_page(video_ids: &[&str], next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = video_ids
        .iter()
        .map(|id| json!({ "kind": "youtube#searchResult", "id": { "kind": "youtube#video", "videoId": id } }))
        .collect();

    match next_page_token {
        Some(token) => json!({ "items": items, "nextPageToken": token }),
        None => json!({ "items": items }),
    }
}

/// Builds a comment thread item
fn thread(author: &str, text: &str, likes: u64, published_at: &str) -> Value {
    json!({
        "snippet": {
            "topLevelComment": {
                "snippet": {
                    "authorDisplayName": author,
                    "textDisplay": text,
                    "likeCount": likes,
                    "publishedAt": published_at
                }
            }
        }
    })
}

fn threads(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

async fn mount_search(server: &MockServer, channel_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", channel_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_comments(server: &MockServer, video_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", video_id))
        .respond_with(response)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> YouTubeClient {
    YouTubeClient::new(API_KEY, server.uri()).expect("Failed to build client")
}

fn sqlite_harvester(server: &MockServer, limit: u32, policy: SkipPolicy) -> Harvester<SqliteSink> {
    let storage = SqliteStorage::new_in_memory().expect("Failed to open storage");
    let sink = SqliteSink::new(storage, ":memory:", "test-hash");
    Harvester::new(client_for(server), sink, limit, policy)
}

#[tokio::test]
async fn test_zero_video_channel_stores_nothing() {
    let server = MockServer::start().await;
    mount_search(&server, "UCempty", search_page(&[], None)).await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    let report = harvester.run("UCempty").await.expect("Harvest failed");

    assert_eq!(report.videos_listed, 0);
    assert_eq!(report.comments_stored, 0);
    assert!(!report.has_failures());

    let storage = harvester.into_sink().into_storage();
    assert_eq!(storage.count_comments().unwrap(), 0);
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
}

#[tokio::test]
async fn test_listing_walks_all_pages_in_order() {
    let server = MockServer::start().await;

    // Token-specific pages are mounted first so they win over the first page
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["c"], Some("p3"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["d", "e"], None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("part", "id"))
        .and(query_param("channelId", "UCpaged"))
        .and(query_param("maxResults", "50"))
        .and(query_param("order", "date"))
        .and(query_param("type", "video"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["a", "b"], Some("p2"))))
        .mount(&server)
        .await;

    let video_ids = client_for(&server)
        .list_videos("UCpaged")
        .await
        .expect("Listing failed");

    let ids: Vec<&str> = video_ids.iter().map(VideoId::as_str).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_listing_keeps_duplicates() {
    let server = MockServer::start().await;
    mount_search(&server, "UCdup", search_page(&["a", "a"], None)).await;

    let video_ids = client_for(&server).list_videos("UCdup").await.unwrap();
    assert_eq!(video_ids.len(), 2);
}

#[tokio::test]
async fn test_fetch_comments_returns_at_most_limit() {
    let server = MockServer::start().await;
    let items = (0..5)
        .map(|i| thread(&format!("user{}", i), "text", i, "2024-01-01T00:00:00Z"))
        .collect();

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("part", "snippet"))
        .and(query_param("videoId", "v1"))
        .and(query_param("maxResults", "3"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(threads(items)))
        .expect(1)
        .mount(&server)
        .await;

    let video_id = VideoId::new("v1");
    let comments = client_for(&server)
        .fetch_comments(&video_id, 3)
        .await
        .expect("Fetch failed");

    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|c| c.video_id() == &video_id));
    assert_eq!(comments[0].author(), "user0");
}

#[tokio::test]
async fn test_fetch_comments_fewer_than_limit() {
    let server = MockServer::start().await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "A",
            "only one",
            0,
            "2024-01-01T00:00:00Z",
        )])),
    )
    .await;

    let comments = client_for(&server)
        .fetch_comments(&VideoId::new("v1"), 10)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_fetch_comments_rejects_unexpected_timestamp() {
    let server = MockServer::start().await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "A",
            "hi",
            0,
            "2024-01-01 00:00:00",
        )])),
    )
    .await;

    let result = client_for(&server)
        .fetch_comments(&VideoId::new("v1"), 10)
        .await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_sqlite_roundtrip_preserves_fields() {
    let server = MockServer::start().await;
    mount_search(&server, "UCround", search_page(&["v1"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "Ünïcode Author",
            "first <b>comment</b>",
            42,
            "2023-07-08T09:10:11.456Z",
        )])),
    )
    .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    harvester.run("UCround").await.expect("Harvest failed");

    let storage = harvester.into_sink().into_storage();
    let stored = storage
        .get_comments_for_video(&VideoId::new("v1"))
        .unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].author(), "Ünïcode Author");
    assert_eq!(stored[0].text(), "first <b>comment</b>");
    assert_eq!(stored[0].like_count(), 42);
    assert_eq!(stored[0].published_at_db(), "2023-07-08 09:10:11");
}

#[tokio::test]
async fn test_failing_video_does_not_stop_run() {
    let server = MockServer::start().await;
    mount_search(&server, "UCmixed", search_page(&["v1", "v2", "v3"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![
            thread("A", "one", 1, "2024-01-01T00:00:00Z"),
            thread("B", "two", 2, "2024-01-01T00:00:01Z"),
        ])),
    )
    .await;
    mount_comments(
        &server,
        "v2",
        ResponseTemplate::new(500).set_body_string("backend error"),
    )
    .await;
    mount_comments(
        &server,
        "v3",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "C",
            "three",
            3,
            "2024-01-02T00:00:00Z",
        )])),
    )
    .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    let report = harvester.run("UCmixed").await.expect("Harvest failed");

    assert_eq!(report.videos_listed, 3);
    assert_eq!(report.videos_stored, 2);
    assert_eq!(report.comments_stored, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].video_id.as_str(), "v2");
    assert!(report.failures[0].error.contains("500"));

    let storage = harvester.into_sink().into_storage();
    assert_eq!(storage.count_comments().unwrap(), 3);
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.totals.failures, 1);
}

#[tokio::test]
async fn test_single_comment_channel_with_one_failing_video() {
    let server = MockServer::start().await;
    mount_search(&server, "UCxyz", search_page(&["v1", "v2"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "A",
            "hi",
            3,
            "2024-01-01T00:00:00Z",
        )])),
    )
    .await;
    mount_comments(
        &server,
        "v2",
        ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The video identified by the videoId parameter has disabled comments.",
                "errors": [{ "reason": "commentsDisabled" }]
            }
        })),
    )
    .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    let report = harvester.run("UCxyz").await.expect("Harvest failed");

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.watch_url(), "https://www.youtube.com/watch?v=v2");
    assert!(failure.error.contains("commentsDisabled"));

    let storage = harvester.into_sink().into_storage();
    assert_eq!(storage.count_comments().unwrap(), 1);

    let rows = storage.get_comments_for_video(&VideoId::new("v1")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author(), "A");
    assert_eq!(rows[0].text(), "hi");
    assert_eq!(rows[0].like_count(), 3);
    assert_eq!(rows[0].published_at_db(), "2024-01-01 00:00:00");
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [{ "reason": "quotaExceeded" }]
            }
        })))
        .mount(&server)
        .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    let result = harvester.run("UCquota").await;

    match result {
        Err(HarvestError::Api(ApiError::Request { status, message, .. })) => {
            assert_eq!(status.as_u16(), 403);
            assert!(message.contains("quotaExceeded"));
        }
        other => panic!("expected listing failure, got {:?}", other),
    }

    let storage = harvester.into_sink().into_storage();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_listing_failure_on_later_page_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(1)
        .mount(&server)
        .await;
    mount_search(&server, "UCpaged", search_page(&["v1", "v2"], Some("p2"))).await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(threads(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::Never);
    let result = harvester.run("UCpaged").await;

    match result {
        Err(HarvestError::Api(ApiError::Request { status, .. })) => {
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("expected listing failure, got {:?}", other),
    }

    let storage = harvester.into_sink().into_storage();
    assert_eq!(storage.count_comments().unwrap(), 0);
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_first_empty_policy_skips_batch() {
    let server = MockServer::start().await;
    mount_search(&server, "UCskip", search_page(&["v1", "v2"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![
            thread("A", "", 0, "2024-01-01T00:00:00Z"),
            thread("B", "dropped with the batch", 0, "2024-01-01T00:00:00Z"),
        ])),
    )
    .await;
    mount_comments(
        &server,
        "v2",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "C",
            "kept",
            0,
            "2024-01-01T00:00:00Z",
        )])),
    )
    .await;

    let mut harvester = sqlite_harvester(&server, 10, SkipPolicy::FirstEmpty);
    let report = harvester.run("UCskip").await.unwrap();

    assert_eq!(report.videos_skipped, 1);
    assert_eq!(report.comments_dropped, 2);
    assert_eq!(report.comments_stored, 1);
}

#[tokio::test]
async fn test_csv_export_written_once_at_end() {
    let server = MockServer::start().await;
    mount_search(&server, "UCcsv", search_page(&["v1", "v2"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "A",
            "hi, there",
            3,
            "2024-01-01T00:00:00Z",
        )])),
    )
    .await;
    mount_comments(
        &server,
        "v2",
        ResponseTemplate::new(200).set_body_json(threads(vec![])),
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("comments.csv");
    let sink = CsvSink::new(&csv_path);
    let mut harvester = Harvester::new(client_for(&server), sink, 10, SkipPolicy::Never);

    let report = harvester.run("UCcsv").await.expect("Harvest failed");
    assert_eq!(report.videos_empty, 1);
    assert!(harvester.sink().target().contains("comments.csv"));

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let content = content.trim_start_matches('\u{feff}');
    assert_eq!(
        content,
        "Video ID,Author,Comment,Likes,Published At\n\
         v1,A,\"hi, there\",3,2024-01-01T00:00:00Z\n"
    );
}

#[tokio::test]
async fn test_unwritable_csv_aborts_run() {
    let server = MockServer::start().await;
    mount_search(&server, "UCcsv", search_page(&["v1"], None)).await;
    mount_comments(
        &server,
        "v1",
        ResponseTemplate::new(200).set_body_json(threads(vec![thread(
            "A",
            "hi",
            1,
            "2024-01-01T00:00:00Z",
        )])),
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("missing").join("comments.csv");
    let sink = CsvSink::new(&csv_path);
    let mut harvester = Harvester::new(client_for(&server), sink, 10, SkipPolicy::Never);

    let result = harvester.run("UCcsv").await;
    assert!(matches!(result, Err(HarvestError::Output(OutputError::Io(_)))));

    // abort() drops the buffered records once the write has failed
    assert_eq!(harvester.sink().buffered(), 0);
    assert!(!csv_path.exists());
}
