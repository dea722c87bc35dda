//! Integration tests for the crawler
//!
//! These tests use wiremock to play the video platform (listing page,
//! internal browse endpoint, watch pages) and run full crawls against it.

use channel_sweep::config::Config;
use channel_sweep::crawler::{Coordinator, ProgressEvent, RecordingReporter};
use channel_sweep::output::write_crawl_result;
use channel_sweep::{BootstrapError, PageFetchError, SweepError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "AIzaTestKey";
const CLIENT_VERSION: &str = "2.20240101.00.00";
const CHANNEL: &str = "@testchannel";
const LISTING_PATH: &str = "/@testchannel/videos";

/// Creates a test configuration pointing at the mock platform
fn create_test_config(
    platform_root: &str,
    fetch_descriptions: bool,
    max_videos: Option<usize>,
) -> Config {
    let mut config = Config::default();
    config.channel.root = CHANNEL.to_string();
    config.client.platform_root = platform_root.to_string();
    config.crawler.fetch_full_description = fetch_descriptions;
    config.crawler.max_videos = max_videos;
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config
}

fn renderer(id: &str) -> Value {
    json!({
        "richItemRenderer": { "content": { "videoRenderer": {
            "videoId": id,
            "title": { "runs": [ { "text": "Video " }, { "text": id } ] },
            "descriptionSnippet": { "simpleText": format!("snippet {}", id) },
            "thumbnail": { "thumbnails": [
                { "url": format!("https://i.ytimg.com/vi/{}/default.jpg", id) },
                { "url": format!("https://i.ytimg.com/vi/{}/maxres.jpg", id) }
            ] }
        } } }
    })
}

fn continuation(token: &str) -> Value {
    json!({
        "continuationItemRenderer": { "continuationEndpoint": {
            "continuationCommand": { "token": token }
        } }
    })
}

/// A listing/browse payload holding the given items
fn page(items: Vec<Value>) -> Value {
    json!({
        "onResponseReceivedActions": [ {
            "appendContinuationItemsAction": { "continuationItems": items }
        } ]
    })
}

fn listing_html(initial_data: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head>
        <script>ytcfg.set({{"INNERTUBE_API_KEY":"{}","INNERTUBE_CLIENT_VERSION":"{}"}});</script>
        <script>var ytInitialData = {};</script>
        </head><body></body></html>"#,
        API_KEY, CLIENT_VERSION, initial_data
    )
}

fn watch_html(description: &str) -> String {
    let player = json!({ "videoDetails": { "shortDescription": description } });
    format!(
        "<html><head><script>var ytInitialPlayerResponse = {};var meta = {{}};</script></head></html>",
        player
    )
}

async fn mount_listing(server: &MockServer, initial_data: Value) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&initial_data))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_browse(server: &MockServer, token: &str, response: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .and(query_param("key", API_KEY))
        .and(body_string_contains(format!("\"{}\"", token)))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_watch(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", id))
        .respond_with(response)
        .mount(server)
        .await;
}

fn ids(result: &channel_sweep::CrawlResult) -> Vec<&str> {
    result
        .entities()
        .iter()
        .map(|e| e.id.as_str())
        .collect()
}

#[tokio::test]
async fn test_single_page_with_duplicate() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), renderer("v1"), renderer("v3")]),
    )
    .await;

    // No token on the first page, so the browse endpoint must never be hit
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.result.total_count(), 3);
    assert_eq!(ids(&outcome.result), vec!["v1", "v2", "v3"]);
    assert_eq!(
        outcome.result.listing_url(),
        format!("{}{}", mock_server.uri(), LISTING_PATH)
    );
    assert!(outcome.enrichment.is_none());

    let first = &outcome.result.entities()[0];
    assert_eq!(first.title, "Video v1");
    assert_eq!(first.canonical_url, format!("{}/watch?v=v1", mock_server.uri()));
    assert_eq!(first.thumbnail_url, "https://i.ytimg.com/vi/v1/maxres.jpg");
}

#[tokio::test]
async fn test_two_pages_dedup_across_pages() {
    let mock_server = MockServer::start().await;
    let listing_url = format!("{}{}", mock_server.uri(), LISTING_PATH);

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), continuation("T1")]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .and(query_param("key", API_KEY))
        .and(header("content-type", "application/json"))
        .and(header("x-youtube-client-name", "1"))
        .and(header("x-youtube-client-version", CLIENT_VERSION))
        .and(header("origin", mock_server.uri().as_str()))
        .and(header("referer", listing_url.as_str()))
        .and(body_string_contains("\"T1\""))
        .and(body_string_contains("\"clientName\":\"WEB\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![renderer("v2"), renderer("v3")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let reporter = Arc::new(RecordingReporter::new());
    let config = create_test_config(&mock_server.uri(), false, None);
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_reporter(reporter.clone());

    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.result.total_count(), 3);
    assert_eq!(ids(&outcome.result), vec!["v1", "v2", "v3"]);
    assert_eq!(
        reporter.events(),
        vec![
            ProgressEvent::ListingPage { pages: 1, collected: 2 },
            ProgressEvent::ListingPage { pages: 2, collected: 3 },
        ]
    );
}

#[tokio::test]
async fn test_repeated_token_stops_pagination() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, page(vec![renderer("v1"), continuation("T1")])).await;

    // The API keeps handing back the same token
    mount_browse(
        &mock_server,
        "T1",
        page(vec![renderer("v2"), continuation("T1")]),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let listing = coordinator.collect().await.expect("Crawl failed");

    assert_eq!(listing.pages, 2);
    let collected: Vec<&str> = listing.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(collected, vec!["v1", "v2"]);
}

#[tokio::test]
async fn test_cap_truncates_in_discovery_order() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), continuation("T1")]),
    )
    .await;
    mount_browse(
        &mock_server,
        "T1",
        page(vec![renderer("v3"), renderer("v4"), renderer("v5"), continuation("T2")]),
        1,
    )
    .await;
    mount_browse(&mock_server, "T2", page(vec![renderer("v6")]), 0).await;

    let config = create_test_config(&mock_server.uri(), false, Some(4));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.result.total_count(), 4);
    assert_eq!(ids(&outcome.result), vec!["v1", "v2", "v3", "v4"]);
}

#[tokio::test]
async fn test_cap_reached_on_first_page() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), renderer("v3"), continuation("T1")]),
    )
    .await;
    mount_browse(&mock_server, "T1", page(vec![renderer("v4")]), 0).await;

    let config = create_test_config(&mock_server.uri(), false, Some(2));
    let outcome = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(ids(&outcome.result), vec!["v1", "v2"]);
}

#[tokio::test]
async fn test_browse_error_aborts_crawl() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, page(vec![renderer("v1"), continuation("T1")])).await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), true, None);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let err = coordinator.run().await.unwrap_err();

    match err {
        SweepError::PageFetch(PageFetchError::Status {
            status_code,
            body_excerpt,
        }) => {
            assert_eq!(status_code, 429);
            assert_eq!(body_excerpt, "slow down");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_browse_invalid_json_aborts_crawl() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, page(vec![renderer("v1"), continuation("T1")])).await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let err = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SweepError::PageFetch(PageFetchError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_listing_without_session_keys_fails_bootstrap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Before you continue...</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let err = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SweepError::Bootstrap(BootstrapError::MissingSessionKey { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_listing_fails_bootstrap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let err = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SweepError::Bootstrap(BootstrapError::Status {
            status_code: 404,
            ..
        })
    ));
}

#[tokio::test]
async fn test_descriptions_disabled_keep_snippets() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, page(vec![renderer("v1"), renderer("v2")])).await;

    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(watch_html("full")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, None);
    let outcome = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    let descriptions: Vec<&str> = outcome
        .result
        .entities()
        .iter()
        .map(|e| e.short_description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["snippet v1", "snippet v2"]);
    assert!(!outcome.descriptions_incomplete());
}

#[tokio::test]
async fn test_enrichment_failure_is_isolated() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), renderer("v3")]),
    )
    .await;

    mount_watch(
        &mock_server,
        "v1",
        ResponseTemplate::new(200).set_body_string(watch_html("Full description one")),
    )
    .await;
    mount_watch(&mock_server, "v2", ResponseTemplate::new(500)).await;
    mount_watch(
        &mock_server,
        "v3",
        ResponseTemplate::new(200).set_body_string(watch_html("Full description three")),
    )
    .await;

    let reporter = Arc::new(RecordingReporter::new());
    let config = create_test_config(&mock_server.uri(), true, None);
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_reporter(reporter.clone());

    let outcome = coordinator.run().await.expect("Crawl failed");

    let descriptions: Vec<&str> = outcome
        .result
        .entities()
        .iter()
        .map(|e| e.short_description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec!["Full description one", "snippet v2", "Full description three"]
    );
    assert_eq!(ids(&outcome.result), vec!["v1", "v2", "v3"]);

    let report = outcome.enrichment.as_ref().expect("Description pass should have run");
    assert_eq!(report.enriched, 2);
    assert_eq!(report.failed_ids, vec!["v2".to_string()]);
    assert!(outcome.descriptions_incomplete());

    let percents: Vec<u8> = reporter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ProgressEvent::DescriptionProgress { percent, .. } => Some(percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![33, 66, 100]);
}

#[tokio::test]
async fn test_watch_page_without_player_response_keeps_snippet() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, page(vec![renderer("v1")])).await;
    mount_watch(
        &mock_server,
        "v1",
        ResponseTemplate::new(200).set_body_string("<html><body>consent wall</body></html>"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), true, None);
    let outcome = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.result.entities()[0].short_description, "snippet v1");
}

#[tokio::test]
async fn test_concurrent_enrichment_preserves_order() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), renderer("v2"), renderer("v3"), renderer("v4")]),
    )
    .await;

    // Earlier videos answer slower so completions arrive out of order
    for (id, delay_ms) in [("v1", 300), ("v2", 200), ("v3", 100), ("v4", 0)] {
        mount_watch(
            &mock_server,
            id,
            ResponseTemplate::new(200)
                .set_body_string(watch_html(&format!("full {}", id)))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .await;
    }

    let reporter = Arc::new(RecordingReporter::new());
    let mut config = create_test_config(&mock_server.uri(), true, None);
    config.crawler.enrich_concurrency = 4;
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_reporter(reporter.clone());

    let outcome = coordinator.run().await.expect("Crawl failed");

    let descriptions: Vec<&str> = outcome
        .result
        .entities()
        .iter()
        .map(|e| e.short_description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["full v1", "full v2", "full v3", "full v4"]);

    let progress: Vec<(usize, u8)> = reporter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ProgressEvent::DescriptionProgress { index, percent, .. } => Some((index, percent)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(1, 25), (2, 50), (3, 75), (4, 100)]);
}

#[tokio::test]
async fn test_full_crawl_writes_output_document() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        page(vec![renderer("v1"), continuation("T1")]),
    )
    .await;
    mount_browse(&mock_server, "T1", page(vec![renderer("v2")]), 1).await;
    mount_watch(
        &mock_server,
        "v1",
        ResponseTemplate::new(200).set_body_string(watch_html("Descrição completa")),
    )
    .await;
    mount_watch(
        &mock_server,
        "v2",
        ResponseTemplate::new(200).set_body_string(watch_html("Second")),
    )
    .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("youtube_videos.json");

    let config = create_test_config(&mock_server.uri(), true, None);
    let outcome = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    write_crawl_result(&outcome.result, &output_path).expect("Failed to write output");

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    assert!(content.contains("Descrição completa"));

    let document: Value = serde_json::from_str(&content).expect("Output is not JSON");
    assert_eq!(document["channel"], CHANNEL);
    assert_eq!(
        document["videos_tab"],
        format!("{}{}", mock_server.uri(), LISTING_PATH)
    );
    assert_eq!(document["count"], 2);
    assert_eq!(document["videos"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        document["videos"][0],
        json!({
            "url": format!("{}/watch?v=v1", mock_server.uri()),
            "title": "Video v1",
            "description": "Descrição completa",
            "thumbnail": "https://i.ytimg.com/vi/v1/maxres.jpg"
        })
    );
    assert_eq!(document["videos"][1]["description"], "Second");
}
