//! End-to-end tests against wiremock servers standing in for the site

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xvideos_api::config::{Config, HttpConfig};
use xvideos_api::crawler::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
use xvideos_api::output::{
    format_markdown_summary, HarvestStatistics, HarvestSummary, OutputHandler,
};
use xvideos_api::{Client, ItemCoordinate, ItemResult, SearchFilters, XvError};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.http = HttpConfig {
        base_url: base_url.to_string(),
        user_agent: "xvideos-api-tests/1.0".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    };
    config.pipeline.page_concurrency = 2;
    config.pipeline.item_concurrency = 4;
    config
}

fn video_page(title: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{{"name": "{}", "uploadDate": "2024-01-02T03:04:05+00:00"}}</script></head>
<body><span class="duration">7 min</span></body></html>"#,
        title
    )
}

fn grid_page(links: &[&str]) -> String {
    let thumbs: String = links
        .iter()
        .map(|link| format!(r#"<div class="thumb"><a href="{}"><img></a></div>"#, link))
        .collect();
    format!("<html><body>{}</body></html>", thumbs)
}

async fn mount_video(server: &MockServer, video_path: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(video_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(video_page(title)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_fetcher_classifies_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&create_test_config(&mock_server.uri()).http).unwrap();

    match fetch_url(&client, &format!("{}/ok", mock_server.uri())).await {
        FetchResult::Success {
            status_code, body, ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(body, "hello");
        }
        other => panic!("expected success, got {:?}", other),
    }

    let fetcher = HttpFetcher::with_client(client);

    let body = fetcher
        .fetch(&format!("{}/ok", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "hello");

    let gone = fetcher.fetch(&format!("{}/gone", mock_server.uri())).await;
    assert!(matches!(gone, Err(XvError::HttpStatus { status: 410, .. })));
}

#[tokio::test]
async fn test_http_fetcher_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.http.timeout_secs = 1;
    let fetcher = HttpFetcher::new(&config.http).unwrap();

    let result = fetcher.fetch(&format!("{}/slow", mock_server.uri())).await;
    assert!(matches!(result, Err(XvError::Timeout { .. })));
}

#[tokio::test]
async fn test_search_streams_videos_in_listing_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("k", "cats"))
        .and(query_param("p", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(grid_page(&["/video1/first", "/video2/second"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("k", "cats"))
        .and(query_param("p", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(grid_page(&["/video3/third", "/tags/not-a-video"])),
        )
        .mount(&mock_server)
        .await;

    mount_video(&mock_server, "/video1/first", "First").await;
    mount_video(&mock_server, "/video3/third", "Third").await;

    // The second video page is broken
    Mock::given(method("GET"))
        .and(path("/video2/second"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = Client::new(create_test_config(&mock_server.uri())).unwrap();
    let results = client
        .search("cats", &SearchFilters::default(), 2)
        .unwrap()
        .collect_all()
        .await;

    assert_eq!(results.len(), 3);

    let coordinates: Vec<ItemCoordinate> = results.iter().map(|r| r.coordinate()).collect();
    assert_eq!(
        coordinates,
        vec![
            ItemCoordinate::new(0, 0),
            ItemCoordinate::new(0, 1),
            ItemCoordinate::new(1, 0),
        ]
    );

    assert_eq!(results[0].item().map(|v| v.title.as_str()), Some("First"));
    assert_eq!(results[0].item().and_then(|v| v.length.as_deref()), Some("7 min"));
    assert!(matches!(
        &results[1],
        ItemResult::Placeholder {
            error: XvError::HttpStatus { status: 500, .. },
            ..
        }
    ));
    assert_eq!(results[2].item().map(|v| v.title.as_str()), Some("Third"));
}

#[tokio::test]
async fn test_channel_listing_with_missing_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/somechannel/videos/best/0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"nb_videos": 2, "videos": [{"u": "/video10/a"}, {"u": "/video11/b"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    // Page 1 is not mounted and answers 404; page 2 exists again
    Mock::given(method("GET"))
        .and(path("/channels/somechannel/videos/best/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"videos": [{"u": "/video12/c"}]}"#),
        )
        .mount(&mock_server)
        .await;

    mount_video(&mock_server, "/video10/a", "A").await;
    mount_video(&mock_server, "/video11/b", "B").await;
    mount_video(&mock_server, "/video12/c", "C").await;

    let client = Client::new(create_test_config(&mock_server.uri())).unwrap();
    let mut stream = client.channel_videos("somechannel", 3).unwrap();

    let mut stats = HarvestStatistics::new();
    let mut summary = HarvestSummary::new("channel somechannel");
    let mut titles = Vec::new();

    while let Some(result) = stream.next_item().await {
        stats.record(&result).unwrap();
        summary.record(&result).unwrap();
        if let Some(video) = result.item() {
            titles.push(video.title.clone());
        }
    }
    stats.finish().unwrap();
    summary.finish().unwrap();

    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(stats.built, 3);
    assert_eq!(stats.placeholders, 0);
    assert_eq!(stats.last_page, Some(2));

    let markdown = format_markdown_summary(&summary);
    assert!(markdown.contains("- **Videos**: 3"));
}

#[tokio::test]
async fn test_get_video() {
    let mock_server = MockServer::start().await;
    mount_video(&mock_server, "/video42/answer", "The Answer").await;

    let client = Client::new(create_test_config(&mock_server.uri())).unwrap();
    let video = client
        .get_video(&format!("{}/video42/answer", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(video.title, "The Answer");
    assert!(video.published_at.is_some());
    assert_eq!(video.author, "Unknown");
}

#[tokio::test]
async fn test_get_video_on_other_host_is_rejected() {
    let mock_server = MockServer::start().await;
    let client = Client::new(create_test_config(&mock_server.uri())).unwrap();

    let result = client
        .get_video("https://www.xvideos.com/video42/answer")
        .await;
    assert!(matches!(result, Err(XvError::InvalidUrl { .. })));
}
