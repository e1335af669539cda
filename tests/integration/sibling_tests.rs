use crate::common::fast_config;
use purr_links::config::Config;
use purr_links::output::{RecordingSink, ResolutionContext};
use purr_links::ResolverDispatcher;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(mock_server: &MockServer) -> Config {
    let mut config = fast_config();
    config.giphy.api_base = mock_server.uri();
    config.spotify.lookup_base = mock_server.uri();
    config
}

async fn run(config: &Config, message: &str) -> Vec<String> {
    let sink = Arc::new(RecordingSink::new());
    let dispatcher = ResolverDispatcher::new(config, sink.clone()).expect("Failed to build dispatcher");
    dispatcher.handle_message(message, &ResolutionContext::new("#cats"));
    dispatcher.settle().await;
    sink.texts()
}

#[tokio::test]
async fn test_giphy_quoted_phrase_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .and(query_param("q", "blood sword"))
        .and(query_param("api_key", "dc6zaTOxFJmzC"))
        .and(query_param("rating", "pg-13"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "abc", "embed_url": "https://giphy.com/embed/abc"}],
            "meta": {"status": 200}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let texts = run(&config_for(&mock_server), "gif:\"blood sword\"").await;
    assert_eq!(texts, vec!["https://giphy.com/embed/abc"]);
}

#[tokio::test]
async fn test_giphy_no_results_is_silent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(run(&config_for(&mock_server), "gif:cat").await.is_empty());
}

#[tokio::test]
async fn test_giphy_malformed_response_is_silent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(run(&config_for(&mock_server), "giphy:cat").await.is_empty());
}

#[tokio::test]
async fn test_giphy_disabled_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.giphy.enabled = false;
    assert!(run(&config, "gif:cat").await.is_empty());
}

#[tokio::test]
async fn test_spotify_track_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lookup/1/"))
        .and(query_param("uri", "spotify:track:6rqhFgbbKwnb9MLmUQDhG6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": {"type": "track"},
            "track": {
                "name": "One More Time",
                "artists": [{"name": "Daft Punk"}],
                "album": {"name": "Discovery", "released": "2001"}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let texts = run(
        &config_for(&mock_server),
        "listen spotify:track:6rqhFgbbKwnb9MLmUQDhG6",
    )
    .await;
    assert_eq!(texts, vec!["One More Time - Daft Punk - Discovery (2001)"]);
}

#[tokio::test]
async fn test_spotify_album_is_silent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lookup/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": {"type": "album"},
            "album": {"name": "Discovery"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(run(&config_for(&mock_server), "spotify:album:abc").await.is_empty());
}
