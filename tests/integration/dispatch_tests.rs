use crate::common::{fast_config, html};
use purr_links::config::Config;
use purr_links::output::{ChatTarget, RecordingSink, ResolutionContext, ResultSink};
use purr_links::ResolverDispatcher;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records everything except lines containing "boom", which make it panic
struct FragileSink {
    inner: RecordingSink,
}

impl ResultSink for FragileSink {
    fn message(&self, target: &ChatTarget, text: &str) {
        if text.contains("boom") {
            panic!("sink cannot handle {}", text);
        }
        self.inner.message(target, text);
    }
}

async fn mount_page(mock_server: &MockServer, page: &str, title: &str) {
    Mock::given(method("HEAD"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(&format!("<title>{}</title>", title)))
        .mount(mock_server)
        .await;
}

fn dispatcher_with(config: &Config) -> (ResolverDispatcher, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let dispatcher = ResolverDispatcher::new(config, sink.clone()).expect("Failed to build dispatcher");
    (dispatcher, sink)
}

#[tokio::test]
async fn test_each_link_in_a_message_is_resolved() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a", "Page A").await;
    mount_page(&mock_server, "/b", "Page B").await;

    let (dispatcher, sink) = dispatcher_with(&fast_config());
    let message = format!("see {0}/a and {0}/b", mock_server.uri());

    let spawned = dispatcher.handle_message(&message, &ResolutionContext::new("#cats"));
    assert_eq!(spawned, 2);

    dispatcher.settle().await;

    let mut texts = sink.texts();
    texts.sort();
    assert_eq!(texts, vec!["[127.0.0.1] Page A", "[127.0.0.1] Page B"]);
    assert!(sink
        .messages()
        .iter()
        .all(|(target, _)| target == &ChatTarget::new("#cats")));
}

#[tokio::test]
async fn test_duplicate_links_resolved_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/dup"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(html("<title>Once</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (dispatcher, sink) = dispatcher_with(&fast_config());
    let message = format!("{0}/dup {0}/dup", mock_server.uri());

    assert_eq!(dispatcher.handle_message(&message, &ResolutionContext::new("#cats")), 1);
    dispatcher.settle().await;
    assert_eq!(sink.texts(), vec!["[127.0.0.1] Once"]);
}

#[tokio::test]
async fn test_unresolvable_host_produces_no_output() {
    let (dispatcher, sink) = dispatcher_with(&fast_config());

    let spawned = dispatcher.handle_message(
        "have you seen http://nonexistent.invalid/page yet",
        &ResolutionContext::new("#cats"),
    );
    assert_eq!(spawned, 1);

    dispatcher.settle().await;
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_slow_link_does_not_block_others() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/fast", "Fast").await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = fast_config();
    config.resolver.read_timeout_ms = 10_000;
    let (dispatcher, sink) = dispatcher_with(&config);

    let message = format!("{0}/slow {0}/fast", mock_server.uri());
    assert_eq!(dispatcher.handle_message(&message, &ResolutionContext::new("#cats")), 2);

    let delivered = tokio::time::timeout(Duration::from_secs(2), async {
        while sink.is_empty() || dispatcher.in_flight() > 1 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;

    assert!(delivered.is_ok());
    assert_eq!(sink.texts(), vec!["[127.0.0.1] Fast"]);
    assert_eq!(dispatcher.in_flight(), 1);

    dispatcher.shutdown();
}

#[tokio::test]
async fn test_panicking_sink_does_not_affect_siblings() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/bad", "boom").await;
    mount_page(&mock_server, "/good", "fine").await;

    let sink = Arc::new(FragileSink {
        inner: RecordingSink::new(),
    });
    let dispatcher =
        ResolverDispatcher::new(&fast_config(), sink.clone()).expect("Failed to build dispatcher");

    let message = format!("{0}/bad {0}/good", mock_server.uri());
    assert_eq!(dispatcher.handle_message(&message, &ResolutionContext::new("#cats")), 2);
    dispatcher.settle().await;

    assert_eq!(sink.inner.texts(), vec!["[127.0.0.1] fine"]);

    // The dispatcher keeps working after a task panicked
    mount_page(&mock_server, "/later", "later").await;
    let message = format!("{}/later", mock_server.uri());
    assert_eq!(dispatcher.handle_message(&message, &ResolutionContext::new("#cats")), 1);
    dispatcher.settle().await;
    assert_eq!(sink.inner.len(), 2);
}

#[tokio::test]
async fn test_shutdown_cancels_in_flight_resolution() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<title>Too Late</title>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = fast_config();
    config.resolver.read_timeout_ms = 20_000;
    let (dispatcher, sink) = dispatcher_with(&config);

    let message = format!("{}/slow", mock_server.uri());
    assert_eq!(dispatcher.handle_message(&message, &ResolutionContext::new("#cats")), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dispatcher.in_flight(), 1);

    dispatcher.shutdown();

    let drained = tokio::time::timeout(Duration::from_secs(2), dispatcher.settle()).await;
    assert!(drained.is_ok());
    assert_eq!(dispatcher.in_flight(), 0);
    assert!(sink.is_empty());
}
