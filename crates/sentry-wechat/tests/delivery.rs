#![cfg(feature = "reqwest")]

use std::time::Duration;

use sentry_wechat::{
    EventRef, FailureKind, GroupRef, MemoryConfigStore, NotificationPlugin, NotificationTrigger,
    NotifierConfig, ProjectRef, SuppressReason, URLS_OPTION, WechatNotifier,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROBOT_PATH: &str = "/cgi-bin/webhook/send";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn robot_url(server: &MockServer, key: &str) -> String {
    format!("{}{ROBOT_PATH}?key={key}", server.uri())
}

fn notifier(urls: &[String], config: NotifierConfig) -> WechatNotifier<MemoryConfigStore> {
    let store = MemoryConfigStore::new();
    store.set_option("demo", URLS_OPTION, urls.join("\n"));
    WechatNotifier::with_reqwest(store, config).unwrap()
}

fn trigger(ignored: bool) -> NotificationTrigger {
    NotificationTrigger::new(
        ProjectRef::new("demo"),
        GroupRef::new("https://sentry.example/org/demo/").with_ignored(ignored),
        EventRef::new("42", "NullPointerException"),
    )
}

fn robot_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"}))
}

#[tokio::test]
async fn posts_markdown_payload_to_robot() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ROBOT_PATH))
        .and(query_param("key", "4929eab2"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "msgtype": "markdown",
            "markdown": {
                "content": "#### New alert from demo \n > NullPointerException [href](https://sentry.example/org/demo/events/42/)"
            }
        })))
        .respond_with(robot_ok())
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier(&[robot_url(&server, "4929eab2")], NotifierConfig::default());
    let outcome = notifier.notify(&trigger(false)).await;

    let results = outcome.deliveries();
    assert_eq!(results.len(), 1);
    assert!(results[0].success, "{:?}", results[0]);
    assert_eq!(results[0].status_code, Some(200));
    assert!(!results[0].endpoint.contains("4929eab2"));
}

#[tokio::test]
async fn posts_once_per_configured_url() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ROBOT_PATH))
        .respond_with(robot_ok())
        .expect(3)
        .mount(&server)
        .await;

    let urls = [
        robot_url(&server, "a"),
        robot_url(&server, "b"),
        robot_url(&server, "c"),
    ];
    let outcome = notifier(&urls, NotifierConfig::default())
        .notify(&trigger(false))
        .await;

    assert_eq!(outcome.succeeded(), 3);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.body == requests[0].body));
}

#[tokio::test]
async fn ignored_group_makes_no_request() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(robot_ok())
        .expect(0)
        .mount(&server)
        .await;

    let outcome = notifier(&[robot_url(&server, "a")], NotifierConfig::default())
        .notify(&trigger(true))
        .await;

    assert_eq!(outcome.suppressed(), Some(SuppressReason::GroupIgnored));
}

#[tokio::test]
async fn timeout_does_not_block_other_targets() {
    init_tracing();
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(robot_ok().set_delay(Duration::from_secs(5)))
        .mount(&slow)
        .await;
    Mock::given(method("POST"))
        .respond_with(robot_ok())
        .expect(1)
        .mount(&fast)
        .await;

    let urls = [robot_url(&slow, "slow"), robot_url(&fast, "fast")];
    let outcome = notifier(&urls, NotifierConfig::new(1))
        .notify(&trigger(false))
        .await;

    let results = outcome.deliveries();
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert_eq!(results[0].failure, Some(FailureKind::Timeout));
    assert!(results[1].success);
}

#[tokio::test]
async fn stalled_body_after_success_status_is_a_timeout() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"errcode\"")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let urls = [format!("http://{addr}{ROBOT_PATH}?key=stalled")];
    let outcome = notifier(&urls, NotifierConfig::new(1))
        .notify(&trigger(false))
        .await;

    let result = &outcome.deliveries()[0];
    assert!(!result.success, "{result:?}");
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.failure, Some(FailureKind::Timeout));
}

#[tokio::test]
async fn duplicate_url_lines_are_each_posted() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ROBOT_PATH))
        .respond_with(robot_ok())
        .expect(2)
        .mount(&server)
        .await;

    let url = robot_url(&server, "same");
    let outcome = notifier(&[url.clone(), url], NotifierConfig::default())
        .notify(&trigger(false))
        .await;

    assert_eq!(outcome.deliveries().len(), 2);
    assert_eq!(outcome.succeeded(), 2);
}

#[tokio::test]
async fn non_success_status_is_a_failed_delivery() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = notifier(&[robot_url(&server, "a")], NotifierConfig::default())
        .notify(&trigger(false))
        .await;

    let result = &outcome.deliveries()[0];
    assert!(!result.success);
    assert_eq!(result.status_code, Some(502));
    assert_eq!(result.failure, Some(FailureKind::HttpStatus));
    assert!(result.is_retryable());
}

#[tokio::test]
async fn robot_errcode_is_a_failed_delivery() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"errcode": 93000, "errmsg": "invalid webhook url"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = notifier(&[robot_url(&server, "a")], NotifierConfig::default())
        .notify(&trigger(false))
        .await;

    let result = &outcome.deliveries()[0];
    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::Rejected));
    assert_eq!(result.status_code, Some(200));
    assert_eq!(
        result.error.as_deref(),
        Some("[external_error]: errcode 93000: invalid webhook url")
    );
}

#[tokio::test]
async fn refused_connection_is_a_failed_delivery() {
    init_tracing();
    let server = MockServer::start().await;
    let reachable = robot_url(&server, "a");

    Mock::given(method("POST"))
        .respond_with(robot_ok())
        .expect(1)
        .mount(&server)
        .await;

    let urls = ["http://127.0.0.1:1/hook".to_owned(), reachable];
    let outcome = notifier(&urls, NotifierConfig::default())
        .notify(&trigger(false))
        .await;

    let results = outcome.deliveries();
    assert_eq!(results[0].failure, Some(FailureKind::Connection));
    assert!(results[1].success);
}

#[tokio::test]
async fn unconfigured_project_is_suppressed() {
    init_tracing();
    let notifier =
        WechatNotifier::with_reqwest(MemoryConfigStore::new(), NotifierConfig::default()).unwrap();

    assert!(!notifier.is_configured("demo"));
    let outcome = notifier.notify(&trigger(false)).await;
    assert_eq!(outcome.suppressed(), Some(SuppressReason::NotConfigured));
}
