#![allow(clippy::unwrap_used)]
// Integration tests for `EverhomeClient` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use everhome_api::{EverhomeClient, Error, StaticToken, TokenProvider, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, EverhomeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = EverhomeClient::with_client(
        reqwest::Client::new(),
        base_url,
        Arc::new(StaticToken::from("test-token".to_string())),
    );
    (server, client)
}

struct FailingProvider;

impl TokenProvider for FailingProvider {
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>> {
        Box::pin(async {
            Err(Error::Authentication {
                message: "refresh token revoked".into(),
            })
        })
    }
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/device"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "subtype": "shutter", "name": "Kitchen", "position": 30 },
            { "id": "t1", "subtype": "thermostat" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    // No subtype filtering at this layer.
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id.as_deref(), Some("s1"));
    assert_eq!(devices[0].position, Some(30));
    assert_eq!(devices[1].subtype.as_deref(), Some("thermostat"));
}

#[tokio::test]
async fn test_list_devices_skips_non_object_elements() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "garbage",
            42,
            { "id": "l1", "subtype": "light" }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id.as_deref(), Some("l1"));
}

#[tokio::test]
async fn test_list_devices_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    match result {
        Err(Error::Http { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_devices_object_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_devices_timeout_is_transport_error() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    };
    let client = EverhomeClient::new(
        Url::parse(&server.uri()).unwrap(),
        Arc::new(StaticToken::from("test-token".to_string())),
        &transport,
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_token_provider_failure_sends_nothing() {
    let server = MockServer::start().await;
    let client = EverhomeClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Arc::new(FailingProvider),
    );

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_auth_failure(), "expected auth failure, got: {err:?}");
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/", server.uri())).unwrap();
    let client = EverhomeClient::with_client(
        reqwest::Client::new(),
        base_url,
        Arc::new(StaticToken::from("test-token".to_string())),
    );

    Mock::given(method("GET"))
        .and(path("/api/v1/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap().is_empty());
}

// ── Actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_execute_action_posts_merged_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/device/s1/execute"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "action": "set_position", "position": 40 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = Map::new();
    params.insert("position".into(), Value::from(40));
    client
        .execute_action("s1", "set_position", &params)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_execute_action_accepts_any_2xx() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/device/s1/execute"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.execute_action("s1", "up", &Map::new()).await.unwrap();
}

#[tokio::test]
async fn test_execute_action_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/device/s1/execute"))
        .and(body_json(json!({ "action": "up" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown action"))
        .mount(&server)
        .await;

    let result = client.execute_action("s1", "up", &Map::new()).await;
    assert!(
        matches!(result, Err(Error::Http { status: 400, .. })),
        "expected 400 Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_execute_action_escapes_device_id() {
    let (server, client) = setup().await;

    for expected in [
        "/device/a%2Fb/execute",
        "/device/x%3Fy/execute",
        "/device/k%23frag/execute",
        "/device/..%2Fother/execute",
    ] {
        Mock::given(method("POST"))
            .and(path(expected))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    for id in ["a/b", "x?y", "k#frag", "../other"] {
        client.execute_action(id, "up", &Map::new()).await.unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|r| r.url.query().is_none()));
}

#[tokio::test]
async fn test_execute_action_rejects_dot_segment_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for id in ["", ".", ".."] {
        let result = client.execute_action(id, "up", &Map::new()).await;
        assert!(
            matches!(&result, Err(Error::InvalidPathSegment { segment }) if segment == id),
            "expected InvalidPathSegment for {id:?}, got: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_execute_action_keeps_base_path_prefix() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v1/", server.uri())).unwrap();
    let client = EverhomeClient::with_client(
        reqwest::Client::new(),
        base_url,
        Arc::new(StaticToken::from("test-token".to_string())),
    );

    Mock::given(method("POST"))
        .and(path("/api/v1/device/s1/execute"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.execute_action("s1", "up", &Map::new()).await.unwrap();
}
