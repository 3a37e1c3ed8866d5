use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use endpoint_client::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER},
    ApiClient, ApiConfig, ClientError, ClientOptions, DecodePolicy, EndpointDefinition,
    ExhaustionPolicy, HttpMethod, InvokeArgs, MultiApiClient, Outcome, Payload,
    RequestDescriptor, RequestOverrides, Sleeper, StatusCode, Transport, TransportResponse,
};
use serde_json::json;

/// Replays queued responses and records every request it was handed.
#[derive(Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<endpoint_client::Result<TransportResponse>>>>,
    sent: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<endpoint_client::Result<TransportResponse>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            sent: Arc::default(),
        }
    }

    fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().expect("sent mutex must not be poisoned").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> endpoint_client::Result<TransportResponse> {
        self.sent
            .lock()
            .expect("sent mutex must not be poisoned")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses mutex must not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Backend("script exhausted".into())))
    }
}

#[derive(Clone, Copy, Default)]
struct InstantSleeper;

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

fn json_response(status: StatusCode, body: &str) -> endpoint_client::Result<TransportResponse> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(TransportResponse::new(status, headers, body))
}

fn throttled(seconds: &'static str) -> endpoint_client::Result<TransportResponse> {
    let mut headers = HeaderMap::new();
    headers.insert(RETRY_AFTER, HeaderValue::from_static(seconds));
    Ok(TransportResponse::new(
        StatusCode::TOO_MANY_REQUESTS,
        headers,
        "",
    ))
}

fn client(base_url: &str, transport: ScriptedTransport) -> ApiClient {
    let config = ApiConfig::new(
        base_url,
        vec![
            EndpointDefinition::new("getPage", "pages/:pageId", HttpMethod::Get),
            EndpointDefinition::new("updatePage", "pages/:pageId", HttpMethod::Patch),
        ],
    );
    ApiClient::new(config)
        .expect("config must be valid")
        .with_transport(transport)
        .with_sleeper(InstantSleeper)
}

#[tokio::test]
async fn retries_reuse_the_identical_descriptor() {
    let transport = ScriptedTransport::new(vec![
        throttled("1"),
        throttled("1"),
        json_response(StatusCode::OK, "{}"),
    ]);
    let client = client("https://api.example.com/", transport.clone());

    client
        .invoke(
            "updatePage",
            InvokeArgs::new()
                .path_params([("pageId", "p1")])
                .body(json!({"title": "New"}).as_object().cloned().unwrap_or_default()),
        )
        .await
        .expect("must succeed on third attempt");

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    for request in &sent {
        assert_eq!(request.url, "https://api.example.com/pages/p1");
        assert_eq!(request.method, endpoint_client::Method::PATCH);
        assert_eq!(request.body.as_deref(), Some(r#"{"title":"New"}"#));
        assert_eq!(request.timeout, Some(Duration::from_millis(30_000)));
    }
}

#[tokio::test]
async fn exhaustion_can_be_an_error() {
    let transport = ScriptedTransport::new(vec![throttled("0"), throttled("0"), throttled("0")]);
    let client = client("/", transport.clone()).with_options(ClientOptions {
        max_retries: 2,
        exhaustion_policy: ExhaustionPolicy::Error,
        ..ClientOptions::default()
    });

    let err = client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect_err("exhaustion must be an error under the error policy");

    assert!(matches!(err, ClientError::RetriesExhausted { attempts: 3 }));
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn zero_retries_gives_up_on_first_throttle() {
    let transport = ScriptedTransport::new(vec![throttled("5")]);
    let client = client("/", transport.clone()).with_options(ClientOptions {
        max_retries: 0,
        ..ClientOptions::default()
    });

    let outcome = client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect("must resolve");

    assert_eq!(
        outcome,
        Outcome::RetriesExhausted {
            attempts: 1,
            last_retry_after: Some(5),
        }
    );
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn strict_decode_policy_surfaces_malformed_json() {
    let transport = ScriptedTransport::new(vec![json_response(StatusCode::OK, "[1,")]);
    let client = client("/", transport).with_options(ClientOptions {
        decode_policy: DecodePolicy::Strict,
        ..ClientOptions::default()
    });

    let err = client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect_err("strict decode must fail");

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn backend_errors_propagate() {
    let transport = ScriptedTransport::new(vec![Err(ClientError::Backend(
        "connection reset".into(),
    ))]);
    let client = client("/", transport);

    let err = client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect_err("backend error must propagate");

    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn endpoint_handle_invokes_its_endpoint() {
    let transport = ScriptedTransport::new(vec![json_response(StatusCode::OK, r#"{"id":"x"}"#)]);
    let client = client("https://api.example.com/", transport.clone());

    let outcome = client
        .endpoint("getPage")
        .expect("getPage must be registered")
        .invoke(InvokeArgs::new().path_params([("pageId", "x")]))
        .await
        .expect("must succeed");

    assert_eq!(outcome, Outcome::Response(Payload::Json(json!({"id": "x"}))));
    assert_eq!(transport.sent()[0].url, "https://api.example.com/pages/x");
    assert!(transport.sent()[0].body.is_none());
}

#[tokio::test]
async fn multi_api_dispatches_by_key_with_default() {
    let pages = ScriptedTransport::new(vec![
        json_response(StatusCode::OK, "1"),
        json_response(StatusCode::OK, "2"),
    ]);
    let search = ScriptedTransport::new(vec![json_response(StatusCode::OK, "3")]);
    let apis = MultiApiClient::new("pages", client("https://pages.example.com/", pages.clone()))
        .with_api(
            "search",
            client("https://search.example.com/", search.clone()),
        );

    assert_eq!(apis.default_api(), "pages");

    let default = apis
        .invoke(None, "getPage", InvokeArgs::new())
        .await
        .expect("default api must answer");
    let named = apis
        .invoke(Some("search"), "getPage", InvokeArgs::new())
        .await
        .expect("named api must answer");
    let missing = apis
        .invoke(Some("billing"), "getPage", InvokeArgs::new())
        .await
        .expect("unknown api is not an error");

    assert_eq!(default, Outcome::Response(Payload::Json(json!(1))));
    assert_eq!(named, Outcome::Response(Payload::Json(json!(3))));
    assert_eq!(
        missing,
        Outcome::UnknownApi {
            name: "billing".to_owned()
        }
    );
    assert_eq!(pages.sent().len(), 1);
    assert_eq!(search.sent()[0].url, "https://search.example.com/pages/:pageId");
}

/// Records requested delays without waiting.
#[derive(Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays
            .lock()
            .expect("delays mutex must not be poisoned")
            .push(duration);
    }
}

#[tokio::test]
async fn huge_retry_after_saturates_instead_of_panicking() {
    let transport = ScriptedTransport::new(vec![
        throttled("18446744073709551615"),
        json_response(StatusCode::OK, "{}"),
    ]);
    let sleeper = RecordingSleeper::default();
    let client = client("/", transport.clone()).with_sleeper(sleeper.clone());

    let outcome = client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect("oversized Retry-After must not fail the call");

    assert_eq!(outcome, Outcome::Response(Payload::Json(json!({}))));
    assert_eq!(
        *sleeper.delays.lock().expect("delays mutex must not be poisoned"),
        vec![Duration::MAX]
    );
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn options_timeout_reaches_the_transport() {
    let transport = ScriptedTransport::new(vec![json_response(StatusCode::OK, "{}")]);
    let client = client("/", transport.clone()).with_options(ClientOptions {
        timeout_ms: 1_234,
        ..ClientOptions::default()
    });

    client
        .invoke("getPage", InvokeArgs::new())
        .await
        .expect("must succeed");

    assert_eq!(
        transport.sent()[0].timeout,
        Some(Duration::from_millis(1_234))
    );
}

#[tokio::test]
async fn per_call_timeout_wins_over_options() {
    let transport = ScriptedTransport::new(vec![json_response(StatusCode::OK, "{}")]);
    let client = client("/", transport.clone());

    client
        .invoke(
            "getPage",
            InvokeArgs::new().other(RequestOverrides {
                timeout: Some(Duration::from_millis(50)),
                ..RequestOverrides::default()
            }),
        )
        .await
        .expect("must succeed");

    assert_eq!(transport.sent()[0].timeout, Some(Duration::from_millis(50)));
}
