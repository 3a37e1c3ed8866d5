use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap},
    StatusCode,
};
use serde::de::DeserializeOwned;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{ClientError, RequestDescriptor, Result};

/// Buffered HTTP response handed back by a [`Transport`].
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Header value as text; `None` if absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// `Send + Sync` on native targets; no bound on wasm32, where reqwest's
/// fetch futures are not `Send`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// Executes a resolved request.
///
/// Implement this to route requests through another HTTP stack or to script
/// responses in tests.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: MaybeSendSync {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse>;
}

/// Default transport backed by `reqwest`.
///
/// Requests without a descriptor timeout use the `reqwest::Client` settings.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        // On WASM, reqwest uses AbortController for timeout; the `.timeout()`
        // method is available on both targets.
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(ClientError::Transport)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// Waits between rate-limited attempts.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Sleeper: MaybeSendSync {
    async fn sleep(&self, duration: Duration);
}

/// Default sleeper.
///
/// On native targets: `tokio::time::sleep`.
/// On WASM targets: a browser timer via `gloo-timers`, capped at
/// `u32::MAX` milliseconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerSleeper;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Sleeper for TimerSleeper {
    async fn sleep(&self, duration: Duration) {
        #[cfg(not(target_arch = "wasm32"))]
        sleep(duration).await;

        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(timer_millis(duration)).await;
    }
}

/// Browser timers take a `u32` millisecond delay.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn timer_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
