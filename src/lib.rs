//! `endpoint-client` is a configuration-driven async HTTP client.
//!
//! Declare endpoints once (name, `:param` path template, method, defaults)
//! and invoke them by name:
//! - [`ApiClient::invoke`] / [`EndpointHandle::invoke`]
//! - [`MultiApiClient::invoke`] for several APIs behind one entry point
//!
//! Requests answered with `429 Too Many Requests` are resent after the
//! server's `Retry-After` delay, up to [`ClientOptions::max_retries`] times.

mod client;
mod config;
mod decode;
mod endpoint;
mod error;
mod multi;
mod options;
mod path;
mod registry;
mod request;
mod retry;
mod transport;
mod types;

pub use client::{ApiClient, EndpointHandle};
pub use config::ApiConfig;
pub use decode::Payload;
pub use endpoint::{DefaultParams, EndpointDefinition, HttpMethod};
pub use error::ClientError;
pub use multi::MultiApiClient;
pub use options::{ClientOptions, DecodePolicy, ExhaustionPolicy};
pub use path::fill_path;
pub use registry::EndpointRegistry;
pub use request::{InvokeArgs, RequestDescriptor, RequestOverrides};
pub use transport::{
    MaybeSendSync, ReqwestTransport, Sleeper, TimerSleeper, Transport, TransportResponse,
};
pub use types::Outcome;

pub use reqwest::{header, Method, StatusCode};

/// JSON object used for params and bodies.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

pub type Result<T> = std::result::Result<T, ClientError>;
