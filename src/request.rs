use std::time::Duration;

use reqwest::{header::HeaderMap, Method};

use crate::JsonMap;

/// Fully resolved request, built once per call and resent verbatim on retry.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    /// Serialized JSON body. Always `None` for GET.
    pub body: Option<String>,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
}

/// Extra transport options spliced into a single call.
#[derive(Clone, Debug, Default)]
pub struct RequestOverrides {
    /// Headers that replace same-named client headers.
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

/// Caller arguments for one endpoint invocation.
///
/// Fields left as `None` fall back to the endpoint's defaults.
#[derive(Clone, Debug, Default)]
pub struct InvokeArgs {
    pub body: Option<JsonMap>,
    pub params: Option<JsonMap>,
    pub other: RequestOverrides,
}

impl InvokeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: JsonMap) -> Self {
        self.body = Some(body);
        self
    }

    pub fn params(mut self, params: JsonMap) -> Self {
        self.params = Some(params);
        self
    }

    /// Builds params from string pairs, the common case for path templates.
    pub fn path_params<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), serde_json::Value::String(value.into())))
                .collect(),
        )
    }

    pub fn other(mut self, other: RequestOverrides) -> Self {
        self.other = other;
        self
    }
}
