use std::collections::{BTreeMap, HashMap};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientOptions, DefaultParams, EndpointDefinition, Result};

/// Declarative description of one HTTP API.
///
/// Deserializes from camelCase JSON:
///
/// ```json
/// {
///   "baseUrl": "https://api.example.com/v1/",
///   "headers": { "Authorization": "Bearer ..." },
///   "logging": true,
///   "retries": 3,
///   "endpoints": [
///     { "name": "getPage", "path": "pages/:pageId", "method": "GET" }
///   ],
///   "defaults": {
///     "getPage": { "params": { "pageId": "home" } }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Prefix prepended verbatim to every filled path.
    #[serde(default)]
    pub base_url: String,
    pub endpoints: Vec<EndpointDefinition>,
    #[serde(default)]
    pub defaults: HashMap<String, DefaultParams>,
    /// Static headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Log every request (see [`ClientOptions::log_requests`]).
    #[serde(default)]
    pub logging: bool,
    /// Overrides [`ClientOptions::max_retries`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<usize>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, endpoints: Vec<EndpointDefinition>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| ClientError::Config(format!("invalid api config: {err}")))
    }

    /// Reads a JSON config file.
    ///
    /// **Not available on `wasm32` targets** — there is no filesystem.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            ClientError::Config(format!("could not read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Converts the static headers into a validated header map.
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ClientError::Config(format!("invalid header name '{name}': {err}")))?;
            let value = HeaderValue::from_str(value).map_err(|err| {
                ClientError::Config(format!("invalid value for header '{name}': {err}"))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Applies the `logging` and `retries` overrides to `options`.
    pub(crate) fn apply_to(&self, mut options: ClientOptions) -> ClientOptions {
        options.log_requests |= self.logging;
        if let Some(retries) = self.retries {
            options.max_retries = retries;
        }
        options
    }
}
