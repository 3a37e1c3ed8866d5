use std::collections::HashMap;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::{
    path::fill_path, ClientError, DefaultParams, EndpointDefinition, HttpMethod, InvokeArgs,
    JsonMap, RequestDescriptor, Result,
};

/// Read-only lookup of endpoint definitions and their default tables.
#[derive(Clone, Debug, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, EndpointDefinition>,
    defaults: HashMap<String, DefaultParams>,
}

impl EndpointRegistry {
    /// Builds a registry, rejecting duplicate endpoint names.
    ///
    /// Default entries for names that are not registered are kept; they are
    /// simply never consulted.
    pub fn new<I>(endpoints: I, defaults: HashMap<String, DefaultParams>) -> Result<Self>
    where
        I: IntoIterator<Item = EndpointDefinition>,
    {
        let mut registry = Self {
            endpoints: HashMap::new(),
            defaults,
        };
        for endpoint in endpoints {
            registry.register(endpoint)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, endpoint: EndpointDefinition) -> Result<()> {
        if self.endpoints.contains_key(&endpoint.name) {
            return Err(ClientError::Config(format!(
                "duplicate endpoint name '{}'",
                endpoint.name
            )));
        }
        self.endpoints.insert(endpoint.name.clone(), endpoint);
        Ok(())
    }

    pub fn set_defaults(&mut self, name: impl Into<String>, defaults: DefaultParams) {
        self.defaults.insert(name.into(), defaults);
    }

    pub fn get(&self, name: &str) -> Option<&EndpointDefinition> {
        self.endpoints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    /// Registered endpoint names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Caller params win as a whole; there is no per-key merge with defaults.
    pub fn resolve_params(&self, name: &str, caller: Option<JsonMap>) -> JsonMap {
        caller
            .or_else(|| {
                self.defaults
                    .get(name)
                    .and_then(|defaults| defaults.params.clone())
            })
            .unwrap_or_default()
    }

    /// Shallow merge of the default body and the caller body.
    ///
    /// The default body comes from the defaults table, falling back to the
    /// endpoint's static body. Caller keys replace default keys wholesale,
    /// nested objects included.
    pub fn resolve_body(&self, name: &str, caller: Option<JsonMap>) -> Option<JsonMap> {
        let default = self
            .defaults
            .get(name)
            .and_then(|defaults| defaults.body.clone())
            .or_else(|| self.endpoints.get(name).and_then(|e| e.body.clone()));

        match (default, caller) {
            (None, None) => None,
            (Some(default), None) => Some(default),
            (None, Some(caller)) => Some(caller),
            (Some(mut merged), Some(caller)) => {
                merged.extend(caller);
                Some(merged)
            }
        }
    }

    /// Resolves `name` and caller arguments into a request descriptor.
    ///
    /// Returns `Ok(None)` when `name` is not registered.
    pub fn build_request(
        &self,
        name: &str,
        args: InvokeArgs,
        base_url: &str,
        headers: &HeaderMap,
    ) -> Result<Option<RequestDescriptor>> {
        let Some(endpoint) = self.endpoints.get(name) else {
            return Ok(None);
        };

        let params = self.resolve_params(name, args.params);
        let url = format!("{base_url}{}", fill_path(&endpoint.path, &params));

        let mut merged = headers.clone();
        for key in args.other.headers.keys() {
            merged.remove(key);
        }
        for (key, value) in args.other.headers.iter() {
            merged.append(key.clone(), value.clone());
        }

        let body = match endpoint.method {
            HttpMethod::Get => None,
            _ => self
                .resolve_body(name, args.body)
                .map(|body| serde_json::to_string(&body))
                .transpose()
                .map_err(ClientError::Encode)?,
        };
        if body.is_some() {
            merged
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
        }

        Ok(Some(RequestDescriptor {
            url,
            method: endpoint.method.to_reqwest(),
            headers: merged,
            body,
            timeout: args.other.timeout,
        }))
    }
}
