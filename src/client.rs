use std::{fmt, sync::Arc, time::Duration};

use reqwest::{header::HeaderMap, StatusCode};

use crate::{
    decode::decode_response,
    registry::EndpointRegistry,
    retry::{retry_after_seconds, retry_delay, RetryState},
    ApiConfig, ClientError, ClientOptions, EndpointDefinition, ExhaustionPolicy, InvokeArgs,
    Outcome, ReqwestTransport, RequestDescriptor, Result, Sleeper, TimerSleeper, Transport,
};

/// HTTP client exposing a fixed set of named endpoints.
///
/// Cloning is cheap: the registry, transport and sleeper are shared.
#[derive(Clone)]
pub struct ApiClient {
    registry: Arc<EndpointRegistry>,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    base_url: String,
    headers: HeaderMap,
    options: ClientOptions,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .keys()
            .map(|name| (name.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.registry.names())
            .field("headers", &headers)
            .field("options", &self.options)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client from a declarative config using the `reqwest`
    /// transport.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use endpoint_client::{ApiClient, ApiConfig, EndpointDefinition, HttpMethod};
    ///
    /// let config = ApiConfig::new(
    ///     "https://api.example.com/",
    ///     vec![EndpointDefinition::new("getPage", "pages/:pageId", HttpMethod::Get)],
    /// );
    /// let client = ApiClient::new(config).expect("valid config");
    /// ```
    pub fn new(config: ApiConfig) -> Result<Self> {
        let headers = config.header_map()?;
        let options = config.apply_to(ClientOptions::default());
        let registry = EndpointRegistry::new(config.endpoints, config.defaults)?;
        Ok(Self::from_registry(registry, config.base_url)
            .with_headers(headers)
            .with_options(options))
    }

    /// Creates a client around an already built registry.
    pub fn from_registry(registry: EndpointRegistry, base_url: impl Into<String>) -> Self {
        let options = ClientOptions::default();
        Self {
            registry: Arc::new(registry),
            transport: Arc::new(ReqwestTransport::new()),
            sleeper: Arc::new(TimerSleeper),
            base_url: base_url.into(),
            headers: HeaderMap::new(),
            options,
        }
    }

    /// Applies client options such as timeout, retry and decode behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the static headers sent with every request.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn with_sleeper<S: Sleeper + 'static>(mut self, sleeper: S) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registered endpoint names, sorted.
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Returns a handle bound to one endpoint, or `None` if not registered.
    pub fn endpoint(&self, name: &str) -> Option<EndpointHandle<'_>> {
        let definition = self.registry.get(name)?;
        Some(EndpointHandle {
            client: self,
            definition,
        })
    }

    /// Invokes the endpoint registered under `name`.
    ///
    /// Unknown names resolve to [`Outcome::UnknownEndpoint`] without any
    /// network call. Non-429 error statuses and 429 responses without a
    /// usable `Retry-After` header are returned as errors.
    pub async fn invoke(&self, name: &str, args: InvokeArgs) -> Result<Outcome> {
        let Some(mut request) =
            self.registry
                .build_request(name, args, &self.base_url, &self.headers)?
        else {
            #[cfg(feature = "tracing")]
            tracing::warn!("no endpoint registered under '{}'", name);
            return Ok(Outcome::UnknownEndpoint {
                name: name.to_owned(),
            });
        };

        request
            .timeout
            .get_or_insert(Duration::from_millis(self.options.timeout_ms));
        self.send_with_retry(&request).await
    }

    async fn send_with_retry(&self, request: &RequestDescriptor) -> Result<Outcome> {
        let mut state = RetryState::new(self.options.max_retries);
        loop {
            state.attempts += 1;
            self.log_request(request, state.attempts);

            let response = self.transport.send(request).await?;
            if response.ok() {
                return decode_response(response, self.options.decode_policy)
                    .map(Outcome::Response);
            }

            if response.status != StatusCode::TOO_MANY_REQUESTS {
                return Err(ClientError::Http {
                    status: response.status.as_u16(),
                    status_text: response.status_text().to_owned(),
                    body: response.body,
                });
            }

            let retry_after = retry_after_seconds(&response, &request.url)?;
            if !state.throttled(retry_after) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "giving up on {} after {} rate-limited attempts",
                    request.url,
                    state.attempts
                );
                return match self.options.exhaustion_policy {
                    ExhaustionPolicy::ReturnMarker => Ok(Outcome::RetriesExhausted {
                        attempts: state.attempts,
                        last_retry_after: state.last_retry_after,
                    }),
                    ExhaustionPolicy::Error => Err(ClientError::RetriesExhausted {
                        attempts: state.attempts,
                    }),
                };
            }

            self.wait_before_retry(retry_after).await;
        }
    }

    /// Waits the server-requested delay plus the configured padding.
    async fn wait_before_retry(&self, retry_after: u64) {
        let delay = retry_delay(retry_after, self.options.retry_padding_ms);

        #[cfg(feature = "tracing")]
        tracing::debug!("rate limited, retrying after {} ms", delay.as_millis());

        self.sleeper.sleep(delay).await;
    }

    fn log_request(&self, request: &RequestDescriptor, attempt: usize) {
        #[cfg(feature = "tracing")]
        if self.options.log_requests {
            tracing::info!("{} {} (attempt {})", request.method, request.url, attempt);
        }

        #[cfg(not(feature = "tracing"))]
        let _ = (request, attempt);
    }
}

/// An endpoint bound to its client, invocable without repeating the name.
#[derive(Clone, Copy, Debug)]
pub struct EndpointHandle<'a> {
    client: &'a ApiClient,
    definition: &'a EndpointDefinition,
}

impl<'a> EndpointHandle<'a> {
    pub fn name(&self) -> &'a str {
        &self.definition.name
    }

    pub fn definition(&self) -> &'a EndpointDefinition {
        self.definition
    }

    pub async fn invoke(&self, args: InvokeArgs) -> Result<Outcome> {
        self.client.invoke(&self.definition.name, args).await
    }
}
