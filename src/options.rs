/// What the client does when a JSON response body fails to parse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DecodePolicy {
    /// Resolve to a JSON `null` payload.
    #[default]
    Lenient,
    /// Return [`crate::ClientError::Decode`].
    Strict,
}

/// What the client does when every retry was answered with 429.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExhaustionPolicy {
    /// Resolve to [`crate::Outcome::RetriesExhausted`].
    #[default]
    ReturnMarker,
    /// Return [`crate::ClientError::RetriesExhausted`].
    Error,
}

/// Configures HTTP timeout, retry and logging behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds, unless overridden per call.
    pub timeout_ms: u64,
    /// Maximum number of resends after a 429 response.
    pub max_retries: usize,
    /// Extra wait added on top of the server's `Retry-After` value.
    pub retry_padding_ms: u64,
    /// Emit one `info` event per request (requires the `tracing` feature).
    pub log_requests: bool,
    pub decode_policy: DecodePolicy,
    pub exhaustion_policy: ExhaustionPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 5,
            retry_padding_ms: 1_000,
            log_requests: false,
            decode_policy: DecodePolicy::default(),
            exhaustion_policy: ExhaustionPolicy::default(),
        }
    }
}
