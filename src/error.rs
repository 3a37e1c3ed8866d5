/// Error type returned by this crate.
///
/// Conditions the client treats as recoverable (unknown endpoint names,
/// exhausted retry budgets under the default policy) are reported through
/// [`crate::Outcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration: duplicate endpoint, unknown method,
    /// malformed header or unreadable config file.
    #[error("configuration error: {0}")]
    Config(String),
    /// The server answered 429 without a usable `Retry-After` header.
    #[error("rate limited by {url} without usable Retry-After: {detail}")]
    RateLimitProtocol {
        /// Request URL that was throttled.
        url: String,
        /// What was wrong with the header.
        detail: String,
    },
    /// Non-success HTTP status code other than 429.
    #[error("http error {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Failure reported by a custom [`crate::Transport`] implementation.
    #[error("transport backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),
    /// Response decoding error under [`crate::DecodePolicy::Strict`].
    #[error("decode error: {0}")]
    Decode(String),
    /// Retry budget ran out under [`crate::ExhaustionPolicy::Error`].
    #[error("retry budget exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}
