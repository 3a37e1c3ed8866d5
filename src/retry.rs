use std::time::Duration;

use crate::{ClientError, TransportResponse};

/// Retry bookkeeping for one in-flight call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RetryState {
    /// Resends still allowed.
    pub remaining: usize,
    /// Requests sent so far.
    pub attempts: usize,
    /// Most recent `Retry-After` value, in seconds.
    pub last_retry_after: Option<u64>,
}

impl RetryState {
    pub fn new(max_retries: usize) -> Self {
        Self {
            remaining: max_retries,
            attempts: 0,
            last_retry_after: None,
        }
    }

    /// Records a throttled response and returns whether a resend is allowed.
    pub fn throttled(&mut self, retry_after: u64) -> bool {
        self.last_retry_after = Some(retry_after);
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Reads `Retry-After` as delta seconds.
///
/// The HTTP-date form is not accepted; it is reported like a missing header.
pub(crate) fn retry_after_seconds(
    response: &TransportResponse,
    url: &str,
) -> Result<u64, ClientError> {
    let raw = response
        .header("retry-after")
        .ok_or_else(|| ClientError::RateLimitProtocol {
            url: url.to_owned(),
            detail: "missing Retry-After header".to_owned(),
        })?;

    raw.trim()
        .parse::<u64>()
        .map_err(|_| ClientError::RateLimitProtocol {
            url: url.to_owned(),
            detail: format!("Retry-After '{raw}' is not a number of seconds"),
        })
}

/// Server delay plus padding, saturating instead of overflowing.
pub(crate) fn retry_delay(retry_after: u64, padding_ms: u64) -> Duration {
    Duration::from_secs(retry_after).saturating_add(Duration::from_millis(padding_ms))
}
