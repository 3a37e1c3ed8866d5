use serde_json::Value;

use crate::{ClientError, DecodePolicy, TransportResponse};

/// Decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// `application/json` body. `Null` also stands in for malformed JSON
    /// under [`DecodePolicy::Lenient`].
    Json(Value),
    /// Any other content type, or none.
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

pub(crate) fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .to_ascii_lowercase()
        .contains("application/json")
}

pub(crate) fn decode_response(
    response: TransportResponse,
    policy: DecodePolicy,
) -> Result<Payload, ClientError> {
    let is_json = response.content_type().is_some_and(is_json_content_type);
    if !is_json {
        return Ok(Payload::Text(response.body));
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => Ok(Payload::Json(value)),
        Err(err) => match policy {
            DecodePolicy::Lenient => {
                #[cfg(feature = "tracing")]
                tracing::debug!("discarding malformed JSON response: {}", err);
                #[cfg(not(feature = "tracing"))]
                let _ = err;
                Ok(Payload::Json(Value::Null))
            }
            DecodePolicy::Strict => Err(ClientError::Decode(format!(
                "invalid JSON response: {err}; body: {}",
                response.body
            ))),
        },
    }
}
