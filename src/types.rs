use crate::Payload;

/// Non-error result of an endpoint invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The server answered with a success status.
    Response(Payload),
    /// Every attempt was answered with 429 and the retry budget ran out.
    RetriesExhausted {
        attempts: usize,
        last_retry_after: Option<u64>,
    },
    /// No endpoint with this name is registered. No request was sent.
    UnknownEndpoint { name: String },
    /// No API with this key is registered in a [`crate::MultiApiClient`].
    UnknownApi { name: String },
}

impl Outcome {
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Response(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<Payload> {
        match self {
            Self::Response(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}
