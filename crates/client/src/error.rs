use thiserror::Error;

/// Failure talking to the bill service.
///
/// A bill the server reports as failed (`error: true`) is not a `ClientError`;
/// it decodes into a normal `Bill`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No HTTP response: connection refused, timeout, broken body stream.
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body does not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Short text suitable for an end-user notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Server unreachable".to_string(),
            ClientError::Status { status, .. } => format!("Server error ({status})"),
            ClientError::Decode(_) => "Unexpected response from server".to_string(),
        }
    }
}
