//! Error kinds surfaced by the authenticated client.

use std::fmt;

/// Transport-level failure: the request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established (refused, DNS, TLS, connect timeout).
    Connect(String),
    /// Any other failure while sending the request or reading the response body.
    Request(String),
}

impl TransportError {
    /// Only connection failures are worth retrying; everything else is returned as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connect(_))
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Request(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

/// Errors returned by [`crate::http::SigmaClient`].
///
/// Non-2xx HTTP responses are not errors; they come back as ordinary
/// responses for the caller to inspect.
#[derive(Debug)]
pub enum ClientError {
    /// Unknown deployment tier / cloud combination.
    Configuration(String),
    /// The client-credentials exchange did not yield a usable token.
    Authentication(String),
    /// Connection-level failure, after the retry budget where applicable.
    Transport(TransportError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ClientError::Authentication(msg) => {
                write!(
                    f,
                    "Authentication failed: {}. Check your client ID and secret.",
                    msg
                )
            }
            ClientError::Transport(err) => write!(f, "Transport error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        ClientError::Transport(error)
    }
}
