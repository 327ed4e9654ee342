//! Typed wrappers over the REST resources used by the admin commands.
//!
//! Each helper turns a non-2xx response into an [`ApiError`] carrying the
//! server's `message`, so commands can report it per row.

pub mod files;
pub mod grants;
pub mod members;
pub mod teams;
pub mod workbooks;

use std::fmt;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http::ApiResponse;

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn from_response(response: &ApiResponse) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| response.text());

        Self {
            status: response.status(),
            message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}, API message: {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub entries: Vec<T>,
    #[serde(default)]
    pub next_page: Option<serde_json::Value>,
}

impl<T> Page<T> {
    /// The cursor for the next page, if any. Numeric and string cursors are both accepted.
    pub fn next_cursor(&self) -> Option<String> {
        match &self.next_page {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Returns the response if it is 2xx, otherwise an [`ApiError`].
pub fn ensure_success(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}

/// Checks the status, then decodes the JSON body.
pub(crate) fn decode<T: DeserializeOwned>(response: ApiResponse, what: &str) -> Result<T> {
    let response = ensure_success(response)?;
    response
        .json::<T>()
        .with_context(|| format!("Failed to parse {} response", what))
}

/// Returns the [`ApiError`] status if `error` wraps one.
pub fn api_status(error: &anyhow::Error) -> Option<StatusCode> {
    error.downcast_ref::<ApiError>().map(|e| e.status)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::Credentials;
    use crate::endpoint::Endpoint;
    use crate::http::SigmaClient;

    pub struct MockApi {
        pub server: mockito::ServerGuard,
        pub client: SigmaClient,
        _token: mockito::Mock,
    }

    /// Starts a mock server with a working token endpoint and a client bound to it.
    pub async fn mock_api() -> MockApi {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/v2/auth/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "test-token"}"#)
            .create_async()
            .await;

        let client = SigmaClient::with_endpoint(
            Endpoint::custom(server.url()),
            Credentials::new("id", "secret"),
        )
        .await
        .unwrap();

        MockApi {
            server,
            client,
            _token: token,
        }
    }
}
