//! Client-credentials token exchange.

use std::fmt;

use log::debug;
use reqwest::Method;
use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::{ApiRequest, RequestBody, Transport};

/// Token endpoint, relative to the base URL.
pub const TOKEN_PATH: &str = "v2/auth/token";

/// API client credentials. The secret is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn form(&self) -> Vec<(String, String)> {
        vec![
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token together with its ready-to-send header value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    header: HeaderValue,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Result<Self, ClientError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ClientError::Authentication(
                "token endpoint returned an empty access_token".to_string(),
            ));
        }
        let mut header = HeaderValue::from_str(&format!("Bearer {}", value)).map_err(|_| {
            ClientError::Authentication("access_token is not a valid header value".to_string())
        })?;
        header.set_sensitive(true);
        Ok(Self { value, header })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchanges credentials for a fresh token.
///
/// A transport failure is returned as [`ClientError::Transport`] so callers
/// can decide whether to retry; every other failure is an
/// [`ClientError::Authentication`].
#[tracing::instrument(skip(transport, credentials), fields(client_id = credentials.client_id()))]
pub async fn exchange(
    transport: &dyn Transport,
    endpoint: &Endpoint,
    credentials: &Credentials,
) -> Result<SessionToken, ClientError> {
    debug!("Requesting access token from {}...", endpoint);

    let mut request = ApiRequest::new(Method::POST, endpoint.url(TOKEN_PATH));
    request.body = Some(RequestBody::Form(credentials.form()));

    let response = transport.send(&request).await?;
    if !response.is_success() {
        return Err(ClientError::Authentication(format!(
            "token endpoint returned HTTP {}",
            response.status().as_u16()
        )));
    }

    let body: TokenResponse = response.json().map_err(|e| {
        ClientError::Authentication(format!("could not parse token response: {}", e))
    })?;

    match body.access_token {
        Some(token) => SessionToken::new(token),
        None => Err(ClientError::Authentication(
            "token response has no access_token".to_string(),
        )),
    }
}
