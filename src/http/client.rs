//! Authenticated API client with token refresh and connection retry.

use std::fmt;

use log::{debug, info};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use tokio::sync::Mutex;

use super::retry::RetryPolicy;
use super::transport::{ApiRequest, ApiResponse, ReqwestTransport, RequestBody, Transport};
use crate::auth::{self, Credentials, SessionToken};
use crate::endpoint::Endpoint;
use crate::error::ClientError;

/// Optional query, JSON body and extra headers for a request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the admin REST API.
///
/// Holds one session token at a time. A 401 response replaces the token and
/// the request is reissued once; connection failures are retried according
/// to the [`RetryPolicy`]. Any other status is handed back to the caller.
pub struct SigmaClient {
    endpoint: Endpoint,
    credentials: Credentials,
    transport: Box<dyn Transport>,
    token: Mutex<SessionToken>,
    policy: RetryPolicy,
}

impl fmt::Debug for SigmaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigmaClient")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SigmaClient {
    /// Resolves the endpoint for `tier`/`cloud` and authenticates.
    pub async fn connect(tier: &str, cloud: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let endpoint = Endpoint::from_names(tier, cloud)?;
        Self::with_endpoint(endpoint, credentials).await
    }

    pub async fn with_endpoint(endpoint: Endpoint, credentials: Credentials) -> Result<Self, ClientError> {
        Self::with_transport(
            endpoint,
            credentials,
            ReqwestTransport::default(),
            RetryPolicy::default(),
        )
        .await
    }

    /// Builds a client over any transport, acquiring the first token eagerly.
    #[tracing::instrument(skip(credentials, transport))]
    pub async fn with_transport<T: Transport + 'static>(
        endpoint: Endpoint,
        credentials: Credentials,
        transport: T,
        policy: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let token = auth::exchange(&transport, &endpoint, &credentials).await?;
        debug!("Authenticated against {}", endpoint);
        Ok(Self {
            endpoint,
            credentials,
            transport: Box::new(transport),
            token: Mutex::new(token),
            policy,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        self.execute(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        self.execute(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        self.execute(Method::PUT, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        self.execute(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ClientError> {
        self.execute(Method::DELETE, path, options).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint.url(path);
        let operation_name = format!("{} {}", method, path);
        debug!("{}...", operation_name);

        self.policy
            .run(&operation_name, || self.execute_once(&method, &url, &options))
            .await
    }

    /// One attempt: send with the current token, and on 401 refresh and
    /// resend exactly once.
    async fn execute_once(
        &self,
        method: &Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ClientError> {
        let token = self.token.lock().await.clone();
        let response = self
            .transport
            .send(&build_request(method, url, options, &token))
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        info!("{} {} returned 401, refreshing access token", method, url);
        let token = self.refresh_token(&token).await?;
        Ok(self
            .transport
            .send(&build_request(method, url, options, &token))
            .await?)
    }

    /// Replaces `rejected` with a fresh token. If another request already
    /// replaced it, that token is reused instead of exchanging again.
    async fn refresh_token(&self, rejected: &SessionToken) -> Result<SessionToken, ClientError> {
        let mut current = self.token.lock().await;
        if *current != *rejected {
            debug!("Access token was already refreshed");
            return Ok(current.clone());
        }

        let fresh = auth::exchange(self.transport.as_ref(), &self.endpoint, &self.credentials).await?;
        *current = fresh.clone();
        Ok(fresh)
    }
}

/// Caller headers first, then the bearer token so it wins on conflict.
fn build_request(
    method: &Method,
    url: &str,
    options: &RequestOptions,
    token: &SessionToken,
) -> ApiRequest {
    let mut request = ApiRequest::new(method.clone(), url);
    request.headers = options.headers.clone();
    request
        .headers
        .insert(AUTHORIZATION, token.header_value().clone());
    request.query = options.query.clone();
    request.body = options.json.clone().map(RequestBody::Json);
    request
}
