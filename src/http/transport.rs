//! Request/response values and the seam between the client and the network.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

/// Status, headers and the fully read body of a response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends a single request with no retry or authentication logic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by a reqwest client.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse::new(status, body.to_vec()).with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_response_helpers() {
        let response = ApiResponse::new(StatusCode::OK, r#"{"name": "test"}"#);
        assert!(response.is_success());
        assert_eq!(response.text(), r#"{"name": "test"}"#);

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "test");

        let response = ApiResponse::new(StatusCode::NOT_FOUND, "");
        assert!(!response.is_success());
        assert!(response.json::<serde_json::Value>().is_err());
    }

    #[tokio::test]
    async fn test_send_json_with_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/v2/teams/t1/members")
            .match_query(Matcher::UrlEncoded("dry".into(), "1".into()))
            .match_header("x-test", "yes")
            .match_body(Matcher::Json(serde_json::json!({"add": ["m1"]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let mut request = ApiRequest::new(
            Method::PATCH,
            format!("{}/v2/teams/t1/members", server.url()),
        );
        request.headers.insert("x-test", "yes".parse().unwrap());
        request.query.push(("dry".into(), "1".into()));
        request.body = Some(RequestBody::Json(serde_json::json!({"add": ["m1"]})));

        let response = ReqwestTransport::default().send(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_send_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/auth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "id".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let mut request = ApiRequest::new(Method::POST, format!("{}/v2/auth/token", server.url()));
        request.body = Some(RequestBody::Form(vec![
            ("grant_type".into(), "client_credentials".into()),
            ("client_id".into(), "id".into()),
        ]));

        ReqwestTransport::default().send(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let request = ApiRequest::new(Method::GET, format!("{}/missing", server.url()));
        let response = ReqwestTransport::default().send(&request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "nope");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let request = ApiRequest::new(Method::GET, "http://127.0.0.1:1/");
        let result = ReqwestTransport::default().send(&request).await;
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
