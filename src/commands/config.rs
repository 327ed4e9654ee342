use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;

use crate::{
    auth::Credentials,
    endpoint::Endpoint,
    http::{ReqwestTransport, RetryPolicy, SigmaClient},
};

const USER_AGENT: &str = concat!("sigma-admin/", env!("CARGO_PKG_VERSION"));

/// Connection settings shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Environment to use: production, staging, or dev
    #[arg(
        long = "env",
        env = "SIGMA_ENV",
        value_name = "ENV",
        required_unless_present = "base_url"
    )]
    pub env: Option<String>,

    /// Cloud to use: aws, gcp, or azure
    #[arg(
        long = "cloud",
        env = "SIGMA_CLOUD",
        value_name = "CLOUD",
        required_unless_present = "base_url"
    )]
    pub cloud: Option<String>,

    /// API client ID
    #[arg(long = "client-id", alias = "client_id", env = "SIGMA_CLIENT_ID")]
    pub client_id: String,

    /// API client secret
    #[arg(
        long = "client-secret",
        alias = "client_secret",
        env = "SIGMA_CLIENT_SECRET",
        hide_env_values = true
    )]
    pub client_secret: String,

    /// API base URL (overrides --env and --cloud)
    #[arg(long = "base-url", env = "SIGMA_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,
}

impl ConnectionArgs {
    pub fn endpoint(&self) -> Result<Endpoint> {
        if let Some(url) = &self.base_url {
            return Ok(Endpoint::custom(url.as_str()));
        }
        let env = self.env.as_deref().unwrap_or_default();
        let cloud = self.cloud.as_deref().unwrap_or_default();
        Ok(Endpoint::from_names(env, cloud)?)
    }

    /// Resolves the endpoint and authenticates.
    #[tracing::instrument(skip(self))]
    pub async fn connect(&self) -> Result<SigmaClient> {
        let endpoint = self.endpoint()?;
        debug!(
            "Connecting to {} as client {}",
            endpoint, self.client_id
        );

        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let credentials = Credentials::new(&self.client_id, &self.client_secret);
        let client = SigmaClient::with_transport(
            endpoint.clone(),
            credentials,
            ReqwestTransport::new(http),
            RetryPolicy::default(),
        )
        .await
        .with_context(|| format!("Failed to connect to {}", endpoint))?;

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use mockito::Matcher;

    fn args(env: Option<&str>, cloud: Option<&str>, base_url: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            env: env.map(String::from),
            cloud: cloud.map(String::from),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            base_url: base_url.map(String::from),
        }
    }

    #[test]
    fn test_endpoint_from_env_and_cloud() {
        let endpoint = args(Some("staging"), Some("gcp"), None).endpoint().unwrap();
        assert_eq!(endpoint.base_url(), "https://api.staging.sigmacomputing.io");
    }

    #[test]
    fn test_base_url_overrides_lookup() {
        let endpoint = args(Some("production"), Some("azure"), Some("http://localhost:9/"))
            .endpoint()
            .unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:9");
    }

    #[test]
    fn test_unknown_pair_is_configuration_error() {
        let err = args(Some("production"), Some("azure"), None).endpoint().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Configuration(_))
        ));

        let err = args(None, None, None).endpoint().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_sends_user_agent_and_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/auth/token")
            .match_header("user-agent", Matcher::Regex("^sigma-admin/".into()))
            .match_body(Matcher::UrlEncoded("client_secret".into(), "secret".into()))
            .with_status(200)
            .with_body(r#"{"access_token": "t"}"#)
            .create_async()
            .await;

        let client = args(None, None, Some(server.url().as_str())).connect().await.unwrap();

        mock.assert_async().await;
        assert_eq!(client.endpoint().base_url(), server.url());
    }

    #[tokio::test]
    async fn test_connect_reports_authentication_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v2/auth/token")
            .with_status(401)
            .create_async()
            .await;

        let err = args(None, None, Some(server.url().as_str())).connect().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Authentication(_))
        ));
    }
}
