//! Base URL resolution for the API's deployment tiers and clouds.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

pub const PRODUCTION_AWS_URL: &str = "https://aws-api.sigmacomputing.com";
pub const PRODUCTION_GCP_URL: &str = "https://api.sigmacomputing.com";
pub const STAGING_AWS_URL: &str = "https://staging-aws-api.sigmacomputing.io";
pub const STAGING_GCP_URL: &str = "https://api.staging.sigmacomputing.io";
pub const DEV_URL: &str = "http://127.0.0.1:8081";

/// Deployment tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Production,
    Staging,
    Dev,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Production => write!(f, "production"),
            Tier::Staging => write!(f, "staging"),
            Tier::Dev => write!(f, "dev"),
        }
    }
}

impl FromStr for Tier {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Tier::Production),
            "staging" => Ok(Tier::Staging),
            "dev" => Ok(Tier::Dev),
            _ => Err(ClientError::Configuration(format!(
                "Unknown environment: {}. Expected production, staging, or dev.",
                s
            ))),
        }
    }
}

/// Hosting cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cloud {
    Aws,
    Gcp,
    Azure,
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cloud::Aws => write!(f, "aws"),
            Cloud::Gcp => write!(f, "gcp"),
            Cloud::Azure => write!(f, "azure"),
        }
    }
}

impl FromStr for Cloud {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Cloud::Aws),
            "gcp" => Ok(Cloud::Gcp),
            "azure" => Ok(Cloud::Azure),
            _ => Err(ClientError::Configuration(format!(
                "Unknown cloud: {}. Expected aws, gcp, or azure.",
                s
            ))),
        }
    }
}

/// Resolved API base URL, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    /// Looks up the fixed base URL for a tier and cloud.
    pub fn resolve(tier: Tier, cloud: Cloud) -> Result<Self, ClientError> {
        let base_url = match (tier, cloud) {
            (Tier::Dev, _) => DEV_URL,
            (Tier::Production, Cloud::Aws) => PRODUCTION_AWS_URL,
            (Tier::Production, Cloud::Gcp) => PRODUCTION_GCP_URL,
            (Tier::Staging, Cloud::Aws) => STAGING_AWS_URL,
            (Tier::Staging, Cloud::Gcp) => STAGING_GCP_URL,
            (tier, cloud) => {
                return Err(ClientError::Configuration(format!(
                    "No API endpoint for environment '{}' on cloud '{}'",
                    tier, cloud
                )));
            }
        };
        Ok(Self::custom(base_url))
    }

    /// Parses tier and cloud names, then resolves them.
    pub fn from_names(tier: &str, cloud: &str) -> Result<Self, ClientError> {
        Self::resolve(tier.parse()?, cloud.parse()?)
    }

    /// Uses an explicit base URL instead of the lookup table.
    pub fn custom(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}
