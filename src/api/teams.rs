//! Team membership.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::ensure_success;
use crate::http::{RequestOptions, SigmaClient};

/// Members to add to and remove from a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamMembership {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl TeamMembership {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Applies `changes` to the team. The response body is returned as-is;
/// it may be empty.
#[tracing::instrument(skip(client))]
pub async fn update_members(
    client: &SigmaClient,
    team_id: &str,
    changes: &TeamMembership,
) -> Result<Value> {
    let response = client
        .patch(
            &format!("v2/teams/{}/members", team_id),
            RequestOptions::new().json(serde_json::to_value(changes)?),
        )
        .await?;
    let response = ensure_success(response)?;
    if response.bytes().iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    response
        .json()
        .context("Failed to parse team membership response")
}
