//! Connection and workspace permission grants.

use anyhow::Result;
use serde::Serialize;

use super::ensure_success;
use crate::http::{RequestOptions, SigmaClient};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Grantee<'a> {
    member_id: &'a str,
}

#[derive(Debug, Serialize)]
struct Grant<'a> {
    grantee: Grantee<'a>,
    permission: &'a str,
}

#[derive(Debug, Serialize)]
struct GrantRequest<'a> {
    grants: Vec<Grant<'a>>,
}

async fn grant(client: &SigmaClient, path: &str, permission: &str, member_id: &str) -> Result<()> {
    let body = GrantRequest {
        grants: vec![Grant {
            grantee: Grantee { member_id },
            permission,
        }],
    };
    let response = client
        .post(path, RequestOptions::new().json(serde_json::to_value(&body)?))
        .await?;
    ensure_success(response)?;
    Ok(())
}

#[tracing::instrument(skip(client))]
pub async fn grant_connection(
    client: &SigmaClient,
    connection_id: &str,
    permission: &str,
    member_id: &str,
) -> Result<()> {
    grant(
        client,
        &format!("v2/connections/{}/grants", connection_id),
        permission,
        member_id,
    )
    .await
}

#[tracing::instrument(skip(client))]
pub async fn grant_workspace(
    client: &SigmaClient,
    workspace_id: &str,
    permission: &str,
    member_id: &str,
) -> Result<()> {
    grant(
        client,
        &format!("v2/workspaces/{}/grants", workspace_id),
        permission,
        member_id,
    )
    .await
}
