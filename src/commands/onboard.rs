//! Create a member and grant initial access.

use anyhow::{Context, Result};
use log::info;

use crate::api::members::{self, Member, NewMember};
use crate::api::grants;
use crate::http::SigmaClient;

/// A resource to grant the new member access to, with the permission name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantTarget {
    pub id: String,
    pub permission: String,
}

#[derive(Debug, Clone)]
pub struct Onboarding {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub member_type: String,
    pub connection: Option<GrantTarget>,
    pub workspace: Option<GrantTarget>,
}

/// Creates the member, then applies the requested grants.
#[tracing::instrument(skip(client, onboarding), fields(email = %onboarding.email))]
pub async fn onboard_member(client: &SigmaClient, onboarding: &Onboarding) -> Result<Member> {
    let member = members::create(
        client,
        &NewMember {
            email: onboarding.email.clone(),
            first_name: onboarding.first_name.clone(),
            last_name: onboarding.last_name.clone(),
            member_type: onboarding.member_type.clone(),
            is_guest: false,
        },
    )
    .await
    .with_context(|| format!("Failed to create member {}", onboarding.email))?;
    println!("Created member {} ({})", member.email, member.member_id);

    if let Some(connection) = &onboarding.connection {
        grants::grant_connection(client, &connection.id, &connection.permission, &member.member_id)
            .await
            .with_context(|| format!("Failed to grant access to connection {}", connection.id))?;
        info!("Granted '{}' on connection {}", connection.permission, connection.id);
    }

    if let Some(workspace) = &onboarding.workspace {
        grants::grant_workspace(client, &workspace.id, &workspace.permission, &member.member_id)
            .await
            .with_context(|| format!("Failed to grant access to workspace {}", workspace.id))?;
        info!("Granted '{}' on workspace {}", workspace.permission, workspace.id);
    }

    Ok(member)
}
