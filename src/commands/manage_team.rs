//! Add and remove team members.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::api::teams::{self, TeamMembership};
use crate::http::SigmaClient;

#[derive(Debug, Deserialize)]
struct MembershipRow {
    member_id: String,
    operation: String,
}

/// Builds the membership change from `--add`/`--remove` lists, or from a
/// CSV with `member_id,operation` columns when neither list is given.
pub fn build_membership(
    add: &[String],
    remove: &[String],
    file: Option<&Path>,
) -> Result<TeamMembership> {
    if !add.is_empty() || !remove.is_empty() {
        return Ok(TeamMembership {
            add: add.to_vec(),
            remove: remove.to_vec(),
        });
    }

    let mut membership = TeamMembership::default();
    let Some(path) = file else {
        return Ok(membership);
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;
    for row in reader.deserialize::<MembershipRow>() {
        let row = row.with_context(|| format!("Failed to parse CSV file {:?}", path))?;
        match row.operation.to_lowercase().as_str() {
            "add" => membership.add.push(row.member_id),
            "remove" => membership.remove.push(row.member_id),
            other => warn!(
                "Skipping member {}: unknown operation '{}'",
                row.member_id, other
            ),
        }
    }
    Ok(membership)
}

#[tracing::instrument(skip(client))]
pub async fn manage_team(client: &SigmaClient, team_id: &str, changes: &TeamMembership) -> Result<()> {
    teams::update_members(client, team_id, changes)
        .await
        .with_context(|| format!("Failed to update members of team {}", team_id))?;
    info!(
        "Team {}: added {}, removed {}",
        team_id,
        changes.add.len(),
        changes.remove.len()
    );
    println!(
        "Team {} updated: {} added, {} removed",
        team_id,
        changes.add.len(),
        changes.remove.len()
    );
    Ok(())
}
