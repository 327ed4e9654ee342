//! Organization members.

use anyhow::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{Page, decode};
use crate::http::{RequestOptions, SigmaClient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub member_type: Option<String>,
    #[serde(default)]
    pub is_archived: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub member_type: String,
    pub is_guest: bool,
}

/// Attributes to change on an existing member. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "email", skip_serializing_if = "Option::is_none")]
    pub new_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl MemberUpdate {
    pub fn is_empty(&self) -> bool {
        self == &MemberUpdate::default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MemberListing {
    List(Vec<Member>),
    Page(Page<Member>),
}

/// Lists every member, including archived ones, following pagination.
#[tracing::instrument(skip(client))]
pub async fn list_all(client: &SigmaClient) -> Result<Vec<Member>> {
    let mut members = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut options = RequestOptions::new().query("includeArchived", "true");
        if let Some(page) = &cursor {
            options = options.query("page", page.as_str());
        }

        let response = client.get("v2/members", options).await?;
        match decode::<MemberListing>(response, "member list")? {
            MemberListing::List(list) => {
                members.extend(list);
                break;
            }
            MemberListing::Page(page) => {
                cursor = page.next_cursor();
                members.extend(page.entries);
                if cursor.is_none() {
                    break;
                }
            }
        }
    }

    debug!("Found {} members", members.len());
    Ok(members)
}

/// Looks up the single member with `email`.
#[tracing::instrument(skip(client))]
pub async fn find_by_email(client: &SigmaClient, email: &str) -> Result<Member> {
    let response = client
        .get("v2/members", RequestOptions::new().query("search", email))
        .await?;
    let page: Page<Member> = decode(response, "member search")?;

    let mut entries = page.entries;
    match entries.len() {
        0 => bail!("No users found with this email: {}", email),
        1 => Ok(entries.remove(0)),
        _ => bail!("More than one user found with the provided email: {}", email),
    }
}

#[tracing::instrument(skip(client, member), fields(email = %member.email))]
pub async fn create(client: &SigmaClient, member: &NewMember) -> Result<Member> {
    let response = client
        .post(
            "v2/members",
            RequestOptions::new().json(serde_json::to_value(member)?),
        )
        .await?;
    decode(response, "create member")
}

#[tracing::instrument(skip(client, changes))]
pub async fn update(client: &SigmaClient, member_id: &str, changes: &MemberUpdate) -> Result<Member> {
    let response = client
        .patch(
            &format!("v2/members/{}", member_id),
            RequestOptions::new().json(serde_json::to_value(changes)?),
        )
        .await?;
    decode(response, "update member")
}
