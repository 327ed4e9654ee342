//! Documents (workbooks, datasets, folders) and their ownership.

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{Page, decode};
use crate::http::{RequestOptions, SigmaClient};

/// Page size used when listing a member's files.
pub const FILES_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl File {
    pub fn is_folder(&self) -> bool {
        self.kind.as_deref() == Some("folder")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileUpdate<'a> {
    owner_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
}

/// Lists the workbooks and datasets visible to a member, following pagination.
#[tracing::instrument(skip(client))]
pub async fn list_member_files(client: &SigmaClient, member_id: &str) -> Result<Vec<File>> {
    let path = format!("v2/members/{}/files", member_id);
    let mut files = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut options = RequestOptions::new()
            .query("typeFilters", "workbook")
            .query("typeFilters", "dataset")
            .query("limit", FILES_PAGE_LIMIT.to_string());
        if let Some(page) = &cursor {
            options = options.query("page", page.as_str());
        }

        let page: Page<File> = decode(client.get(&path, options).await?, "member files")?;
        debug!("Fetched {} files for member {}", page.entries.len(), member_id);

        cursor = page.next_cursor();
        files.extend(page.entries);
        if cursor.is_none() {
            break;
        }
    }

    Ok(files)
}

#[tracing::instrument(skip(client))]
pub async fn get(client: &SigmaClient, file_id: &str) -> Result<File> {
    let response = client
        .get(&format!("v2/files/{}", file_id), RequestOptions::new())
        .await?;
    decode(response, "file")
}

/// Moves ownership of a file, optionally placing it under `parent_id`.
#[tracing::instrument(skip(client))]
pub async fn transfer(
    client: &SigmaClient,
    file_id: &str,
    new_owner_id: &str,
    parent_id: Option<&str>,
) -> Result<File> {
    let body = FileUpdate {
        owner_id: new_owner_id,
        parent_id,
    };
    let response = client
        .patch(
            &format!("v2/files/{}", file_id),
            RequestOptions::new().json(serde_json::to_value(&body)?),
        )
        .await?;
    decode(response, "file update")
}
