//! Transfer every document owned by one member to another.

use anyhow::{Context, Result, bail};
use log::{debug, info};

use crate::api::{files, members};
use crate::http::SigmaClient;

/// Transfers the current owner's workbooks and datasets to `new_owner`,
/// optionally moving them into `folder_id`. Returns the number of files moved.
///
/// Stops at the first failed transfer.
#[tracing::instrument(skip(client))]
pub async fn reassign_docs(
    client: &SigmaClient,
    current_owner: &str,
    new_owner: &str,
    folder_id: Option<&str>,
) -> Result<usize> {
    let current = members::find_by_email(client, current_owner).await?;
    let target = members::find_by_email(client, new_owner).await?;

    if let Some(folder_id) = folder_id {
        let folder = files::get(client, folder_id)
            .await
            .with_context(|| format!("Failed to look up folder {}", folder_id))?;
        if !folder.is_folder() {
            bail!("Provided folder_id {} is not a folder", folder_id);
        }
    }

    let owned: Vec<_> = files::list_member_files(client, &current.member_id)
        .await?
        .into_iter()
        .filter(|f| f.owner_id.as_deref() == Some(current.member_id.as_str()))
        .collect();
    debug!("{} owns {} documents", current_owner, owned.len());

    for file in &owned {
        files::transfer(client, &file.id, &target.member_id, folder_id)
            .await
            .with_context(|| format!("Failed to transfer document {}", file.id))?;
        println!("transferred document: {} --- {}", file.id, new_owner);
    }

    info!(
        "Transferred {} documents from {} to {}",
        owned.len(),
        current_owner,
        new_owner
    );
    Ok(owned.len())
}
