//! Bulk update of member attributes keyed by email address.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::api::{api_status, members};
use crate::api::members::MemberUpdate;
use crate::http::SigmaClient;

/// One CSV row. Only `Email` is required; blank cells mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemberRow {
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "First Name", default)]
    pub first_name: Option<String>,
    #[serde(rename = "Last Name", default)]
    pub last_name: Option<String>,
    #[serde(rename = "New Email", default)]
    pub new_email: Option<String>,
    #[serde(rename = "Member Type", default)]
    pub member_type: Option<String>,
    #[serde(rename = "isArchived", default)]
    pub is_archived: Option<String>,
}

impl MemberRow {
    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn changes(&self) -> MemberUpdate {
        MemberUpdate {
            first_name: non_blank(&self.first_name).map(String::from),
            last_name: non_blank(&self.last_name).map(String::from),
            new_email: non_blank(&self.new_email).map(String::from),
            member_type: non_blank(&self.member_type).map(String::from),
            is_archived: match non_blank(&self.is_archived) {
                Some(v) if v.eq_ignore_ascii_case("true") => Some(true),
                Some(v) if v.eq_ignore_ascii_case("false") => Some(false),
                _ => None,
            },
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Reads member rows, failing if the `Email` column is absent.
pub fn read_rows(path: &Path) -> Result<Vec<MemberRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;

    let headers = reader.headers().context("Failed to read CSV header")?;
    if !headers.iter().any(|h| h.trim() == "Email") {
        bail!("A column titled \"Email\" is required in {:?}", path);
    }

    reader
        .deserialize()
        .collect::<Result<Vec<MemberRow>, _>>()
        .with_context(|| format!("Failed to parse CSV file {:?}", path))
}

/// Applies each row's changes to the member with that email.
///
/// Failures are reported and skipped unless `abort_on_failure` is set.
#[tracing::instrument(skip(client))]
pub async fn batch_update_users(
    client: &SigmaClient,
    csv_path: &Path,
    abort_on_failure: bool,
) -> Result<BatchReport> {
    let rows = read_rows(csv_path)?;
    let member_ids: HashMap<String, String> = members::list_all(client)
        .await
        .context("Failed to list organization members")?
        .into_iter()
        .map(|m| (m.email, m.member_id))
        .collect();
    debug!("Loaded {} rows, {} members", rows.len(), member_ids.len());

    let mut report = BatchReport::default();
    for row in &rows {
        let Some(email) = row.email() else {
            println!("\u{2717} UPDATE FAILURE! Row has no email address");
            report.failed += 1;
            if abort_on_failure {
                bail!("Aborted: row without email address");
            }
            continue;
        };

        let Some(member_id) = member_ids.get(email) else {
            println!(
                "\u{2717} UPDATE FAILURE! {}: email is invalid, not found, or belongs to a deactivated account",
                email
            );
            report.failed += 1;
            if abort_on_failure {
                bail!("Aborted: member {} not found", email);
            }
            continue;
        };

        let changes = row.changes();
        if changes.is_empty() {
            println!("\u{2013} UPDATED NOTHING! {}: no attribute values in CSV", email);
            report.unchanged += 1;
            continue;
        }

        match members::update(client, member_id, &changes).await {
            Ok(_) => {
                info!("Updated member {} ({})", email, member_id);
                println!("\u{2713} UPDATE SUCCESS! {}", email);
                report.updated += 1;
            }
            Err(e) => {
                println!("\u{2717} UPDATE FAILURE! {}: {}{}", email, e, failure_hint(&e));
                report.failed += 1;
                if abort_on_failure {
                    return Err(e.context(format!("Aborted: update of {} failed", email)));
                }
            }
        }
    }

    Ok(report)
}

fn failure_hint(error: &anyhow::Error) -> &'static str {
    match api_status(error) {
        Some(StatusCode::NOT_FOUND) => " (the member type may be invalid)",
        Some(StatusCode::CONFLICT) => " (the new email may already be in use)",
        _ => "",
    }
}
