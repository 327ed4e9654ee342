//! Workbook schema and export.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::decode;
use crate::http::{RequestOptions, SigmaClient};

#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookSchema {
    #[serde(default)]
    pub elements: Map<String, Value>,
}

impl WorkbookSchema {
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }
}

#[tracing::instrument(skip(client))]
pub async fn schema(client: &SigmaClient, workbook_id: &str) -> Result<WorkbookSchema> {
    let response = client
        .get(
            &format!("v2/workbooks/{}/schema", workbook_id),
            RequestOptions::new(),
        )
        .await?;
    decode(response, "workbook schema")
}

/// Exports a workbook, or one of its elements, as JSON.
#[tracing::instrument(skip(client))]
pub async fn export(client: &SigmaClient, workbook_id: &str, element_id: Option<&str>) -> Result<Value> {
    let mut body = json!({ "format": { "type": "json" } });
    if let Some(element_id) = element_id {
        body["elementId"] = Value::String(element_id.to_string());
    }

    let response = client
        .post(
            &format!("v2/workbooks/{}/export", workbook_id),
            RequestOptions::new().json(body),
        )
        .await?;
    decode(response, "workbook export")
}
