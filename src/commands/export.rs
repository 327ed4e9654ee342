//! Export workbook elements to JSON files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;

use crate::api::workbooks;
use crate::http::SigmaClient;

/// Exports one element, or every element in the workbook schema, and writes
/// each to `<prefix>[_<element>].json` under `output_dir`.
///
/// The prefix defaults to the workbook ID. Returns the files written.
#[tracing::instrument(skip(client))]
pub async fn export_workbook(
    client: &SigmaClient,
    workbook_id: &str,
    element_id: Option<&str>,
    filename: Option<&str>,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let prefix = filename.unwrap_or(workbook_id);

    if let Some(element_id) = element_id {
        let data = workbooks::export(client, workbook_id, Some(element_id)).await?;
        let path = write_json(output_dir, prefix, None, &data)?;
        return Ok(vec![path]);
    }

    let schema = workbooks::schema(client, workbook_id).await?;
    let element_ids: Vec<_> = schema.element_ids().collect();
    debug!("Workbook {} has elements {:?}", workbook_id, element_ids);

    let mut written = Vec::with_capacity(element_ids.len());
    for element_id in element_ids {
        let data = workbooks::export(client, workbook_id, Some(element_id))
            .await
            .with_context(|| format!("Failed to export element {}", element_id))?;
        written.push(write_json(output_dir, prefix, Some(element_id), &data)?);
    }
    Ok(written)
}

fn write_json(dir: &Path, prefix: &str, element_id: Option<&str>, data: &Value) -> Result<PathBuf> {
    let name = match element_id {
        Some(element_id) => format!("{}_{}.json", prefix, element_id),
        None => format!("{}.json", prefix),
    };
    let path = dir.join(name);

    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Failed to write {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!("Wrote {:?}", path);
    println!("{}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_api;
    use mockito::Matcher;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_export_single_element() {
        let mut api = mock_api().await;
        let _m = api
            .server
            .mock("POST", "/v2/workbooks/wb1/export")
            .with_status(200)
            .with_body(r#"{"name": "Café"}"#)
            .create_async()
            .await;
        let dir = tempdir().unwrap();

        let written = export_workbook(&api.client, "wb1", Some("e1"), Some("report"), dir.path())
            .await
            .unwrap();

        assert_eq!(written, vec![dir.path().join("report.json")]);
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("Café"));
    }

    #[tokio::test]
    async fn test_export_all_elements() {
        let mut api = mock_api().await;
        let _schema = api
            .server
            .mock("GET", "/v2/workbooks/wb1/schema")
            .with_status(200)
            .with_body(r#"{"elements": {"e1": {}, "e2": {}}}"#)
            .create_async()
            .await;
        let mut exports = Vec::new();
        for element in ["e1", "e2"] {
            let mock = api
                .server
                .mock("POST", "/v2/workbooks/wb1/export")
                .match_body(Matcher::PartialJson(serde_json::json!({"elementId": element})))
                .with_status(200)
                .with_body(format!(r#"{{"element": "{}"}}"#, element))
                .expect(1)
                .create_async()
                .await;
            exports.push(mock);
        }
        let dir = tempdir().unwrap();

        let written = export_workbook(&api.client, "wb1", None, None, dir.path())
            .await
            .unwrap();

        for mock in &exports {
            mock.assert_async().await;
        }
        assert_eq!(
            written,
            vec![dir.path().join("wb1_e1.json"), dir.path().join("wb1_e2.json")]
        );
        let value: Value =
            serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(value["element"], "e2");
    }
}
