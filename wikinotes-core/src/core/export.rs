//! Document export and import as JSON.
//!
//! Unlike the text codec, the JSON form keeps collapsed subtrees, ids,
//! notes and timestamps exactly as they are in memory.

use serde::{Deserialize, Serialize};

use crate::{validate_forest, Node, Result, WikiError};

/// Version of the crate that wrote an export.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current export format version.
pub const EXPORT_VERSION: u32 = 1;

/// Top-level JSON structure of an exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub app_version: String,
    pub document_id: String,
    pub nodes: Vec<Node>,
}

/// Serializes `forest` as pretty-printed export JSON.
pub fn export_document(document_id: &str, forest: &[Node]) -> Result<String> {
    let export = ExportDocument {
        version: EXPORT_VERSION,
        app_version: APP_VERSION.to_string(),
        document_id: document_id.to_string(),
        nodes: forest.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Reads export JSON back.
///
/// # Errors
///
/// Returns [`WikiError::Json`] for malformed JSON and
/// [`WikiError::InvalidDocument`] for an unsupported version or a forest
/// with duplicate ids or broken parent links.
pub fn import_document(json: &str) -> Result<ExportDocument> {
    let export: ExportDocument = serde_json::from_str(json)?;
    if export.version != EXPORT_VERSION {
        return Err(WikiError::InvalidDocument(format!(
            "unsupported export version {} (written by {})",
            export.version, export.app_version
        )));
    }
    validate_forest(&export.nodes)?;
    log::debug!(
        "imported document {} with {} root nodes",
        export.document_id,
        export.nodes.len()
    );
    Ok(export)
}
