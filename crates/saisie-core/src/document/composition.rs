//! Decoding of the composed act text payload.
//!
//! The service answers `{ "errors": [...], "data": "<json>" }` where `data` is
//! itself a JSON document carrying the act body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::Result;
use crate::error::DocumentError;
use crate::models::record::RecordType;

/// Envelope returned by the composition service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedDocumentResponse {
    #[serde(default)]
    pub errors: Vec<Value>,
    /// JSON-encoded [`ComposedDocument`].
    #[serde(default)]
    pub data: String,
}

/// Act text as composed for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDocument {
    #[serde(default)]
    pub reference_acte: Option<String>,
    #[serde(default)]
    pub reference_registre_papier: Option<String>,
    #[serde(default)]
    pub nature_acte: Option<String>,
    #[serde(default)]
    pub titulaires: Option<String>,
    #[serde(default)]
    pub texte_corps_acte: String,
    #[serde(default)]
    pub mentions: Option<String>,
}

impl ComposedDocument {
    /// Body split into display lines. Both real line breaks and escaped `\n`
    /// sequences left in the text break lines.
    pub fn body_lines(&self) -> Vec<&str> {
        if self.texte_corps_acte.is_empty() {
            return Vec::new();
        }

        self.texte_corps_acte
            .split('\n')
            .flat_map(|line| line.split("\\n"))
            .collect()
    }

    /// Record type named by `nature_acte`, if recognized.
    pub fn record_type(&self) -> Option<RecordType> {
        self.nature_acte.as_deref()?.trim().parse().ok()
    }

    pub fn has_body(&self) -> bool {
        !self.texte_corps_acte.trim().is_empty()
    }
}

/// Parse the nested `data` string of a service response.
///
/// Empty or malformed data is logged and yields `None`.
pub fn parse_composed_document(response: &ComposedDocumentResponse) -> Option<ComposedDocument> {
    if !response.errors.is_empty() {
        debug!("Composition response carries {} error(s)", response.errors.len());
    }

    match decode_data(&response.data) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Unusable composed document: {}", e);
            None
        }
    }
}

/// Decode a raw payload: either the full response envelope or the bare data
/// string.
pub fn decode_payload(raw: &str) -> Result<ComposedDocument> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DocumentError::EmptyPayload);
    }

    let root: Value = serde_json::from_str(raw).map_err(|e| DocumentError::Malformed(e.to_string()))?;

    let inner = match root {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    };

    match inner {
        Value::Null => Err(DocumentError::EmptyPayload),
        Value::String(data) => decode_data(&data),
        value @ Value::Object(_) => document_from_value(value),
        other => Err(DocumentError::Malformed(format!("unexpected payload: {}", other))),
    }
}

fn decode_data(data: &str) -> Result<ComposedDocument> {
    if data.trim().is_empty() {
        return Err(DocumentError::EmptyPayload);
    }

    let value: Value = serde_json::from_str(data).map_err(|e| DocumentError::Malformed(e.to_string()))?;
    document_from_value(value)
}

fn document_from_value(value: Value) -> Result<ComposedDocument> {
    if !value.is_object() {
        return Err(DocumentError::Malformed(format!("expected an object, got {}", value)));
    }
    serde_json::from_value(value).map_err(|e| DocumentError::Malformed(e.to_string()))
}
