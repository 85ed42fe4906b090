//! Composed act text: the payload the selection source is rendered from.

mod composition;

pub use composition::{decode_payload, parse_composed_document, ComposedDocument, ComposedDocumentResponse};

use crate::error::DocumentError;

/// Result type for payload decoding.
pub type Result<T> = std::result::Result<T, DocumentError>;
