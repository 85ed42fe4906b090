//! Core library for assisted filling of French civil-status correction forms.
//!
//! This crate provides:
//! - Field classification from form field paths
//! - Conversion of French selections (numbers in words, month names, gender)
//! - Per-record field catalogs and conditional auto-advance navigation
//! - Extraction sessions mirroring focus and values into a host UI
//! - Decoding of the composed act text payload

pub mod document;
pub mod error;
pub mod fill;
pub mod models;

pub use document::{decode_payload, parse_composed_document, ComposedDocument, ComposedDocumentResponse};
pub use error::{DocumentError, Result, SaisieError, SessionError};
pub use fill::rules::clean_selection;
pub use fill::{
    advance, catalog_for, classify_field, convert_text, ExtractionSession, FieldCatalog, FormValues,
    LiveFields, NavigationEngine, PendingFocus, SelectionOutcome, SessionEvent, SessionListener,
    StatusKind, StatusMessage, SubscriptionId, ValueClassifier, ValueConverter,
};
pub use models::{ConversionResult, FieldPath, Gender, RecordType, SaisieConfig, ValueKind};
