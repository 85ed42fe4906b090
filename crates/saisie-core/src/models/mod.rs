//! Data models for the field-fill engine.

pub mod config;
pub mod record;

pub use config::SaisieConfig;
pub use record::{ConversionResult, FieldPath, Gender, RecordType, ValueKind};
