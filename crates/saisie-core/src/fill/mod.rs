//! Assisted field fill: classify the focused field, convert the selected
//! text, write it and move on.

pub mod catalog;
pub mod classifier;
pub mod converter;
pub mod form;
pub mod navigation;
pub mod rules;
pub mod session;

pub use catalog::{catalog_for, FieldCatalog, FieldTemplate, Gate};
pub use classifier::{classify_field, ValueClassifier};
pub use converter::{convert_text, ValueConverter};
pub use form::{FormValues, LiveFields};
pub use navigation::{advance, Extraction, NavigationEngine, NavigationState};
pub use session::{
    ExtractionSession, PendingFocus, SelectionOutcome, SessionEvent, SessionListener, StatusKind,
    StatusMessage, SubscriptionId,
};
