//! Field path → value kind classification.

use tracing::trace;

use crate::models::config::ClassifierConfig;
use crate::models::record::{FieldPath, ValueKind};

/// Maps field paths to the kind of value they hold.
#[derive(Debug, Clone)]
pub struct ValueClassifier {
    numeric_time_fields: bool,
}

impl ValueClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            numeric_time_fields: config.numeric_time_fields,
        }
    }

    /// Set whether `heure`/`minute` fields are cardinal numbers.
    pub fn with_numeric_time_fields(mut self, numeric: bool) -> Self {
        self.numeric_time_fields = numeric;
        self
    }

    /// Classify a field path. Unknown paths are plain text.
    pub fn classify(&self, path: &str) -> ValueKind {
        let lowered = path.to_lowercase();
        let field = FieldPath::new(lowered.as_str());

        let kind = match field.terminal_segment() {
            "jour" => Some(ValueKind::Day),
            "mois" => Some(ValueKind::Month),
            "annee" => Some(ValueKind::Year),
            "heure" | "minute" if self.numeric_time_fields => Some(ValueKind::Cardinal),
            _ => None,
        };

        let kind = kind.unwrap_or_else(|| {
            if lowered.contains("age") || lowered.contains("nombre") {
                ValueKind::Cardinal
            } else if lowered.contains("sexe") {
                ValueKind::Gender
            } else {
                ValueKind::PlainText
            }
        });

        trace!("classified {} as {}", path, kind);
        kind
    }
}

impl Default for ValueClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default settings.
pub fn classify_field(path: &str) -> ValueKind {
    ValueClassifier::new().classify(path)
}
