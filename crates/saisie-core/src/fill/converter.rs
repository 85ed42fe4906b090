//! Raw selection → typed field value.

use tracing::debug;

use super::rules::{clean_selection, GenderRule, MonthRule, NumberRule, ValueRule};
use crate::models::record::{ConversionResult, ValueKind};

/// Converts cleaned selections according to a value kind.
///
/// Never fails: unrecognized text is copied through as cleaned.
pub struct ValueConverter {
    months: MonthRule,
    numbers: NumberRule,
    gender: GenderRule,
}

impl ValueConverter {
    pub fn new() -> Self {
        Self {
            months: MonthRule::new(),
            numbers: NumberRule::new(),
            gender: GenderRule::new(),
        }
    }

    fn rule(&self, kind: ValueKind) -> Option<&dyn ValueRule> {
        match kind {
            kind if kind.is_numeric() => Some(&self.numbers),
            ValueKind::Month => Some(&self.months),
            ValueKind::Gender => Some(&self.gender),
            _ => None,
        }
    }

    /// Convert a raw selection for a field of the given kind.
    pub fn convert(&self, raw_text: &str, kind: ValueKind) -> ConversionResult {
        let cleaned = clean_selection(raw_text);

        if cleaned.is_empty() {
            return ConversionResult {
                final_value: String::new(),
                was_converted: false,
            };
        }

        let final_value = self
            .rule(kind)
            .and_then(|rule| rule.convert(&cleaned))
            .unwrap_or_else(|| cleaned.clone());

        let was_converted = final_value != cleaned;
        if was_converted {
            debug!("converted {:?} as {} to {:?}", cleaned, kind, final_value);
        }

        ConversionResult {
            final_value,
            was_converted,
        }
    }
}

impl Default for ValueConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert with a default converter.
pub fn convert_text(raw_text: &str, kind: ValueKind) -> ConversionResult {
    ValueConverter::new().convert(raw_text, kind)
}
