//! French month names to two-digit month codes.

use super::ValueRule;
use super::patterns::SHORT_NUMBER;

/// Month names, both with and without diacritics. Scanned in order.
const FRENCH_MONTHS: &[(&str, &str)] = &[
    ("janvier", "01"),
    ("fevrier", "02"),
    ("février", "02"),
    ("mars", "03"),
    ("avril", "04"),
    ("mai", "05"),
    ("juin", "06"),
    ("juillet", "07"),
    ("aout", "08"),
    ("août", "08"),
    ("septembre", "09"),
    ("octobre", "10"),
    ("novembre", "11"),
    ("decembre", "12"),
    ("décembre", "12"),
];

/// Month field rule.
pub struct MonthRule;

impl MonthRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MonthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueRule for MonthRule {
    fn convert(&self, text: &str) -> Option<String> {
        let lowered = text.trim().to_lowercase();

        if SHORT_NUMBER.is_match(&lowered) {
            if let Ok(month) = lowered.parse::<u32>() {
                if (1..=12).contains(&month) {
                    return Some(format!("{:02}", month));
                }
            }
        }

        french_month_to_code(&lowered).map(str::to_string)
    }
}

/// First month whose name occurs in `text` ("le douze août" → "08").
pub fn french_month_to_code(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    FRENCH_MONTHS
        .iter()
        .find(|(name, _)| lowered.contains(name))
        .map(|(_, code)| *code)
}
