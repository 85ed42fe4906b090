//! French gender vocabulary to gender codes.

use super::ValueRule;
use super::cleaning::fold_diacritics;
use crate::models::record::Gender;

/// Gender field rule. Always produces a code.
pub struct GenderRule;

impl GenderRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueRule for GenderRule {
    fn convert(&self, text: &str) -> Option<String> {
        Some(parse_gender(text).code().to_string())
    }
}

/// Classify a gender term; anything unrecognized is `Inconnu`.
pub fn parse_gender(text: &str) -> Gender {
    let normalized = fold_diacritics(text.trim());

    match normalized.as_str() {
        "feminin" => Gender::Feminin,
        "masculin" => Gender::Masculin,
        "indetermine" => Gender::Indetermine,
        "non renseigne" | "inconnu" => Gender::Inconnu,
        _ => Gender::from_code(text).unwrap_or_default(),
    }
}
