//! Rule-based value conversions for French civil-status text.

pub mod cleaning;
pub mod gender;
pub mod months;
pub mod numbers;
pub mod patterns;

pub use cleaning::{clean_selection, fold_diacritics};
pub use gender::{parse_gender, GenderRule};
pub use months::{french_month_to_code, MonthRule};
pub use numbers::{parse_french_number, NumberRule};

/// Trait for value conversion rules.
pub trait ValueRule {
    /// Convert cleaned selection text into a field value.
    ///
    /// Returns `None` when the text is not recognized; callers then copy the
    /// text through unchanged.
    fn convert(&self, text: &str) -> Option<String>;
}
