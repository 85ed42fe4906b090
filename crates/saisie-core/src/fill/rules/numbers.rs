//! French number words to digits.
//!
//! Accumulates tokens the way French numerals are read: `mille` closes a
//! group and flushes it into the total, `cent` multiplies the group in
//! progress, everything else adds into it. Unknown tokens are skipped so that
//! noisy selections such as "l'an mille neuf cent douze" still convert.

use super::ValueRule;
use super::patterns::{DIGITS_ONLY, NUMBER_SEPARATORS, ORDINAL_SUFFIX};

const HUNDRED: u64 = 100;
const THOUSAND: u64 = 1000;

fn french_number_value(word: &str) -> Option<u64> {
    let value = match word {
        "un" | "une" | "premier" | "première" | "premiere" => 1,
        "deux" => 2,
        "trois" => 3,
        "quatre" => 4,
        "cinq" => 5,
        "six" => 6,
        "sept" => 7,
        "huit" => 8,
        "neuf" => 9,
        "dix" => 10,
        "onze" => 11,
        "douze" => 12,
        "treize" => 13,
        "quatorze" => 14,
        "quinze" => 15,
        "seize" => 16,
        "vingt" | "vingts" => 20,
        "trente" => 30,
        "quarante" => 40,
        "cinquante" => 50,
        "soixante" => 60,
        // Belgian and Swiss forms
        "septante" => 70,
        "huitante" | "octante" => 80,
        "nonante" => 90,
        "cent" | "cents" => HUNDRED,
        "mil" | "mille" => THOUSAND,
        _ => return None,
    };
    Some(value)
}

/// Resolve a token, falling back to the cardinal root of an ordinal
/// ("quatrième" → "quatre", "neuvième" → "neuf").
fn token_value(token: &str) -> Option<u64> {
    if let Some(value) = french_number_value(token) {
        return Some(value);
    }

    let root = ORDINAL_SUFFIX.replace(token, "");
    if root.is_empty() || root.len() == token.len() {
        return None;
    }

    let candidates = [
        root.to_string(),
        format!("{}e", root),
        root.strip_suffix('v').map(|r| format!("{}f", r)).unwrap_or_default(),
        root.strip_suffix('u').map(str::to_string).unwrap_or_default(),
    ];

    candidates
        .iter()
        .filter(|c| !c.is_empty())
        .find_map(|c| french_number_value(c))
}

/// Parse French number words into a value. `None` when nothing adds up to a
/// positive number.
pub fn parse_french_number(text: &str) -> Option<u64> {
    let lowered = text.trim().to_lowercase();
    let spaced = NUMBER_SEPARATORS.replace_all(&lowered, " ");

    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut previous: Option<u64> = None;

    for token in spaced.split(' ').filter(|t| !t.is_empty() && *t != "et") {
        let Some(value) = token_value(token) else {
            continue;
        };

        if value >= THOUSAND {
            let base = if current == 0 { 1 } else { current };
            total = total.saturating_add(base.saturating_mul(value));
            current = 0;
        } else if value == HUNDRED {
            let base = if current == 0 { 1 } else { current };
            current = base.saturating_mul(value);
        } else if value == 20 && previous == Some(4) {
            // quatre-vingt
            current = current - 4 + 80;
        } else {
            current = current.saturating_add(value);
        }

        previous = Some(value);
    }

    let value = total.saturating_add(current);
    (value > 0).then_some(value)
}

/// Day, year and cardinal field rule.
pub struct NumberRule;

impl NumberRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NumberRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueRule for NumberRule {
    fn convert(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if DIGITS_ONLY.is_match(trimmed) {
            return Some(trimmed.to_string());
        }

        parse_french_number(trimmed).map(|n| n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<u64> {
        parse_french_number(text)
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(parse("un"), Some(1));
        assert_eq!(parse("douze"), Some(12));
        assert_eq!(parse("Seize"), Some(16));
    }

    #[test]
    fn test_zero_is_not_a_conversion() {
        assert_eq!(parse("zéro"), None);
        assert_eq!(parse("zero"), None);
        assert_eq!(NumberRule::new().convert("zéro"), None);
        // Digits are kept as written
        assert_eq!(NumberRule::new().convert("0"), Some("0".to_string()));
    }

    #[test]
    fn test_compounds() {
        assert_eq!(parse("vingt-quatre"), Some(24));
        assert_eq!(parse("vingt et un"), Some(21));
        assert_eq!(parse("trente-et-une"), Some(31));
        assert_eq!(parse("dix-sept"), Some(17));
        assert_eq!(parse("soixante-dix-neuf"), Some(79));
        assert_eq!(parse("soixante et onze"), Some(71));
    }

    #[test]
    fn test_quatre_vingt() {
        assert_eq!(parse("quatre-vingts"), Some(80));
        assert_eq!(parse("quatre-vingt-dix-neuf"), Some(99));
        assert_eq!(parse("quatre-vingt-un"), Some(81));
        assert_eq!(parse("cent quatre vingt"), Some(180));
    }

    #[test]
    fn test_hundreds_and_thousands() {
        assert_eq!(parse("mille neuf cent"), Some(1900));
        assert_eq!(parse("mil neuf cent quarante-cinq"), Some(1945));
        assert_eq!(parse("deux mille vingt-quatre"), Some(2024));
        assert_eq!(parse("deux cents"), Some(200));
        assert_eq!(parse("deux cent mille"), Some(200_000));
        assert_eq!(parse("deux mille cent"), Some(2100));
        assert_eq!(parse("mille neuf cent quatre-vingt-dix-huit"), Some(1998));
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(parse("premier"), Some(1));
        assert_eq!(parse("première"), Some(1));
        assert_eq!(parse("deuxième"), Some(2));
        assert_eq!(parse("quatrième"), Some(4));
        assert_eq!(parse("cinquième"), Some(5));
        assert_eq!(parse("neuvième"), Some(9));
        assert_eq!(parse("onzième"), Some(11));
        assert_eq!(parse("vingt et unième"), Some(21));
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        assert_eq!(parse("l'an mille neuf cent douze"), Some(1912));
        assert_eq!(parse("le vingt-quatre"), Some(24));
        assert_eq!(parse("Jean-Paul"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_et_is_only_dropped_as_a_word() {
        // "sept" must not lose its "et"
        assert_eq!(parse("sept"), Some(7));
        assert_eq!(parse("trente et sept"), Some(37));
    }

    #[test]
    fn test_rule_keeps_digits() {
        let rule = NumberRule::new();
        assert_eq!(rule.convert("1987"), Some("1987".to_string()));
        assert_eq!(rule.convert("007"), Some("007".to_string()));
        assert_eq!(rule.convert("vingt-quatre"), Some("24".to_string()));
        assert_eq!(rule.convert("inconnu"), None);
    }
}
