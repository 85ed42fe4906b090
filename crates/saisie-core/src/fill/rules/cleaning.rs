//! Selection cleanup shared by the host and the converter.

use super::patterns::{PLACEHOLDER_RUN, WHITESPACE_RUN};

/// Clean a raw selection: collapse whitespace, drop `__` placeholders, trim.
pub fn clean_selection(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let stripped = PLACEHOLDER_RUN.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Lower-case and remove French diacritics ("Indéterminé" → "indetermine").
pub fn fold_diacritics(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => folded.push('a'),
            'ç' => folded.push('c'),
            'è' | 'é' | 'ê' | 'ë' => folded.push('e'),
            'ì' | 'í' | 'î' | 'ï' => folded.push('i'),
            'ñ' => folded.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => folded.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => folded.push('u'),
            'ý' | 'ÿ' => folded.push('y'),
            'œ' => folded.push_str("oe"),
            'æ' => folded.push_str("ae"),
            other => folded.push(other),
        }
    }

    folded
}
