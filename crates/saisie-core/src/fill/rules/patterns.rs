//! Common regex patterns for French selection cleanup and conversion.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Any whitespace run, line breaks included
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Blanks left by scanned paper forms ("né le ______")
    pub static ref PLACEHOLDER_RUN: Regex = Regex::new(r"_{2,}").unwrap();

    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^\d+$").unwrap();

    pub static ref SHORT_NUMBER: Regex = Regex::new(r"^\d{1,2}$").unwrap();

    // Separators between number words ("vingt-quatre", "mille  neuf")
    pub static ref NUMBER_SEPARATORS: Regex = Regex::new(r"[\s\-]+").unwrap();

    // Ordinal endings: "deuxième", "vingtieme", "dernière"
    pub static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(?:ième|ieme|ier|ière|iere|ère|ere)s?$").unwrap();
}
