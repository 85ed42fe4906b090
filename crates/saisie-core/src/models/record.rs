//! Record, field and value models shared by the fill engine.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// `<group>.prenomN`, the concrete field of a repeatable name slot.
    static ref NAME_SLOT: Regex = Regex::new(r"^(.+)\.prenom(\d+)$").unwrap();
}

/// Nature of the civil-status record being corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Birth record (acte de naissance).
    #[serde(rename = "NAISSANCE")]
    Birth,
    /// Marriage record (acte de mariage).
    #[serde(rename = "MARIAGE")]
    Marriage,
    /// Death record (acte de décès).
    #[serde(rename = "DECES")]
    Death,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::Birth, RecordType::Marriage, RecordType::Death];

    /// Wire name used by the civil-status back office.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Birth => "NAISSANCE",
            Self::Marriage => "MARIAGE",
            Self::Death => "DECES",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "naissance" | "birth" => Ok(Self::Birth),
            "mariage" | "marriage" => Ok(Self::Marriage),
            "deces" | "décès" | "death" => Ok(Self::Death),
            other => Err(format!("unknown record type: {}", other)),
        }
    }
}

/// Dotted identifier of one leaf input of the correction form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path, split on `.` or `_`.
    pub fn terminal_segment(&self) -> &str {
        self.0.rsplit(['.', '_']).next().unwrap_or(&self.0)
    }

    /// Whether this path is `prefix` itself or lies underneath it.
    pub fn is_within(&self, prefix: &str) -> bool {
        self.0 == prefix
            || (self.0.starts_with(prefix) && self.0[prefix.len()..].starts_with('.'))
    }

    /// Parse a repeatable name slot (`defunt.prenoms.prenom2` → `("defunt.prenoms", 2)`).
    pub fn name_slot(&self) -> Option<(&str, u32)> {
        let caps = NAME_SLOT.captures(&self.0)?;
        let group = caps.get(1)?.as_str();
        let index = caps[2].parse().ok()?;
        Some((group, index))
    }

    /// Concrete field of slot `index` in a name group.
    pub fn slot(group: &str, index: u32) -> Self {
        Self(format!("{}.prenom{}", group, index))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Semantic type a field's raw text must be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Day,
    Month,
    Year,
    Cardinal,
    Gender,
    PlainText,
}

impl ValueKind {
    /// Kinds whose converted value is a digit string.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Day | Self::Year | Self::Cardinal)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Cardinal => "cardinal",
            Self::Gender => "gender",
            Self::PlainText => "plain_text",
        };
        f.write_str(name)
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "day" | "jour" => Ok(Self::Day),
            "month" | "mois" => Ok(Self::Month),
            "year" | "annee" => Ok(Self::Year),
            "cardinal" | "number" | "nombre" => Ok(Self::Cardinal),
            "gender" | "sexe" => Ok(Self::Gender),
            "plain_text" | "text" | "texte" => Ok(Self::PlainText),
            other => Err(format!("unknown value kind: {}", other)),
        }
    }
}

/// Gender codes accepted by the civil-status form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Masculin,
    Feminin,
    Indetermine,
    Inconnu,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Masculin,
        Gender::Feminin,
        Gender::Indetermine,
        Gender::Inconnu,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Masculin => "MASCULIN",
            Self::Feminin => "FEMININ",
            Self::Indetermine => "INDETERMINE",
            Self::Inconnu => "INCONNU",
        }
    }

    /// Look up a code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::Inconnu
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of converting one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Value to write into the form.
    pub final_value: String,
    /// Whether the value differs from the cleaned selection.
    pub was_converted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_type_parsing() {
        assert_eq!("DECES".parse::<RecordType>(), Ok(RecordType::Death));
        assert_eq!("décès".parse::<RecordType>(), Ok(RecordType::Death));
        assert_eq!("birth".parse::<RecordType>(), Ok(RecordType::Birth));
        assert_eq!("Mariage".parse::<RecordType>(), Ok(RecordType::Marriage));
        assert!("divorce".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_record_type_serde_uses_wire_names() {
        let json = serde_json::to_string(&RecordType::Marriage).unwrap();
        assert_eq!(json, "\"MARIAGE\"");

        let parsed: RecordType = serde_json::from_str("\"NAISSANCE\"").unwrap();
        assert_eq!(parsed, RecordType::Birth);
    }

    #[test]
    fn test_terminal_segment() {
        assert_eq!(FieldPath::from("parent1.dateNaissance.jour").terminal_segment(), "jour");
        assert_eq!(FieldPath::from("mentionTexte_annee").terminal_segment(), "annee");
        assert_eq!(FieldPath::from("nom").terminal_segment(), "nom");
    }

    #[test]
    fn test_is_within() {
        let path = FieldPath::from("epoux1.pere.nom");
        assert!(path.is_within("epoux1.pere"));
        assert!(path.is_within("epoux1.pere.nom"));
        assert!(!path.is_within("epoux1.per"));
        assert!(!path.is_within("epoux2"));
    }

    #[test]
    fn test_name_slot() {
        let path = FieldPath::from("defunt.pere.prenoms.prenom12");
        assert_eq!(path.name_slot(), Some(("defunt.pere.prenoms", 12)));
        assert_eq!(FieldPath::from("defunt.nom").name_slot(), None);
        assert_eq!(FieldPath::slot("titulaire.prenoms", 3).as_str(), "titulaire.prenoms.prenom3");
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_code("feminin"), Some(Gender::Feminin));
        assert_eq!(Gender::from_code(" INCONNU "), Some(Gender::Inconnu));
        assert_eq!(Gender::from_code("femme"), None);
        assert_eq!(serde_json::to_string(&Gender::Indetermine).unwrap(), "\"INDETERMINE\"");
    }
}
