//! Field order catalogs: the canonical tab order of each correction form.
//!
//! Catalogs are declared as data. Each entry is a field path with optional
//! markers:
//!
//! - `group[]` is a repeatable name-slot group (`group.prenom1`, `group.prenom2`, ...)
//! - `?flag.path` gates the entry on a checked box
//! - `?some.path=VALUE` gates the entry on a field holding `VALUE`
//! - `>other.path` marks a toggle that reveals `other.path` once checked

use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use super::form::{FormValues, LiveFields};
use crate::models::record::{FieldPath, RecordType};

const BIRTH_FIELDS: &[&str] = &[
    // Titulaire
    "titulaire.nom",
    "titulaire.sexe",
    "titulaire.prenoms[]",
    "titulaire.dateNaissance.jour",
    "titulaire.dateNaissance.mois",
    "titulaire.dateNaissance.annee",
    "titulaire.dateNaissance.heure",
    "titulaire.dateNaissance.minute",
    "titulaire.lieuNaissance.lieuReprise",
    "titulaire.domicile.adresse",
    "titulaire.profession",
    // Parent 1
    "parent1.nom",
    "parent1.prenoms[]",
    "parent1.dateNaissance.jour",
    "parent1.dateNaissance.mois",
    "parent1.dateNaissance.annee",
    "parent1.afficherAge >parent1.age",
    "parent1.age ?parent1.afficherAge",
    "parent1.lieuNaissance.lieuReprise",
    "parent1.domicile.adresse",
    "parent1.profession",
    // Parent 2
    "parent2.nom",
    "parent2.prenoms[]",
    "parent2.dateNaissance.jour",
    "parent2.dateNaissance.mois",
    "parent2.dateNaissance.annee",
    "parent2.afficherAge >parent2.age",
    "parent2.age ?parent2.afficherAge",
    "parent2.lieuNaissance.lieuReprise",
    "parent2.domicile.adresse",
    "parent2.profession",
    // Déclarant
    "declarant.identiteDeclarant",
    "declarant.nom ?declarant.identiteDeclarant=TIERS",
    "declarant.prenoms[] ?declarant.identiteDeclarant=TIERS",
    "declarant.dateNaissance.jour ?declarant.identiteDeclarant=TIERS",
    "declarant.dateNaissance.mois ?declarant.identiteDeclarant=TIERS",
    "declarant.dateNaissance.annee ?declarant.identiteDeclarant=TIERS",
    "adresseTitulaire.adresse",
    // Informations complémentaires
    "informationsComplementaires.francaisPar",
    "informationsComplementaires.dateCreation",
];

const MARRIAGE_FIELDS: &[&str] = &[
    // Événement
    "evenement.date.jour",
    "evenement.date.mois",
    "evenement.date.annee",
    "evenement.lieu.lieuReprise",
    // Époux 1
    "epoux1.nom",
    "epoux1.prenoms[]",
    "epoux1.dateNaissance.jour",
    "epoux1.dateNaissance.mois",
    "epoux1.dateNaissance.annee",
    "epoux1.age",
    "epoux1.lieuNaissance.lieuReprise",
    "epoux1.domicile.adresse",
    "epoux1.profession",
    "epoux1.pere.nom",
    "epoux1.pere.prenoms[]",
    "epoux1.pere.domicile.adresse",
    "epoux1.pere.profession",
    "epoux1.mere.nom",
    "epoux1.mere.prenoms[]",
    "epoux1.mere.domicile.adresse",
    "epoux1.mere.profession",
    // Époux 2
    "epoux2.nom",
    "epoux2.prenoms[]",
    "epoux2.dateNaissance.jour",
    "epoux2.dateNaissance.mois",
    "epoux2.dateNaissance.annee",
    "epoux2.age",
    "epoux2.lieuNaissance.lieuReprise",
    "epoux2.domicile.adresse",
    "epoux2.profession",
    "epoux2.pere.nom",
    "epoux2.pere.prenoms[]",
    "epoux2.pere.domicile.adresse",
    "epoux2.pere.profession",
    "epoux2.mere.nom",
    "epoux2.mere.prenoms[]",
    "epoux2.mere.domicile.adresse",
    "epoux2.mere.profession",
    // Contrat de mariage
    "contratMariage.existenceContrat",
    "contratMariage.enonciations",
    "informationsComplementaires.dateCreation",
];

const DEATH_FIELDS: &[&str] = &[
    // Événement
    "evenement.date.jour",
    "evenement.date.mois",
    "evenement.date.annee",
    "evenement.lieu.lieuReprise",
    // Défunt
    "defunt.nom",
    "defunt.prenoms[]",
    "defunt.dateNaissance.jour",
    "defunt.dateNaissance.mois",
    "defunt.dateNaissance.annee",
    "defunt.lieu.lieuReprise",
    "defunt.domicile.adresse",
    "defunt.profession",
    // Parents
    "defunt.pere.nom",
    "defunt.pere.prenoms[]",
    "defunt.pere.domicile.adresse",
    "defunt.pere.profession",
    "defunt.mere.nom",
    "defunt.mere.prenoms[]",
    "defunt.mere.domicile.adresse",
    "defunt.mere.profession",
    // Dernier conjoint
    "dernierConjoint.nom",
    "dernierConjoint.prenoms[]",
    "informationsComplementaires.dateCreation",
];

lazy_static! {
    static ref BIRTH_CATALOG: FieldCatalog = FieldCatalog::from_entries(RecordType::Birth, BIRTH_FIELDS);
    static ref MARRIAGE_CATALOG: FieldCatalog = FieldCatalog::from_entries(RecordType::Marriage, MARRIAGE_FIELDS);
    static ref DEATH_CATALOG: FieldCatalog = FieldCatalog::from_entries(RecordType::Death, DEATH_FIELDS);
}

/// Catalog for a record type.
pub fn catalog_for(record_type: RecordType) -> &'static FieldCatalog {
    match record_type {
        RecordType::Birth => &BIRTH_CATALOG,
        RecordType::Marriage => &MARRIAGE_CATALOG,
        RecordType::Death => &DEATH_CATALOG,
    }
}

/// Condition under which a catalog entry is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gate {
    /// The checkbox at `path` is checked.
    Flag { path: String },
    /// The field at `path` holds exactly `value`.
    Equals { path: String, value: String },
}

impl Gate {
    fn parse(entry: &str) -> Self {
        match entry.split_once('=') {
            Some((path, value)) => Self::Equals {
                path: path.to_string(),
                value: value.to_string(),
            },
            None => Self::Flag {
                path: entry.to_string(),
            },
        }
    }

    pub fn is_open(&self, values: &FormValues) -> bool {
        match self {
            Self::Flag { path } => values.flag(path),
            Self::Equals { path, value } => values.text(path) == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag { path } => write!(f, "{}", path),
            Self::Equals { path, value } => write!(f, "{}={}", path, value),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTemplate {
    /// Field path, or the group path of a name-slot group.
    path: String,
    /// Whether the entry is a repeatable name-slot group.
    name_slots: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    gate: Option<Gate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reveals: Option<FieldPath>,
}

impl FieldTemplate {
    /// Parse one catalog entry (see module docs for the markers).
    pub fn parse(entry: &str) -> Self {
        let mut parts = entry.split_whitespace();
        let head = parts.next().unwrap_or_default();

        let (path, name_slots) = match head.strip_suffix("[]") {
            Some(group) => (group.to_string(), true),
            None => (head.to_string(), false),
        };

        let mut template = Self {
            path,
            name_slots,
            gate: None,
            reveals: None,
        };

        for marker in parts {
            if let Some(gate) = marker.strip_prefix('?') {
                template.gate = Some(Gate::parse(gate));
            } else if let Some(target) = marker.strip_prefix('>') {
                template.reveals = Some(FieldPath::new(target));
            }
        }

        template
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_name_slots(&self) -> bool {
        self.name_slots
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }

    pub fn reveals(&self) -> Option<&FieldPath> {
        self.reveals.as_ref()
    }

    /// First concrete field of the entry (`group.prenom1` for slot groups).
    pub fn first_field(&self) -> FieldPath {
        if self.name_slots {
            FieldPath::slot(&self.path, 1)
        } else {
            FieldPath::new(self.path.as_str())
        }
    }

    /// Whether `field` is this entry, one of its slots, or a sub-field of it.
    pub fn encloses(&self, field: &FieldPath) -> bool {
        field.is_within(&self.path)
    }

    /// Whether the gate (if any) lets the entry through. No values means open.
    pub fn is_reachable(&self, values: Option<&FormValues>) -> bool {
        match (&self.gate, values) {
            (Some(gate), Some(values)) => gate.is_open(values),
            _ => true,
        }
    }
}

impl fmt::Display for FieldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if self.name_slots {
            write!(f, "[]")?;
        }
        if let Some(gate) = &self.gate {
            write!(f, " ?{}", gate)?;
        }
        if let Some(target) = &self.reveals {
            write!(f, " >{}", target)?;
        }
        Ok(())
    }
}

/// Ordered field templates of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCatalog {
    record_type: RecordType,
    templates: Vec<FieldTemplate>,
}

impl FieldCatalog {
    pub fn from_entries(record_type: RecordType, entries: &[&str]) -> Self {
        Self {
            record_type,
            templates: entries.iter().map(|entry| FieldTemplate::parse(entry)).collect(),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn templates(&self) -> &[FieldTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Index of the first template enclosing `field`.
    pub fn position_of(&self, field: &FieldPath) -> Option<usize> {
        self.templates.iter().position(|t| t.encloses(field))
    }

    /// Template whose toggle reveals something, if `field` is such a toggle.
    pub fn toggle_for(&self, field: &FieldPath) -> Option<&FieldTemplate> {
        self.templates
            .iter()
            .find(|t| t.reveals.is_some() && t.path == field.as_str())
    }

    /// Concrete fields in tab order. Slot groups expand while their slots are
    /// live and stop at the first missing one.
    pub fn expand(&self, live: &LiveFields) -> Vec<FieldPath> {
        let mut fields = Vec::with_capacity(self.templates.len());

        for template in &self.templates {
            if !template.name_slots {
                fields.push(template.first_field());
                continue;
            }

            let mut index = 1;
            loop {
                let slot = FieldPath::slot(&template.path, index);
                if !live.contains(slot.as_str()) {
                    break;
                }
                fields.push(slot);
                index += 1;
            }
        }

        fields
    }

    /// Every concrete field with `slots` name slots per group, as a host that
    /// renders the whole form would register them.
    pub fn all_fields(&self, slots: u32) -> Vec<FieldPath> {
        self.templates
            .iter()
            .flat_map(|t| {
                if t.name_slots {
                    (1..=slots).map(|i| FieldPath::slot(&t.path, i)).collect()
                } else {
                    vec![t.first_field()]
                }
            })
            .collect()
    }
}
