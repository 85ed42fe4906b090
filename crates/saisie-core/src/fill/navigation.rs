//! Field navigation: which field is focused and which one comes next.

use serde::Serialize;
use tracing::debug;

use super::catalog::{catalog_for, FieldCatalog};
use super::classifier::ValueClassifier;
use super::converter::ValueConverter;
use super::form::{FormValues, LiveFields};
use crate::error::SessionError;
use crate::models::record::{ConversionResult, FieldPath, RecordType, ValueKind};

/// Focus state of one correction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_field: Option<FieldPath>,
    pub record_type: RecordType,
}

/// Result of writing one selection into the active field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Field that received the value.
    pub field: FieldPath,
    /// Kind the field was classified as.
    pub kind: ValueKind,
    /// Converted value.
    pub conversion: ConversionResult,
    /// Field focus moved to, or `None` when the last field was reached.
    pub next_field: Option<FieldPath>,
}

/// Next field after `current`, or `None` when the catalog is exhausted.
///
/// Without form values every gate is treated as open.
pub fn advance(
    current: &FieldPath,
    record_type: RecordType,
    live: &LiveFields,
    values: Option<&FormValues>,
) -> Option<FieldPath> {
    next_in_catalog(catalog_for(record_type), current, live, values)
}

fn next_in_catalog(
    catalog: &FieldCatalog,
    current: &FieldPath,
    live: &LiveFields,
    values: Option<&FormValues>,
) -> Option<FieldPath> {
    // Fill a name group slot by slot before going back to the catalog
    let following_slot = current
        .name_slot()
        .and_then(|(group, index)| Some(FieldPath::slot(group, index.checked_add(1)?)));
    if let Some(next_slot) = following_slot {
        if live.contains(next_slot.as_str()) {
            return Some(next_slot);
        }
    }

    // A freshly checked toggle jumps straight to what it reveals
    if let Some(target) = catalog.toggle_for(current).and_then(|t| t.reveals()) {
        let checked = values.is_some_and(|v| v.flag(current.as_str()));
        if checked && live.contains(target.as_str()) {
            return Some(target.clone());
        }
    }

    let Some(position) = catalog.position_of(current) else {
        debug!("{} is not in the {} catalog", current, catalog.record_type());
        return None;
    };

    catalog.templates()[position + 1..]
        .iter()
        .filter(|template| template.is_reachable(values))
        .map(|template| template.first_field())
        .find(|field| live.contains(field.as_str()))
}

/// Navigation state machine bound to one record type.
pub struct NavigationEngine {
    state: NavigationState,
    catalog: &'static FieldCatalog,
    classifier: ValueClassifier,
    converter: ValueConverter,
}

impl NavigationEngine {
    pub fn new(record_type: RecordType) -> Self {
        Self::with_classifier(record_type, ValueClassifier::new())
    }

    pub fn with_classifier(record_type: RecordType, classifier: ValueClassifier) -> Self {
        Self {
            state: NavigationState {
                active_field: None,
                record_type,
            },
            catalog: catalog_for(record_type),
            classifier,
            converter: ValueConverter::new(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn active_field(&self) -> Option<&FieldPath> {
        self.state.active_field.as_ref()
    }

    pub fn record_type(&self) -> RecordType {
        self.state.record_type
    }

    pub fn catalog(&self) -> &'static FieldCatalog {
        self.catalog
    }

    /// Explicit focus from the operator.
    pub fn focus(&mut self, field: FieldPath) {
        self.state.active_field = Some(field);
    }

    pub fn clear_focus(&mut self) {
        self.state.active_field = None;
    }

    /// Next field after `current` under the given live form.
    pub fn next_field(
        &self,
        current: &FieldPath,
        live: &LiveFields,
        values: Option<&FormValues>,
    ) -> Option<FieldPath> {
        next_in_catalog(self.catalog, current, live, values)
    }

    /// First rendered field of the form, in tab order.
    pub fn first_field(&self, live: &LiveFields) -> Option<FieldPath> {
        self.catalog
            .expand(live)
            .into_iter()
            .find(|field| live.contains(field.as_str()))
    }

    /// Classify, convert and write `raw_text` into the active field, then move
    /// to the next field.
    ///
    /// The value is written before the next field is chosen, so a toggle that
    /// was just checked already reveals its target.
    pub fn extract_into(
        &mut self,
        raw_text: &str,
        live: &LiveFields,
        values: &mut FormValues,
    ) -> Result<Extraction, SessionError> {
        let field = self
            .state
            .active_field
            .clone()
            .ok_or(SessionError::NoActiveField)?;

        let kind = self.classifier.classify(field.as_str());
        let conversion = self.converter.convert(raw_text, kind);
        values.set(field.as_str(), conversion.final_value.as_str());

        let next_field = self.next_field(&field, live, Some(values));
        match &next_field {
            Some(next) => {
                debug!("{} filled, advancing to {}", field, next);
                self.state.active_field = Some(next.clone());
            }
            None => debug!("{} filled, last field reached", field),
        }

        Ok(Extraction {
            field,
            kind,
            conversion,
            next_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fully_rendered(record_type: RecordType, slots: u32) -> LiveFields {
        catalog_for(record_type).all_fields(slots).into_iter().collect()
    }

    fn walk(
        record_type: RecordType,
        live: &LiveFields,
        values: Option<&FormValues>,
        start: &str,
    ) -> Vec<FieldPath> {
        let mut visited = vec![FieldPath::from(start)];
        while let Some(next) = advance(visited.last().unwrap(), record_type, live, values) {
            assert!(visited.len() < 500, "navigation does not terminate");
            visited.push(next);
        }
        visited
    }

    #[test]
    fn test_walk_reproduces_catalog_order() {
        for record_type in RecordType::ALL {
            let live = fully_rendered(record_type, 1);
            let expected = catalog_for(record_type).expand(&live);
            let visited = walk(record_type, &live, None, expected[0].as_str());

            assert_eq!(visited, expected, "{}", record_type);
        }
    }

    #[test]
    fn test_walk_with_several_name_slots() {
        let live = fully_rendered(RecordType::Marriage, 3);
        let expected = catalog_for(RecordType::Marriage).expand(&live);
        let visited = walk(RecordType::Marriage, &live, None, "evenement.date.jour");

        assert_eq!(visited, expected);
    }

    #[test]
    fn test_three_slots_then_next_template() {
        let live: LiveFields = [
            "defunt.nom",
            "defunt.prenoms.prenom1",
            "defunt.prenoms.prenom2",
            "defunt.prenoms.prenom3",
            "defunt.dateNaissance.jour",
        ]
        .into_iter()
        .collect();

        let visited = walk(RecordType::Death, &live, None, "defunt.nom");
        let visited: Vec<&str> = visited.iter().map(FieldPath::as_str).collect();

        assert_eq!(
            visited,
            vec![
                "defunt.nom",
                "defunt.prenoms.prenom1",
                "defunt.prenoms.prenom2",
                "defunt.prenoms.prenom3",
                "defunt.dateNaissance.jour",
            ]
        );
    }

    #[test]
    fn test_slot_index_at_limit_leaves_the_group() {
        let live: LiveFields = [
            "defunt.prenoms.prenom0",
            "defunt.prenoms.prenom1",
            "defunt.dateNaissance.jour",
        ]
        .into_iter()
        .collect();

        let current = FieldPath::from(format!("defunt.prenoms.prenom{}", u32::MAX));
        let next = advance(&current, RecordType::Death, &live, None);
        assert_eq!(next, Some(FieldPath::from("defunt.dateNaissance.jour")));
    }

    #[test]
    fn test_declarant_details_skipped_unless_third_party() {
        let live = fully_rendered(RecordType::Birth, 2);
        let mut values = FormValues::new();
        values.set("declarant.identiteDeclarant", "PERE");

        let visited = walk(RecordType::Birth, &live, Some(&values), "titulaire.nom");
        assert!(visited.iter().any(|f| f.as_str() == "declarant.identiteDeclarant"));
        assert!(
            visited
                .iter()
                .all(|f| f.as_str() == "declarant.identiteDeclarant" || !f.is_within("declarant")),
            "{:?}",
            visited
        );

        values.set("declarant.identiteDeclarant", "TIERS");
        let visited = walk(RecordType::Birth, &live, Some(&values), "titulaire.nom");
        assert!(visited.iter().any(|f| f.as_str() == "declarant.nom"));
        assert!(visited.iter().any(|f| f.as_str() == "declarant.prenoms.prenom2"));
    }

    #[test]
    fn test_age_skipped_when_toggle_off() {
        let live = fully_rendered(RecordType::Birth, 1);
        let mut values = FormValues::new();
        values.set("parent2.afficherAge", true);

        let visited = walk(RecordType::Birth, &live, Some(&values), "titulaire.nom");
        assert!(!visited.iter().any(|f| f.as_str() == "parent1.age"));
        assert!(visited.iter().any(|f| f.as_str() == "parent2.age"));
    }

    #[test]
    fn test_checked_toggle_jumps_to_revealed_field() {
        let live: LiveFields = ["parent1.afficherAge", "parent1.age", "parent1.lieuNaissance.lieuReprise"]
            .into_iter()
            .collect();
        let mut values = FormValues::new();
        values.set("parent1.afficherAge", true);

        let next = advance(&FieldPath::from("parent1.afficherAge"), RecordType::Birth, &live, Some(&values));
        assert_eq!(next, Some(FieldPath::from("parent1.age")));

        values.set("parent1.afficherAge", false);
        let next = advance(&FieldPath::from("parent1.afficherAge"), RecordType::Birth, &live, Some(&values));
        assert_eq!(next, Some(FieldPath::from("parent1.lieuNaissance.lieuReprise")));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let live: LiveFields = ["defunt.nom", "defunt.profession"].into_iter().collect();
        let next = advance(&FieldPath::from("defunt.nom"), RecordType::Death, &live, None);
        assert_eq!(next, Some(FieldPath::from("defunt.profession")));
    }

    #[test]
    fn test_sub_path_of_template() {
        let live = fully_rendered(RecordType::Death, 1);
        let next = advance(
            &FieldPath::from("evenement.lieu.lieuReprise.detail"),
            RecordType::Death,
            &live,
            None,
        );
        assert_eq!(next, Some(FieldPath::from("defunt.nom")));
    }

    #[test]
    fn test_last_and_unknown_fields() {
        let live = fully_rendered(RecordType::Death, 1);
        let last = FieldPath::from("informationsComplementaires.dateCreation");
        assert_eq!(advance(&last, RecordType::Death, &live, None), None);
        assert_eq!(advance(&FieldPath::from("nulle.part"), RecordType::Death, &live, None), None);
    }

    #[test]
    fn test_extract_requires_active_field() {
        let mut engine = NavigationEngine::new(RecordType::Death);
        let live = fully_rendered(RecordType::Death, 1);
        let mut values = FormValues::new();

        let err = engine.extract_into("Jean", &live, &mut values).unwrap_err();
        assert_eq!(err, SessionError::NoActiveField);
        assert_eq!(engine.active_field(), None);
        assert_eq!(values, FormValues::new());
    }

    #[test]
    fn test_extract_plain_text_and_advance() {
        let mut engine = NavigationEngine::new(RecordType::Death);
        let live = fully_rendered(RecordType::Death, 2);
        let mut values = FormValues::new();
        engine.focus(FieldPath::from("defunt.nom"));

        let extraction = engine.extract_into("  Jean-Paul  ", &live, &mut values).unwrap();

        assert_eq!(extraction.kind, ValueKind::PlainText);
        assert_eq!(extraction.conversion.final_value, "Jean-Paul");
        assert!(!extraction.conversion.was_converted);
        assert_eq!(extraction.next_field, Some(FieldPath::from("defunt.prenoms.prenom1")));
        assert_eq!(values.text("defunt.nom"), Some("Jean-Paul"));
        assert_eq!(engine.active_field(), Some(&FieldPath::from("defunt.prenoms.prenom1")));
    }

    #[test]
    fn test_extract_without_name_slots_falls_through() {
        let mut engine = NavigationEngine::new(RecordType::Death);
        let live: LiveFields = ["defunt.nom", "defunt.dateNaissance.jour"].into_iter().collect();
        let mut values = FormValues::new();
        engine.focus(FieldPath::from("defunt.nom"));

        let extraction = engine.extract_into("Martin", &live, &mut values).unwrap();
        assert_eq!(extraction.next_field, Some(FieldPath::from("defunt.dateNaissance.jour")));
    }

    #[test]
    fn test_extract_day_words() {
        let mut engine = NavigationEngine::new(RecordType::Birth);
        let live = fully_rendered(RecordType::Birth, 1);
        let mut values = FormValues::new();
        engine.focus(FieldPath::from("parent1.dateNaissance.jour"));

        let extraction = engine.extract_into("vingt-quatre", &live, &mut values).unwrap();

        assert_eq!(extraction.kind, ValueKind::Day);
        assert_eq!(extraction.conversion.final_value, "24");
        assert!(extraction.conversion.was_converted);
        assert_eq!(extraction.next_field, Some(FieldPath::from("parent1.dateNaissance.mois")));
    }

    #[test]
    fn test_extract_gender() {
        let mut engine = NavigationEngine::new(RecordType::Birth);
        let live = fully_rendered(RecordType::Birth, 1);
        let mut values = FormValues::new();
        engine.focus(FieldPath::from("titulaire.sexe"));

        let extraction = engine.extract_into("Féminin", &live, &mut values).unwrap();
        assert_eq!(extraction.conversion.final_value, "FEMININ");
        assert_eq!(values.text("titulaire.sexe"), Some("FEMININ"));
    }

    #[test]
    fn test_extract_on_last_field_stays() {
        let mut engine = NavigationEngine::new(RecordType::Death);
        let live = fully_rendered(RecordType::Death, 1);
        let mut values = FormValues::new();
        let last = FieldPath::from("informationsComplementaires.dateCreation");
        engine.focus(last.clone());

        let extraction = engine.extract_into("12/03/1990", &live, &mut values).unwrap();
        assert_eq!(extraction.next_field, None);
        assert_eq!(engine.active_field(), Some(&last));
    }

    #[test]
    fn test_first_field_skips_unrendered() {
        let engine = NavigationEngine::new(RecordType::Death);
        let live: LiveFields = ["defunt.nom", "defunt.prenoms.prenom1"].into_iter().collect();
        assert_eq!(engine.first_field(&live), Some(FieldPath::from("defunt.nom")));
        assert_eq!(engine.first_field(&LiveFields::new()), None);
    }
}
