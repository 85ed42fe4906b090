//! Live form state mirrored inside a session: which fields are rendered and
//! what they currently hold.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::record::FieldPath;

/// Registry of field identifiers currently rendered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveFields {
    fields: BTreeSet<FieldPath>,
}

impl LiveFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rendered field. Returns `false` if it was already known.
    pub fn add(&mut self, path: impl Into<FieldPath>) -> bool {
        self.fields.insert(path.into())
    }

    /// Forget a field the host stopped rendering.
    pub fn remove(&mut self, path: &str) -> bool {
        self.fields.remove(&FieldPath::new(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains(&FieldPath::new(path))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.iter()
    }
}

impl<P: Into<FieldPath>> Extend<P> for LiveFields {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.fields.extend(iter.into_iter().map(Into::into));
    }
}

impl<P: Into<FieldPath>> FromIterator<P> for LiveFields {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut live = Self::new();
        live.extend(iter);
        live
    }
}

/// Form values addressed by dotted field paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    root: Value,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON tree. Non-object roots start empty.
    pub fn from_json(root: Value) -> Self {
        if root.is_object() {
            Self { root }
        } else {
            Self::default()
        }
    }

    pub fn as_json(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    /// String value at `path`, if any.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Truthiness of a checkbox-like value. Missing values are `false`.
    pub fn flag(&self, path: &str) -> bool {
        match self.get(path) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Set the value at `path`, creating intermediate objects and replacing
    /// scalars that stand in the way.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut node = &mut self.root;

        for segment in path.split('.') {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = match node {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                other => other,
            };
        }

        *node = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_fields_registry() {
        let mut live = LiveFields::new();
        assert!(live.add("defunt.nom"));
        assert!(!live.add("defunt.nom"));
        live.extend(["defunt.prenoms.prenom1", "defunt.prenoms.prenom2"]);

        assert_eq!(live.len(), 3);
        assert!(live.contains("defunt.prenoms.prenom2"));
        assert!(live.remove("defunt.prenoms.prenom2"));
        assert!(!live.contains("defunt.prenoms.prenom2"));
        assert!(!live.remove("defunt.prenoms.prenom2"));
    }

    #[test]
    fn test_set_and_get_nested() {
        let mut values = FormValues::new();
        values.set("parent1.dateNaissance.jour", "24");
        values.set("parent1.afficherAge", true);

        assert_eq!(values.text("parent1.dateNaissance.jour"), Some("24"));
        assert!(values.flag("parent1.afficherAge"));
        assert!(!values.flag("parent2.afficherAge"));
        assert_eq!(values.get("parent1.nom"), None);
    }

    #[test]
    fn test_set_replaces_scalar_parents() {
        let mut values = FormValues::from_json(json!({"declarant": "TIERS"}));
        values.set("declarant.identiteDeclarant", "TIERS");

        assert_eq!(values.text("declarant.identiteDeclarant"), Some("TIERS"));
    }

    #[test]
    fn test_flag_accepts_string_true() {
        let values = FormValues::from_json(json!({"parent2": {"afficherAge": "true"}}));
        assert!(values.flag("parent2.afficherAge"));
    }

    #[test]
    fn test_non_object_root_is_ignored() {
        let values = FormValues::from_json(json!([1, 2, 3]));
        assert_eq!(values, FormValues::new());
    }
}
