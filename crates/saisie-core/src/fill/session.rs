//! Extraction session: one correction form, its live fields and the listeners
//! that mirror the engine's decisions into the host UI.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::classifier::ValueClassifier;
use super::form::{FormValues, LiveFields};
use super::navigation::{Extraction, NavigationEngine};
use crate::error::SessionError;
use crate::models::config::{FeedbackConfig, SaisieConfig};
use crate::models::record::{FieldPath, RecordType};

/// Handle returned by [`ExtractionSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SubscriptionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient feedback shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
    /// How long the host should keep the message visible.
    pub expires_after_ms: u64,
}

impl StatusMessage {
    pub fn expires_after(&self) -> Duration {
        Duration::from_millis(self.expires_after_ms)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a session tells its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The field highlighted as active changed.
    ActiveFieldChanged { field: Option<FieldPath> },
    /// A converted value must be written into the form.
    ValueWritten { field: FieldPath, value: String },
    /// The host should move input focus to the field.
    FocusRequested { field: FieldPath },
    StatusChanged(StatusMessage),
}

/// Receives session events.
pub trait SessionListener {
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F> SessionListener for F
where
    F: FnMut(&SessionEvent),
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}

/// Focus move scheduled after a delay.
///
/// The host waits `delay_ms` then hands it back to
/// [`ExtractionSession::complete_focus`]. A later focus change, selection or
/// `close` makes it stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFocus {
    pub token: u64,
    pub target: FieldPath,
    pub delay_ms: u64,
}

impl PendingFocus {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Result of handling one text selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionOutcome {
    pub extraction: Extraction,
    pub status: StatusMessage,
    /// Focus move to perform once the delay elapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_focus: Option<PendingFocus>,
}

/// An open assisted-fill session over one correction form.
pub struct ExtractionSession {
    config: SaisieConfig,
    engine: NavigationEngine,
    live: LiveFields,
    values: FormValues,
    listeners: Vec<(SubscriptionId, Box<dyn SessionListener>)>,
    next_subscription: u64,
    focus_generation: u64,
    closed: bool,
}

impl ExtractionSession {
    /// Open a session for a record type.
    pub fn open(record_type: RecordType, config: SaisieConfig) -> Self {
        info!("Opening {} extraction session", record_type);
        let classifier = ValueClassifier::from_config(&config.classifier);

        Self {
            engine: NavigationEngine::with_classifier(record_type, classifier),
            config,
            live: LiveFields::new(),
            values: FormValues::new(),
            listeners: Vec::new(),
            next_subscription: 1,
            focus_generation: 0,
            closed: false,
        }
    }

    pub fn with_live_fields<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.live.extend(fields);
        self
    }

    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.engine.record_type()
    }

    pub fn active_field(&self) -> Option<&FieldPath> {
        self.engine.active_field()
    }

    pub fn live_fields(&self) -> &LiveFields {
        &self.live
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn config(&self) -> &SaisieConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Register a listener. Events are delivered in subscription order.
    pub fn subscribe(&mut self, listener: impl SessionListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// The host rendered a field.
    pub fn add_field(&mut self, path: impl Into<FieldPath>) -> Result<bool, SessionError> {
        self.ensure_open()?;
        Ok(self.live.add(path))
    }

    /// The host stopped rendering a field.
    pub fn remove_field(&mut self, path: &str) -> Result<bool, SessionError> {
        self.ensure_open()?;
        Ok(self.live.remove(path))
    }

    /// Mirror a value the operator edited by hand.
    pub fn set_value(&mut self, path: &str, value: impl Into<serde_json::Value>) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.values.set(path, value);
        Ok(())
    }

    /// Schedule focus on the first rendered field, after the initial delay.
    pub fn start(&mut self) -> Result<Option<PendingFocus>, SessionError> {
        self.ensure_open()?;

        let Some(first) = self.engine.first_field(&self.live) else {
            debug!("No rendered field to focus");
            return Ok(None);
        };

        Ok(Some(self.schedule_focus(first, self.config.navigation.initial_focus_delay())))
    }

    /// The operator focused a field.
    pub fn on_field_focused(&mut self, path: impl Into<FieldPath>) -> Result<(), SessionError> {
        self.ensure_open()?;
        let field = path.into();

        // Explicit focus wins over any scheduled move
        self.focus_generation += 1;
        debug!("Field focused: {}", field);
        self.engine.focus(field.clone());
        self.emit(SessionEvent::ActiveFieldChanged { field: Some(field) });
        Ok(())
    }

    /// The operator selected text in the act. Fills the active field and
    /// schedules focus on the next one.
    pub fn on_text_selected(&mut self, raw_text: &str) -> Result<SelectionOutcome, SessionError> {
        self.ensure_open()?;

        let extraction = match self.engine.extract_into(raw_text, &self.live, &mut self.values) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("Selection ignored: {}", e);
                let status = self.status(StatusKind::Error, "Sélectionnez un champ d'abord !".to_string());
                self.emit(SessionEvent::StatusChanged(status));
                return Err(e);
            }
        };

        // Any scheduled move is superseded by this one
        self.focus_generation += 1;

        self.emit(SessionEvent::ValueWritten {
            field: extraction.field.clone(),
            value: extraction.conversion.final_value.clone(),
        });

        let status = self.status(StatusKind::Success, self.describe(raw_text, &extraction));
        self.emit(SessionEvent::StatusChanged(status.clone()));

        let pending_focus = match &extraction.next_field {
            Some(next) => {
                self.emit(SessionEvent::ActiveFieldChanged {
                    field: Some(next.clone()),
                });
                Some(self.schedule_focus(next.clone(), self.config.navigation.focus_delay()))
            }
            None => {
                let last = self.status(StatusKind::Success, "Dernier champ atteint !".to_string());
                self.emit(SessionEvent::StatusChanged(last));
                None
            }
        };

        info!(
            "Filled {} with {:?} ({})",
            extraction.field, extraction.conversion.final_value, extraction.kind
        );

        Ok(SelectionOutcome {
            extraction,
            status,
            pending_focus,
        })
    }

    /// Apply a scheduled focus move once its delay elapsed.
    ///
    /// Returns `false` when the move went stale or its target is no longer
    /// rendered.
    pub fn complete_focus(&mut self, pending: &PendingFocus) -> bool {
        if self.closed || pending.token != self.focus_generation {
            debug!("Dropping stale focus on {}", pending.target);
            return false;
        }
        if !self.live.contains(pending.target.as_str()) {
            debug!("{} is no longer rendered", pending.target);
            return false;
        }

        if self.engine.active_field() != Some(&pending.target) {
            self.engine.focus(pending.target.clone());
            self.emit(SessionEvent::ActiveFieldChanged {
                field: Some(pending.target.clone()),
            });
        }
        self.emit(SessionEvent::FocusRequested {
            field: pending.target.clone(),
        });
        true
    }

    /// Tear the session down. Pending focus moves become stale and listeners
    /// are released.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        info!("Closing {} extraction session", self.record_type());
        self.closed = true;
        self.focus_generation += 1;
        self.engine.clear_focus();
        self.listeners.clear();
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn schedule_focus(&mut self, target: FieldPath, delay: Duration) -> PendingFocus {
        self.focus_generation += 1;
        PendingFocus {
            token: self.focus_generation,
            target,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn status(&self, kind: StatusKind, message: String) -> StatusMessage {
        StatusMessage {
            kind,
            message,
            expires_after_ms: self.config.feedback.status_expiry_ms,
        }
    }

    fn describe(&self, raw_text: &str, extraction: &Extraction) -> String {
        describe_conversion(&self.config.feedback, raw_text, extraction)
    }

    fn emit(&mut self, event: SessionEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

fn preview(text: &str, chars: usize) -> String {
    let mut preview: String = text.chars().take(chars).collect();
    if text.chars().count() > chars {
        preview.push_str("...");
    }
    preview
}

fn describe_conversion(feedback: &FeedbackConfig, raw_text: &str, extraction: &Extraction) -> String {
    let conversion = &extraction.conversion;
    if conversion.was_converted {
        format!(
            "Converti : \"{}\" → {}",
            preview(raw_text.trim(), feedback.converted_preview_chars),
            conversion.final_value
        )
    } else {
        format!(
            "Copié : \"{}\"",
            preview(&conversion.final_value, feedback.copied_preview_chars)
        )
    }
}

impl fmt::Debug for ExtractionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionSession")
            .field("record_type", &self.record_type())
            .field("active_field", &self.active_field())
            .field("live_fields", &self.live.len())
            .field("listeners", &self.listeners.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::catalog::catalog_for;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn death_session() -> ExtractionSession {
        let live = catalog_for(RecordType::Death).all_fields(2);
        ExtractionSession::open(RecordType::Death, SaisieConfig::default()).with_live_fields(live)
    }

    fn recorder(session: &mut ExtractionSession) -> (SubscriptionId, Rc<RefCell<Vec<SessionEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = session.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));
        (id, events)
    }

    #[test]
    fn test_start_focuses_first_field_after_initial_delay() {
        let mut session = death_session();
        let (_, events) = recorder(&mut session);

        let pending = session.start().unwrap().unwrap();
        assert_eq!(pending.target.as_str(), "evenement.date.jour");
        assert_eq!(pending.delay(), Duration::from_millis(500));
        assert!(events.borrow().is_empty());

        assert!(session.complete_focus(&pending));
        assert_eq!(session.active_field(), Some(&FieldPath::from("evenement.date.jour")));
        assert_eq!(
            events.borrow().last(),
            Some(&SessionEvent::FocusRequested {
                field: FieldPath::from("evenement.date.jour")
            })
        );
    }

    #[test]
    fn test_start_without_rendered_fields() {
        let mut session = ExtractionSession::open(RecordType::Birth, SaisieConfig::default());
        assert_eq!(session.start().unwrap(), None);
    }

    #[test]
    fn test_selection_fills_and_advances() {
        let mut session = death_session();
        let (_, events) = recorder(&mut session);
        session.on_field_focused("defunt.nom").unwrap();

        let outcome = session.on_text_selected("  Jean-Paul  ").unwrap();

        assert_eq!(outcome.extraction.conversion.final_value, "Jean-Paul");
        assert_eq!(outcome.status.kind, StatusKind::Success);
        assert_eq!(outcome.status.message, "Copié : \"Jean-Paul\"");
        assert_eq!(outcome.status.expires_after(), Duration::from_secs(3));
        assert_eq!(session.values().text("defunt.nom"), Some("Jean-Paul"));

        let pending = outcome.pending_focus.unwrap();
        assert_eq!(pending.target.as_str(), "defunt.prenoms.prenom1");
        assert_eq!(pending.delay_ms, 100);

        let recorded = events.borrow().clone();
        assert_eq!(
            recorded[1],
            SessionEvent::ValueWritten {
                field: FieldPath::from("defunt.nom"),
                value: "Jean-Paul".to_string()
            }
        );
        assert!(matches!(recorded[2], SessionEvent::StatusChanged(_)));
        assert_eq!(
            recorded[3],
            SessionEvent::ActiveFieldChanged {
                field: Some(FieldPath::from("defunt.prenoms.prenom1"))
            }
        );
    }

    #[test]
    fn test_converted_status_previews_selection() {
        let mut session = death_session();
        session.on_field_focused("evenement.date.annee").unwrap();

        let outcome = session.on_text_selected("mille neuf cent douze").unwrap();
        assert_eq!(outcome.extraction.conversion.final_value, "1912");
        assert_eq!(outcome.status.message, "Converti : \"mille neuf...\" → 1912");
    }

    #[test]
    fn test_selection_without_focus_is_reported() {
        let mut session = death_session();
        let (_, events) = recorder(&mut session);

        let err = session.on_text_selected("Jean").unwrap_err();

        assert_eq!(err, SessionError::NoActiveField);
        assert_eq!(session.values(), &FormValues::new());
        match &events.borrow()[..] {
            [SessionEvent::StatusChanged(status)] => {
                assert_eq!(status.kind, StatusKind::Error);
                assert_eq!(status.message, "Sélectionnez un champ d'abord !");
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_last_field_reports_and_keeps_focus() {
        let mut session = death_session();
        let (_, events) = recorder(&mut session);
        session.on_field_focused("informationsComplementaires.dateCreation").unwrap();

        let outcome = session.on_text_selected("01/02/2003").unwrap();

        assert_eq!(outcome.pending_focus, None);
        assert_eq!(
            session.active_field(),
            Some(&FieldPath::from("informationsComplementaires.dateCreation"))
        );
        let last = events.borrow().last().cloned();
        match last {
            Some(SessionEvent::StatusChanged(status)) => assert_eq!(status.message, "Dernier champ atteint !"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_manual_focus_cancels_pending_move() {
        let mut session = death_session();
        session.on_field_focused("defunt.nom").unwrap();
        let pending = session.on_text_selected("Martin").unwrap().pending_focus.unwrap();

        session.on_field_focused("defunt.profession").unwrap();

        assert!(!session.complete_focus(&pending));
        assert_eq!(session.active_field(), Some(&FieldPath::from("defunt.profession")));
    }

    #[test]
    fn test_newer_selection_supersedes_pending_move() {
        let mut session = death_session();
        session.on_field_focused("defunt.nom").unwrap();
        let first = session.on_text_selected("Martin").unwrap().pending_focus.unwrap();
        let second = session.on_text_selected("Jean").unwrap().pending_focus.unwrap();

        assert!(!session.complete_focus(&first));
        assert!(session.complete_focus(&second));
        assert_eq!(session.active_field(), Some(&FieldPath::from("defunt.prenoms.prenom2")));
    }

    #[test]
    fn test_focus_on_removed_field_is_dropped() {
        let mut session = death_session();
        session.on_field_focused("defunt.nom").unwrap();
        let pending = session.on_text_selected("Martin").unwrap().pending_focus.unwrap();

        assert!(session.remove_field("defunt.prenoms.prenom1").unwrap());
        assert!(!session.complete_focus(&pending));
    }

    #[test]
    fn test_close_invalidates_everything() {
        let mut session = death_session();
        let (_, events) = recorder(&mut session);
        session.on_field_focused("defunt.nom").unwrap();
        let pending = session.on_text_selected("Martin").unwrap().pending_focus.unwrap();
        let delivered = events.borrow().len();

        session.close();

        assert!(session.is_closed());
        assert!(!session.complete_focus(&pending));
        assert_eq!(session.on_text_selected("Jean").unwrap_err(), SessionError::Closed);
        assert_eq!(session.on_field_focused("defunt.nom").unwrap_err(), SessionError::Closed);
        assert_eq!(session.add_field("defunt.nom").unwrap_err(), SessionError::Closed);
        assert_eq!(events.borrow().len(), delivered);
        assert_eq!(session.values().text("defunt.nom"), Some("Martin"));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut session = death_session();
        let (id, events) = recorder(&mut session);

        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.on_field_focused("defunt.nom").unwrap();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_toggle_set_by_hand_opens_age() {
        let live = [
            "parent1.dateNaissance.annee",
            "parent1.age",
            "parent1.lieuNaissance.lieuReprise",
        ];
        let mut session =
            ExtractionSession::open(RecordType::Birth, SaisieConfig::default()).with_live_fields(live);
        session.on_field_focused("parent1.dateNaissance.annee").unwrap();
        let outcome = session.on_text_selected("mil neuf cent cinquante").unwrap();
        assert_eq!(outcome.extraction.conversion.final_value, "1950");
        assert_eq!(
            outcome.pending_focus.unwrap().target.as_str(),
            "parent1.lieuNaissance.lieuReprise"
        );

        session.set_value("parent1.afficherAge", true).unwrap();
        session.on_field_focused("parent1.dateNaissance.annee").unwrap();
        let outcome = session.on_text_selected("1950").unwrap();
        assert_eq!(outcome.pending_focus.unwrap().target.as_str(), "parent1.age");
    }

    #[test]
    fn test_selected_declarant_identity_opens_details() {
        let live = catalog_for(RecordType::Birth).all_fields(1);
        let mut session =
            ExtractionSession::open(RecordType::Birth, SaisieConfig::default()).with_live_fields(live);

        session.on_field_focused("declarant.identiteDeclarant").unwrap();
        let outcome = session.on_text_selected("PERE").unwrap();
        assert_eq!(
            outcome.pending_focus.unwrap().target.as_str(),
            "adresseTitulaire.adresse"
        );

        session.on_field_focused("declarant.identiteDeclarant").unwrap();
        let outcome = session.on_text_selected("TIERS").unwrap();
        assert_eq!(outcome.pending_focus.unwrap().target.as_str(), "declarant.nom");
    }

    #[test]
    fn test_strict_time_fields_are_copied() {
        let mut config = SaisieConfig::default();
        config.classifier.numeric_time_fields = false;
        let live = catalog_for(RecordType::Birth).all_fields(1);
        let mut session = ExtractionSession::open(RecordType::Birth, config).with_live_fields(live);
        session.on_field_focused("titulaire.dateNaissance.heure").unwrap();

        let outcome = session.on_text_selected("dix").unwrap();
        assert_eq!(outcome.extraction.conversion.final_value, "dix");
    }
}
