//! WASM bindings for assisted civil-status form filling.
//!
//! The host page renders the correction form and the act text. It registers
//! rendered fields, forwards focus and selection events to a [`FillSession`]
//! and applies the events the session emits.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use saisie_core::{
    catalog_for, decode_payload, ExtractionSession, FieldPath, PendingFocus, RecordType, SaisieConfig,
    SessionEvent, SubscriptionId, ValueClassifier, ValueConverter, ValueKind,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize to plain JS objects (no `Map`s for JSON objects).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn parse_record_type(record_type: &str) -> Result<RecordType, JsValue> {
    record_type.parse().map_err(js_error)
}

/// Value kind of a form field path ("day", "month", "plain_text", ...).
#[wasm_bindgen]
pub fn classify_field(path: &str) -> String {
    saisie_core::classify_field(path).to_string()
}

/// Convert selected text into a value of the given kind.
///
/// Returns `{ final_value, was_converted }`.
#[wasm_bindgen]
pub fn convert_text(text: &str, kind: &str) -> Result<JsValue, JsValue> {
    let kind: ValueKind = kind.parse().map_err(js_error)?;
    to_js(&saisie_core::convert_text(text, kind))
}

/// Classify `field` and convert `text` for it.
#[wasm_bindgen]
pub fn convert_for_field(text: &str, field: &str) -> Result<JsValue, JsValue> {
    let kind = ValueClassifier::new().classify(field);
    to_js(&ValueConverter::new().convert(text, kind))
}

/// Normalize a raw browser selection.
#[wasm_bindgen]
pub fn clean_selection(text: &str) -> String {
    saisie_core::clean_selection(text)
}

/// Every field path of a record type's form, with `slots` name slots per group.
#[wasm_bindgen]
pub fn catalog_fields(record_type: &str, slots: u32) -> Result<JsValue, JsValue> {
    let record_type = parse_record_type(record_type)?;
    to_js(&catalog_for(record_type).all_fields(slots))
}

/// Decode a composed act payload into `{ document, lines }`.
#[wasm_bindgen]
pub fn parse_document(payload: &str) -> Result<JsValue, JsValue> {
    let document = decode_payload(payload).map_err(js_error)?;

    #[derive(Serialize)]
    struct ParsedDocument<'a> {
        document: &'a saisie_core::ComposedDocument,
        lines: Vec<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        record_type: Option<RecordType>,
    }

    to_js(&ParsedDocument {
        document: &document,
        lines: document.body_lines(),
        record_type: document.record_type(),
    })
}

/// Fill session bound to one correction form.
#[wasm_bindgen]
pub struct FillSession {
    inner: ExtractionSession,
}

#[wasm_bindgen]
impl FillSession {
    /// Open a session. `config` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(record_type: &str, config: JsValue) -> Result<FillSession, JsValue> {
        let record_type = parse_record_type(record_type)?;
        let config: SaisieConfig = if config.is_undefined() || config.is_null() {
            SaisieConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };

        Ok(Self {
            inner: ExtractionSession::open(record_type, config),
        })
    }

    /// Register a rendered field.
    #[wasm_bindgen]
    pub fn add_field(&mut self, path: &str) -> Result<bool, JsValue> {
        self.inner.add_field(path).map_err(js_error)
    }

    /// Forget a field that is no longer rendered.
    #[wasm_bindgen]
    pub fn remove_field(&mut self, path: &str) -> Result<bool, JsValue> {
        self.inner.remove_field(path).map_err(js_error)
    }

    /// Mirror a value edited by hand.
    #[wasm_bindgen]
    pub fn set_value(&mut self, path: &str, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
        self.inner.set_value(path, value).map_err(js_error)
    }

    /// Schedule the initial focus. Returns a pending focus or `null`.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        let pending = self.inner.start().map_err(js_error)?;
        to_js(&pending)
    }

    /// The operator focused a field.
    #[wasm_bindgen]
    pub fn focus(&mut self, path: &str) -> Result<(), JsValue> {
        self.inner.on_field_focused(path).map_err(js_error)
    }

    /// The operator selected text. Returns `{ extraction, status, pending_focus }`.
    #[wasm_bindgen]
    pub fn select_text(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let outcome = self.inner.on_text_selected(text).map_err(js_error)?;
        to_js(&outcome)
    }

    /// Apply a pending focus once its `delay_ms` elapsed.
    #[wasm_bindgen]
    pub fn complete_focus(&mut self, pending: JsValue) -> Result<bool, JsValue> {
        let pending: PendingFocus = serde_wasm_bindgen::from_value(pending).map_err(js_error)?;
        Ok(self.inner.complete_focus(&pending))
    }

    /// Call `callback` with every session event. Returns a subscription id.
    #[wasm_bindgen]
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(move |event: &SessionEvent| {
            let delivered = to_js(event).and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(e) = delivered {
                web_sys::console::error_2(&JsValue::from_str("session listener failed:"), &e);
            }
        });
        id.value() as u32
    }

    #[wasm_bindgen]
    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.inner.unsubscribe(SubscriptionId::from(u64::from(id)))
    }

    #[wasm_bindgen(getter)]
    pub fn active_field(&self) -> Option<String> {
        self.inner.active_field().map(FieldPath::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn record_type(&self) -> String {
        self.inner.record_type().code().to_string()
    }

    /// Current form values as a plain object.
    #[wasm_bindgen]
    pub fn values(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.values().as_json())
    }

    /// Tear the session down. Later calls fail and pending focus is dropped.
    #[wasm_bindgen]
    pub fn close(&mut self) {
        self.inner.close();
    }
}
