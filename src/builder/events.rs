//! Event lookup and form-event buffering.
//!
//! Form fields do not react to their own events. A non-submit event carrying
//! a `formId` is parked under [`EVENTS_FOR_LATER`] by the controller. When
//! the form's submit arrives, the first lookup inside that form moves the
//! parked events to [`FORM_EVENTS`], marks the form in [`IGNORE_SUBMIT`] and
//! reruns the app with the submit event still visible. On that pass every
//! field finds its parked event.
//!
//! ```text
//! change(a) ──► __events4later[f][a]
//! change(b) ──► __events4later[f][b]
//! submit(f) ──► __form_events[f] = {a, b}, __ignore_submit = f, rerun(app)
//!           ──► fields read __form_events[f], submit button matches directly
//! ```

use serde_json::{Map, Value};

use super::Builder;
use crate::app::{Interrupt, RerunScope};
use crate::core::{Props, UiEvent};

/// `{form_id: {component_id: event}}` waiting for the form's submit.
pub const EVENTS_FOR_LATER: &str = "__events4later";
/// `{form_id: {component_id: event}}` promoted for the submit pass.
pub const FORM_EVENTS: &str = "__form_events";
/// Form id whose submit was already promoted.
pub const IGNORE_SUBMIT: &str = "__ignore_submit";

impl Builder {
    /// Did the last event target `component_id` with `event_type`?
    ///
    /// Returns the event data (or its `attribute`) on a match. Inside a form
    /// whose submit is pending promotion, promotes the parked events and
    /// raises an app rerun instead.
    pub fn event_value(
        &mut self,
        component_id: &str,
        event_type: &str,
        attribute: Option<&str>,
    ) -> Result<Option<Value>, Interrupt> {
        if let Some(form) = self.pending_submit() {
            promote_form_events(&mut self.state, &form);
            crate::debug!("form"; "submit of `{}` promoted parked events", form);
            return Err(self.rerun(RerunScope::App, false));
        }

        let Some(event) = self.event.as_ref() else {
            return Ok(None);
        };
        if event.targets(component_id, event_type) {
            return Ok(Some(event.value(attribute)));
        }

        let parked = self
            .form_key()
            .and_then(|form| self.state.get(FORM_EVENTS)?.get(form)?.get(component_id))
            .and_then(|v| serde_json::from_value::<UiEvent>(v.clone()).ok());
        Ok(parked.filter(|e| e.is(event_type)).map(|e| e.value(attribute)))
    }

    /// Convenience: did `event_type` hit `component_id`?
    pub fn has_event(&mut self, component_id: &str, event_type: &str) -> Result<bool, Interrupt> {
        Ok(self.event_value(component_id, event_type, None)?.is_some())
    }

    /// Form id whose submit targets the enclosing form and is not yet promoted.
    fn pending_submit(&self) -> Option<String> {
        let event = self.event.as_ref().filter(|e| e.is_submit())?;
        let form = self.form_key()?;
        if event.form_id.as_deref() != Some(form) {
            return None;
        }
        let promoted = self.state.get(IGNORE_SUBMIT).and_then(Value::as_str) == Some(form);
        (!promoted).then(|| form.to_string())
    }
}

fn promote_form_events(state: &mut Props, form: &str) {
    let parked = state
        .get_mut(EVENTS_FOR_LATER)
        .and_then(Value::as_object_mut)
        .and_then(|forms| forms.remove(form))
        .unwrap_or_else(|| Value::Object(Map::new()));
    with_object(state, FORM_EVENTS, |forms| {
        forms.insert(form.to_string(), parked);
    });
    state.insert(IGNORE_SUBMIT.to_string(), Value::String(form.to_string()));
}

/// Park a non-submit form event for later.
///
/// Returns `false` when the event is not a deferred form event.
pub fn buffer_form_event(state: &mut Props, event: &UiEvent) -> bool {
    let Some(form) = event.deferred_form_id() else {
        return false;
    };
    let Ok(value) = serde_json::to_value(event) else {
        return false;
    };
    with_object(state, EVENTS_FOR_LATER, |forms| {
        with_object(forms, form, |events| {
            events.insert(event.component_id.clone(), value);
        });
    });
    true
}

/// Drop every reserved entry belonging to `form`.
pub fn clear_form_events(state: &mut Props, form: &str) {
    for key in [EVENTS_FOR_LATER, FORM_EVENTS] {
        if let Some(forms) = state.get_mut(key).and_then(Value::as_object_mut) {
            forms.remove(form);
        }
    }
    if state.get(IGNORE_SUBMIT).and_then(Value::as_str) == Some(form) {
        state.remove(IGNORE_SUBMIT);
    }
}

/// Run `f` on the object stored under `key`, replacing any non-object value.
fn with_object(map: &mut Map<String, Value>, key: &str, f: impl FnOnce(&mut Map<String, Value>)) {
    let mut inner = match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    };
    f(&mut inner);
    map.insert(key.to_string(), Value::Object(inner));
}
