//! UI events reported by the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event types with special meaning to the core.
pub mod kind {
    pub const CLICK: &str = "click";
    pub const CHANGE: &str = "change";
    pub const SUBMIT: &str = "submit";
    pub const NAVIGATE: &str = "navigate";
    pub const CLOSE: &str = "close";
}

/// The last client interaction.
///
/// Wire shape: `{"type": "click", "componentId": "btn", "data": {...}, "formId": "f"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub component_id: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

impl UiEvent {
    pub fn new(kind: impl Into<String>, component_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            component_id: component_id.into(),
            data: Value::Null,
            form_id: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn in_form(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    #[inline]
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_navigation(&self) -> bool {
        self.is(kind::NAVIGATE)
    }

    #[inline]
    pub fn is_submit(&self) -> bool {
        self.is(kind::SUBMIT)
    }

    /// Does this event target `component_id` with the given type?
    #[inline]
    pub fn targets(&self, component_id: &str, event_type: &str) -> bool {
        self.kind == event_type && self.component_id == component_id
    }

    /// Non-submit event scoped to a form; deferred until the form submits.
    pub fn deferred_form_id(&self) -> Option<&str> {
        match &self.form_id {
            Some(form) if !self.is_submit() => Some(form),
            _ => None,
        }
    }

    /// Event data, or one attribute of it when `attribute` is given.
    pub fn value(&self, attribute: Option<&str>) -> Value {
        match attribute {
            None => self.data.clone(),
            Some(attr) => self.data.get(attr).cloned().unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let ev: UiEvent = serde_json::from_value(json!({
            "type": "change",
            "componentId": "name",
            "data": {"value": "Ada"},
            "formId": "contact"
        }))
        .unwrap();

        assert_eq!(ev.kind, "change");
        assert_eq!(ev.component_id, "name");
        assert_eq!(ev.form_id.as_deref(), Some("contact"));
        assert_eq!(ev.value(Some("value")), json!("Ada"));
        assert_eq!(ev.value(Some("missing")), Value::Null);
    }

    #[test]
    fn test_navigation_event_without_component() {
        let ev: UiEvent = serde_json::from_value(json!({"type": "navigate", "data": {"to": "/b"}})).unwrap();
        assert!(ev.is_navigation());
        assert_eq!(ev.component_id, "");
    }

    #[test]
    fn test_deferred_form_id() {
        let change = UiEvent::new(kind::CHANGE, "a").in_form("f");
        assert_eq!(change.deferred_form_id(), Some("f"));

        let submit = UiEvent::new(kind::SUBMIT, "btn").in_form("f");
        assert_eq!(submit.deferred_form_id(), None);

        let click = UiEvent::new(kind::CLICK, "btn");
        assert_eq!(click.deferred_form_id(), None);
    }
}
