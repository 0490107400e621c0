//! Thin widget helpers over `create_element`.
//!
//! Widgets take their id from the label hash; everything else is a
//! non-widget with a counter id.

use serde_json::{Value, json};

use super::{Builder, Scope};
use crate::app::Interrupt;
use crate::core::element::props;
use crate::core::event::kind;

impl Builder {
    /// Plain text.
    pub fn text(&mut self, text: &str, key: Option<&str>) {
        self.create_non_widget("text", key, props([("text", json!(text))]));
    }

    /// Navigation link.
    pub fn link(&mut self, href: &str, text: &str, key: Option<&str>) {
        self.create_non_widget(
            "link",
            key,
            props([
                ("href", json!(href)),
                ("replace", json!(false)),
                ("is_external", json!(false)),
                ("text", json!(text)),
            ]),
        );
    }

    /// Link wrapping whatever the returned scope adds.
    pub fn link_area(&mut self, href: &str, key: Option<&str>) -> Scope<'_> {
        self.container(
            "link",
            key,
            props([
                ("href", json!(href)),
                ("replace", json!(false)),
                ("is_external", json!(false)),
                ("className", json!("no-link-decoration")),
            ]),
        )
    }

    /// Page `<head>` metadata.
    pub fn set_page_config(&mut self, title: &str, description: &str) {
        self.create_non_widget(
            "head",
            None,
            props([("title", json!(title)), ("description", json!(description))]),
        );
    }

    /// Button; `true` on the pass that handles its click.
    pub fn button(&mut self, label: &str, key: Option<&str>) -> Result<bool, Interrupt> {
        let key = self.widget_key("button", label, key);
        let clicked = self.has_event(&key, kind::CLICK)?;
        self.create_element("button", key, props([("text", json!(label))]), None);
        Ok(clicked)
    }

    /// Submit button of the enclosing form.
    pub fn submit_button(&mut self, label: &str, key: Option<&str>) -> Result<bool, Interrupt> {
        let key = self.widget_key("button", label, key);
        let submitted = self.has_event(&key, kind::SUBMIT)?;
        self.create_element(
            "button",
            key,
            props([("text", json!(label)), ("type", json!("submit"))]),
            None,
        );
        Ok(submitted)
    }

    /// Text input bound to the state entry named after its key.
    pub fn text_input(&mut self, label: &str, default: &str, key: Option<&str>) -> Result<String, Interrupt> {
        let key = self.widget_key("text-input", label, key);
        if let Some(Value::String(value)) = self.event_value(&key, kind::CHANGE, Some("value"))? {
            self.state.insert(key.clone(), Value::String(value));
        }
        let value = self
            .state
            .get(&key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string();
        self.create_element(
            "text-input",
            key,
            props([("label", json!(label)), ("value", json!(value))]),
            None,
        );
        Ok(value)
    }

    /// Checkbox bound to the state entry named after its key.
    pub fn checkbox(&mut self, label: &str, default: bool, key: Option<&str>) -> Result<bool, Interrupt> {
        let key = self.widget_key("checkbox", label, key);
        if let Some(Value::Bool(checked)) = self.event_value(&key, kind::CHANGE, Some("checked"))? {
            self.state.insert(key.clone(), Value::Bool(checked));
        }
        let checked = self.state.get(&key).and_then(Value::as_bool).unwrap_or(default);
        self.create_element(
            "checkbox",
            key,
            props([("label", json!(label)), ("checked", json!(checked))]),
            None,
        );
        Ok(checked)
    }
}
