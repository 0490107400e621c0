//! Request collaborator.
//!
//! Hosts adapt their HTTP request type to [`Request`]. [`SimpleRequest`] is
//! an owned implementation used by the demo host, the replay command and
//! tests.

use serde::Deserialize;
use serde_json::Value;

use crate::core::{SessionKeys, UiEvent};

/// Default query parameter carrying a fragment id.
pub const FRAGMENT_PARAM: &str = "__fragment";

/// What the controller needs from an incoming request.
pub trait Request {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;
    /// Was the body a JSON payload?
    fn is_json(&self) -> bool;
    /// Parsed JSON payload.
    fn json(&self) -> Option<&Value>;
    fn ui_event(&self) -> Option<&UiEvent>;
    /// Targeted fragment; `None` for whole-page requests.
    fn fragment_id(&self) -> Option<&str>;
    fn query_param(&self, name: &str) -> Option<&str>;
    fn referrer(&self) -> Option<&str>;
    fn session_id(&self) -> &str;
    /// `host[:port]`
    fn host(&self) -> &str;
    fn pathname(&self) -> &str;
    /// Forget the event so a rerun pass does not see it.
    fn clear_event(&mut self);
    /// Widen the request to the whole page.
    fn clear_fragment_id(&mut self);

    /// Store keys for this session+route, or for the referrer's route.
    fn session_keys(&self, use_referrer: bool) -> SessionKeys {
        if use_referrer {
            SessionKeys::from_referrer(self.session_id(), self.referrer(), self.host(), self.pathname())
        } else {
            SessionKeys::new(self.session_id(), self.host(), self.pathname())
        }
    }
}

/// Interaction payload: `{"uiEvent": {...}, "fragmentId": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    ui_event: Option<UiEvent>,
    #[serde(default)]
    fragment_id: Option<String>,
}

/// Owned request value.
#[derive(Debug, Clone)]
pub struct SimpleRequest {
    method: String,
    session_id: String,
    host: String,
    pathname: String,
    query: Vec<(String, String)>,
    referrer: Option<String>,
    payload: Option<Value>,
    event: Option<UiEvent>,
    fragment_id: Option<String>,
    fragment_param: String,
    fragment_cleared: bool,
}

impl SimpleRequest {
    pub fn new(method: &str, session_id: &str, host: &str, pathname: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            session_id: session_id.to_string(),
            host: host.to_string(),
            pathname: pathname.to_string(),
            query: Vec::new(),
            referrer: None,
            payload: None,
            event: None,
            fragment_id: None,
            fragment_param: FRAGMENT_PARAM.to_string(),
            fragment_cleared: false,
        }
    }

    pub fn get(session_id: &str, host: &str, pathname: &str) -> Self {
        Self::new("GET", session_id, host, pathname)
    }

    pub fn post(session_id: &str, host: &str, pathname: &str) -> Self {
        Self::new("POST", session_id, host, pathname)
    }

    /// Parse a raw query string (`a=1&b=2`, no leading `?`).
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Query parameter name used as fragment id fallback.
    pub fn with_fragment_param(mut self, name: impl Into<String>) -> Self {
        self.fragment_param = name.into();
        self
    }

    /// Attach a JSON body, extracting `uiEvent` and `fragmentId`.
    ///
    /// A body that does not match the payload shape is kept but yields no event.
    pub fn with_payload(mut self, payload: Value) -> Self {
        let parsed = Payload::deserialize(&payload).unwrap_or_default();
        self.event = parsed.ui_event;
        self.fragment_id = parsed.fragment_id.filter(|id| !id.is_empty());
        self.payload = Some(payload);
        self
    }

    pub fn with_event(mut self, event: UiEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_fragment(mut self, fragment_id: impl Into<String>) -> Self {
        self.fragment_id = Some(fragment_id.into());
        self
    }
}

impl Request for SimpleRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn is_json(&self) -> bool {
        self.payload.is_some()
    }

    fn json(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    fn ui_event(&self) -> Option<&UiEvent> {
        self.event.as_ref()
    }

    fn fragment_id(&self) -> Option<&str> {
        if self.fragment_cleared {
            return None;
        }
        self.fragment_id
            .as_deref()
            .or_else(|| self.query_param(&self.fragment_param))
            .filter(|id| !id.is_empty())
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn clear_event(&mut self) {
        self.event = None;
    }

    fn clear_fragment_id(&mut self) {
        self.fragment_cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_extracts_event_and_fragment() {
        let req = SimpleRequest::post("s", "h", "/").with_payload(json!({
            "uiEvent": {"type": "click", "componentId": "btn", "data": {}},
            "fragmentId": "counter"
        }));
        assert!(req.is_json());
        assert_eq!(req.ui_event().map(|e| e.component_id.as_str()), Some("btn"));
        assert_eq!(req.fragment_id(), Some("counter"));
    }

    #[test]
    fn test_fragment_id_falls_back_to_query() {
        let req = SimpleRequest::post("s", "h", "/").with_query("__fragment=side&x=1");
        assert_eq!(req.fragment_id(), Some("side"));
        assert_eq!(req.query_param("x"), Some("1"));

        let req = SimpleRequest::post("s", "h", "/").with_query("__fragment=");
        assert_eq!(req.fragment_id(), None);
    }

    #[test]
    fn test_clear_event_and_fragment() {
        let mut req = SimpleRequest::post("s", "h", "/")
            .with_event(UiEvent::new("click", "b"))
            .with_fragment("f");
        req.clear_event();
        req.clear_fragment_id();
        assert!(req.ui_event().is_none());
        assert!(req.fragment_id().is_none());
    }

    #[test]
    fn test_malformed_payload_has_no_event() {
        let req = SimpleRequest::post("s", "h", "/").with_payload(json!({"uiEvent": 42}));
        assert!(req.is_json());
        assert!(req.ui_event().is_none());
    }

    #[test]
    fn test_session_keys_with_referrer() {
        let req = SimpleRequest::post("s", "h", "/new").with_referrer("http://h/old");
        assert_eq!(req.session_keys(false).tree, "s:h/new");
        assert_eq!(req.session_keys(true).tree, "s:h/old");
    }
}
