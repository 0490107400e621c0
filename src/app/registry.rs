//! Fragment and overlay registration.
//!
//! Registration binds a stable key to a view once, at setup. The returned
//! [`Fragment`] handle is what views call to render it; the controller looks
//! it up by key to serve fragment-scoped requests.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::signal::ViewResult;
use crate::builder::Builder;
use crate::core::Props;

/// View body of a fragment; receives its (replayed) arguments.
pub type FragmentView = dyn Fn(&mut Builder, &Value) -> ViewResult + Send + Sync;

#[derive(Clone)]
enum Wrap {
    Plain,
    /// Dialog-like element named `kind` inside the fragment.
    Overlay { kind: String, props: Props },
}

/// Handle to a registered fragment.
#[derive(Clone)]
pub struct Fragment {
    key: Arc<str>,
    view: Arc<FragmentView>,
    wrap: Wrap,
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.wrap {
            Wrap::Plain => "fragment",
            Wrap::Overlay { kind, .. } => kind,
        };
        f.debug_struct("Fragment")
            .field("key", &self.key)
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

impl Fragment {
    pub(crate) fn new<F>(key: &str, view: F) -> Self
    where
        F: Fn(&mut Builder, &Value) -> ViewResult + Send + Sync + 'static,
    {
        Self {
            key: Arc::from(key),
            view: Arc::new(view),
            wrap: Wrap::Plain,
        }
    }

    pub(crate) fn overlay<F>(key: &str, kind: &str, props: Props, view: F) -> Self
    where
        F: Fn(&mut Builder, &Value) -> ViewResult + Send + Sync + 'static,
    {
        Self {
            wrap: Wrap::Overlay {
                kind: kind.to_string(),
                props,
            },
            ..Self::new(key, view)
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key of the dialog-like element of an overlay.
    pub fn overlay_key(&self) -> Option<String> {
        match &self.wrap {
            Wrap::Plain => None,
            Wrap::Overlay { kind, .. } => Some(format!("{}-{}", self.key, kind)),
        }
    }

    /// Render inside the active scope.
    ///
    /// `args` are recorded on a full render; a fragment render replays the
    /// recorded ones instead.
    pub fn render(&self, ui: &mut Builder, args: Value) -> ViewResult {
        let args = ui.fragment_args(&self.key, args);
        let mut scope = ui.fragment(Some(self.key()));
        match &self.wrap {
            Wrap::Plain => (self.view)(&mut *scope, &args),
            Wrap::Overlay { kind, props } => {
                let element_key = format!("{}-{}", self.key, kind);
                let mut overlay = scope.dialog_like(kind, &element_key, &self.key, props.clone())?;
                (self.view)(&mut *overlay, &args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Interrupt;
    use crate::builder::BuildContext;
    use crate::core::UiEvent;
    use crate::core::element::props;
    use serde_json::json;

    #[test]
    fn test_plain_fragment_wraps_view() {
        let frag = Fragment::new("side", |ui, args| {
            ui.text(args["title"].as_str().unwrap_or_default(), Some("title"));
            Ok(())
        });

        let mut ui = Builder::default();
        frag.render(&mut ui, json!({"title": "Hi"})).unwrap();
        let out = ui.into_output();

        assert_eq!(out.elements[0].name, "fragment");
        assert_eq!(out.elements[0].children()[0].prop("text"), Some(&json!("Hi")));
        assert_eq!(out.params.get("side"), Some(&json!({"title": "Hi"})));
        assert_eq!(out.fragments.get("side"), Some(&vec![0]));
    }

    #[test]
    fn test_overlay_structure() {
        let frag = Fragment::overlay("menu", "drawer", props([("side", json!("left"))]), |ui, _| {
            ui.text("item", Some("item"));
            Ok(())
        });
        assert_eq!(frag.overlay_key().as_deref(), Some("menu-drawer"));

        let mut ui = Builder::default();
        frag.render(&mut ui, Value::Null).unwrap();
        let out = ui.into_output();

        let drawer = &out.elements[0].children()[0];
        assert_eq!(drawer.name, "drawer");
        assert_eq!(drawer.key, "menu-drawer");
        assert_eq!(drawer.prop("side"), Some(&json!("left")));
        assert_eq!(drawer.prop("open"), Some(&json!(true)));
        assert_eq!(drawer.children()[0].key, "item");
    }

    #[test]
    fn test_overlay_close_clears_gate_and_reruns() {
        let frag = Fragment::overlay("menu", "popup", Props::new(), |_, _| Ok(()));
        let mut ui = Builder::new(BuildContext {
            event: Some(UiEvent::new("close", "menu-popup")),
            ..Default::default()
        });
        ui.state_mut().insert("menu".into(), json!(true));

        match frag.render(&mut ui, Value::Null) {
            Err(Interrupt::Rerun(rerun)) => assert!(!rerun.state.contains_key("menu")),
            other => panic!("expected rerun, got {other:?}"),
        }
    }
}
