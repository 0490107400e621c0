//! Request lifecycle controller.
//!
//! # Module Structure
//!
//! ```text
//! app/
//! ├── signal     # Interrupt, Rerun, RerunScope
//! ├── request    # Request collaborator + SimpleRequest
//! ├── registry   # Fragment / overlay handles
//! ├── lifecycle  # GET first render, POST interaction, rerun loop
//! └── stream     # Action stream framing, async -> blocking bridge
//! ```
//!
//! # Flow
//!
//! ```text
//! GET  ──► purge ──► view ──► persist ──► full tree
//! POST ──► buffer? ──► clear? ──► load prev ──► view|fragment ──► reconcile ──► persist ──► actions
//!                                               ▲        │
//!                                               └─rerun──┘
//! ```

mod lifecycle;
mod registry;
mod request;
mod signal;
pub mod stream;


use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

use crate::builder::Builder;
use crate::config::{LifecycleConfig, SessionConfig};
use crate::core::{ActionsResponse, Element, Props};
use crate::session::SessionStore;

pub use registry::{Fragment, FragmentView};
pub use request::{FRAGMENT_PARAM, Request, SimpleRequest};
pub use signal::{Interrupt, Rerun, RerunScope, ViewResult};

/// Root view of a page.
pub type View = dyn Fn(&mut Builder) -> ViewResult + Send + Sync;

/// What a request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Full tree of a first render.
    Elements(Vec<Element>),
    /// Patch actions of an interaction.
    Actions(ActionsResponse),
}

impl Response {
    /// Actions of an interaction response.
    pub fn actions(&self) -> Option<&ActionsResponse> {
        match self {
            Self::Actions(actions) => Some(actions),
            Self::Elements(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Response plus the number of reruns it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    pub response: Response,
    pub reruns: usize,
}

/// Controller bound to a session store and a fragment registry.
pub struct App<S: SessionStore> {
    store: S,
    lifecycle: LifecycleConfig,
    session: SessionConfig,
    registry: FxHashMap<String, Fragment>,
}

impl<S: SessionStore> App<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lifecycle: LifecycleConfig::default(),
            session: SessionConfig::default(),
            registry: FxHashMap::default(),
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: LifecycleConfig) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    /// Register a fragment view under `key`.
    ///
    /// Re-registering a key replaces the previous view.
    pub fn fragment<F>(&mut self, key: &str, view: F) -> Fragment
    where
        F: Fn(&mut Builder, &Value) -> ViewResult + Send + Sync + 'static,
    {
        self.register(Fragment::new(key, view))
    }

    /// Register a fragment wrapped in a dialog-like element named `kind`.
    pub fn overlay<F>(&mut self, key: &str, kind: &str, props: Props, view: F) -> Fragment
    where
        F: Fn(&mut Builder, &Value) -> ViewResult + Send + Sync + 'static,
    {
        self.register(Fragment::overlay(key, kind, props, view))
    }

    fn register(&mut self, fragment: Fragment) -> Fragment {
        crate::debug!("app"; "registered fragment `{}`", fragment.key());
        self.registry.insert(fragment.key().to_string(), fragment.clone());
        fragment
    }

    /// Registered fragment for `key`.
    pub fn registered(&self, key: &str) -> Option<&Fragment> {
        self.registry.get(key)
    }

    /// Handle a request and return only its response.
    pub fn response(&self, view: &View, request: &mut dyn Request) -> crate::Result<Response> {
        self.handle(view, request).map(|handled| handled.response)
    }
}

impl<S: SessionStore + std::fmt::Debug> std::fmt::Debug for App<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("App")
            .field("store", &self.store)
            .field("lifecycle", &self.lifecycle)
            .field("fragments", &keys)
            .finish_non_exhaustive()
    }
}
