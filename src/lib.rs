//! Routelit - server-side element trees, reconciliation and request lifecycle.
//!
//! # Architecture
//!
//! ```text
//! Request -> App (lifecycle) -> Builder (view) -> Reconciler -> Actions
//!               |                                    ^
//!               +-------- SessionStore (prev tree) --+
//! ```
//!
//! # Modules
//!
//! - `core` - Element tree, actions, UI events, session keys, addressing
//! - `builder` - Scoped tree builder with deterministic ids
//! - `reconcile` - Key-based diff and client-side patch replay
//! - `session` - Session store collaborator and in-memory store
//! - `app` - Request lifecycle controller, fragment registry, rerun signal
//! - `config` - `routelit.toml` loading for the host binary
//! - `logger` - Colored `[module]` logging macros

pub mod logger;

pub mod app;
pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod reconcile;
pub mod session;

pub use app::{App, Fragment, Handled, Interrupt, Request, Rerun, RerunScope, Response, SimpleRequest, View, ViewResult};
pub use builder::Builder;
pub use core::{Action, ActionsResponse, Address, Element, Op, Props, SessionKeys, Target, UiEvent};
pub use error::{Error, Result};
pub use reconcile::reconcile;
pub use session::{MemoryStore, SessionStore};
