//! Core data model shared by builder, reconciler and controller.
//!
//! | Module    | Purpose                                               |
//! |-----------|-------------------------------------------------------|
//! | `element` | `Element` tree nodes and ordered `Props`              |
//! | `action`  | Patch `Action` wire types and `ActionsResponse`       |
//! | `event`   | `UiEvent` sent by the client                          |
//! | `keys`    | `SessionKeys` derivation per session + route          |
//! | `address` | Bounds-checked lookup and splicing by child-index path |

pub mod action;
pub mod address;
pub mod element;
pub mod event;
pub mod keys;

pub use action::{Action, ActionsResponse, Op, Target};
pub use address::Address;
pub use element::{Element, Props};
pub use event::UiEvent;
pub use keys::SessionKeys;
