//! Patch actions sent to the client.
//!
//! # Wire Format
//!
//! Each action is a flat JSON object:
//!
//! ```text
//! {"type": "add",    "address": [0, 2], "target": "app", "element": {...}, "key": "k"}
//! {"type": "remove", "address": [1],    "target": "app", "key": "k"}
//! {"type": "update", "address": [0],    "target": "fragment", "props": {...}, "key": "k"}
//! {"type": "last",   "address": [],     "target": "app"}
//! ```

use serde::{Deserialize, Serialize};

use super::{Address, Element, Props};

/// Which part of the client tree an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    App,
    Fragment,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Fragment => "fragment",
        }
    }
}

/// One patch operation instructing the client how to mutate its tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub address: Address,
    pub target: Target,
    #[serde(flatten)]
    pub op: Op,
}

/// Operation payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Op {
    /// Insert `element` at the address (last index is the position).
    Add { element: Element, key: String },
    /// Remove the node at the address.
    Remove { key: String },
    /// Replace the props of the node at the address.
    Update { props: Props, key: String },
    /// Replace the node at the address wholesale.
    Set { element: Element, key: String },
    /// Start of a fresh streamed response; client drops pending partial state.
    FreshBoundary,
    /// View routine finished.
    TaskDone,
    /// No more actions follow.
    Last,
    /// View restarted; actions since the boundary are superseded.
    Rerun,
    /// Interaction produced no visible change.
    NoChange,
}

// =============================================================================
// Constructors
// =============================================================================

impl Action {
    pub fn new(address: Address, target: Target, op: Op) -> Self {
        Self {
            address,
            target,
            op,
        }
    }

    pub fn add(address: Address, element: Element, target: Target) -> Self {
        let key = element.key.clone();
        Self::new(address, target, Op::Add { element, key })
    }

    pub fn remove(address: Address, key: impl Into<String>, target: Target) -> Self {
        Self::new(address, target, Op::Remove { key: key.into() })
    }

    pub fn update(address: Address, props: Props, key: impl Into<String>, target: Target) -> Self {
        Self::new(
            address,
            target,
            Op::Update {
                props,
                key: key.into(),
            },
        )
    }

    pub fn set(address: Address, element: Element, target: Target) -> Self {
        let key = element.key.clone();
        Self::new(address, target, Op::Set { element, key })
    }

    /// Payload-free marker action (`FreshBoundary`, `TaskDone`, ...).
    pub fn marker(op: Op, target: Target) -> Self {
        Self::new(Vec::new(), target, op)
    }

    /// Key carried by the action, if any.
    pub fn key(&self) -> Option<&str> {
        match &self.op {
            Op::Add { key, .. } | Op::Remove { key } | Op::Update { key, .. } | Op::Set { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }

    /// Wire name of the action type.
    pub fn kind(&self) -> &'static str {
        match self.op {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Update { .. } => "update",
            Op::Set { .. } => "set",
            Op::FreshBoundary => "fresh_boundary",
            Op::TaskDone => "task_done",
            Op::Last => "last",
            Op::Rerun => "rerun",
            Op::NoChange => "no_change",
        }
    }
}

/// Response to an interaction request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub actions: Vec<Action>,
    pub target: Target,
}

impl ActionsResponse {
    pub fn new(actions: Vec<Action>, target: Target) -> Self {
        Self { actions, target }
    }

    /// Response carrying no actions.
    pub fn empty(target: Target) -> Self {
        Self::new(Vec::new(), target)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"actions":[],"target":"app"}"#.to_string())
    }
}
