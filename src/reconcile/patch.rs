//! Client-side patch replay.
//!
//! Applies an action list to an element tree exactly as a client would.
//! Used to check that reconcile output converges and by the `replay` command.

use thiserror::Error;

use crate::core::address::{children_at_mut, element_at_mut};
use crate::core::{Action, Address, Element, Op};

/// Why an action could not be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("empty address for `{kind}` action")]
    EmptyAddress { kind: &'static str },

    #[error("address {0:?} does not resolve")]
    Unresolved(Address),

    #[error("index {index} out of range at {address:?} (len {len})")]
    OutOfRange { address: Address, index: usize, len: usize },

    #[error("key mismatch at {address:?}: expected `{expected}`, found `{found}`")]
    KeyMismatch {
        address: Address,
        expected: String,
        found: String,
    },
}

/// Apply `actions` in order.
pub fn apply(tree: &mut Vec<Element>, actions: &[Action]) -> Result<(), PatchError> {
    actions.iter().try_for_each(|action| apply_one(tree, action))
}

/// Apply a single action. Marker actions are no-ops.
pub fn apply_one(tree: &mut Vec<Element>, action: &Action) -> Result<(), PatchError> {
    let address = &action.address;
    match &action.op {
        Op::Add { element, .. } => {
            let (parent, index) = split(address, action)?;
            let siblings = children_at_mut(tree, parent).ok_or_else(|| PatchError::Unresolved(parent.to_vec()))?;
            if index > siblings.len() {
                return Err(PatchError::OutOfRange {
                    address: address.clone(),
                    index,
                    len: siblings.len(),
                });
            }
            siblings.insert(index, element.clone());
        }
        Op::Remove { key } => {
            let (parent, index) = split(address, action)?;
            let siblings = children_at_mut(tree, parent).ok_or_else(|| PatchError::Unresolved(parent.to_vec()))?;
            let found = siblings.get(index).ok_or(PatchError::OutOfRange {
                address: address.clone(),
                index,
                len: siblings.len(),
            })?;
            check_key(address, key, &found.key)?;
            siblings.remove(index);
        }
        Op::Update { props, key } => {
            let node = element_at_mut(tree, address).ok_or_else(|| PatchError::Unresolved(address.clone()))?;
            check_key(address, key, &node.key)?;
            node.props = props.clone();
        }
        Op::Set { element, .. } => {
            let node = element_at_mut(tree, address).ok_or_else(|| PatchError::Unresolved(address.clone()))?;
            *node = element.clone();
        }
        Op::FreshBoundary | Op::TaskDone | Op::Last | Op::Rerun | Op::NoChange => {}
    }
    Ok(())
}

fn split<'a>(address: &'a [usize], action: &Action) -> Result<(&'a [usize], usize), PatchError> {
    match address.split_last() {
        Some((&index, parent)) => Ok((parent, index)),
        None => Err(PatchError::EmptyAddress { kind: action.kind() }),
    }
}

fn check_key(address: &Address, expected: &str, found: &str) -> Result<(), PatchError> {
    if expected == found {
        return Ok(());
    }
    Err(PatchError::KeyMismatch {
        address: address.clone(),
        expected: expected.to_string(),
        found: found.to_string(),
    })
}
