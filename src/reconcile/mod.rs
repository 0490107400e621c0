//! Tree reconciliation.
//!
//! - `diff` - old/new element lists to ordered patch actions
//! - `patch` - apply those actions to a tree the way the client does

mod diff;
mod patch;

#[cfg(test)]
mod tests;

pub use diff::{check_unique_keys, reconcile};
pub use patch::{PatchError, apply, apply_one};
