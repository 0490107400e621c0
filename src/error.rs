//! Library error types.
//!
//! Control-flow signals (rerun, halt) are not errors; see [`crate::app::Interrupt`].
//! Everything here is fatal for the request that produced it.

use thiserror::Error;

use crate::core::Address;
use crate::reconcile::PatchError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced to the hosting layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported request method: {0}")]
    UnsupportedMethod(String),

    /// Two siblings share a key in a freshly built tree.
    #[error("duplicate sibling key `{key}` under {address:?}")]
    DuplicateKey { key: String, address: Address },

    #[error("view kept requesting reruns ({0} in a single request)")]
    RerunLimit(usize),

    #[error("session store entry `{key}` is malformed")]
    Store {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The async producer behind a blocking stream stopped without finishing.
    #[error("stream producer failed: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedMethod("PUT".into());
        assert_eq!(err.to_string(), "unsupported request method: PUT");

        let err = Error::DuplicateKey {
            key: "k".into(),
            address: vec![0, 2],
        };
        assert!(err.to_string().contains("`k`"));
        assert!(err.to_string().contains("[0, 2]"));
    }
}
