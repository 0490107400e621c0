//! Derived element ids.
//!
//! | Kind       | Format                        | Stable across                 |
//! |------------|-------------------------------|-------------------------------|
//! | non-widget | `{prefix}_{name}_{counter}`   | identical construction order  |
//! | widget     | `{prefix}_{name}_{hash8}`     | identical label text          |
//!
//! `hash8` is the first 8 hex characters of SHA-256 over the label, so ids
//! match any other client or server using the same scheme.

use sha2::{Digest, Sha256};

/// First 8 hex characters of the SHA-256 digest of `label`.
#[inline]
pub fn hash8(label: &str) -> String {
    let digest = Sha256::digest(label.as_bytes());
    hex::encode(&digest[..4])
}

/// Id of the `counter`-th unkeyed non-widget `name` in a scope.
#[inline]
pub fn text_id(prefix: &str, name: &str, counter: usize) -> String {
    format!("{prefix}_{name}_{counter}")
}

/// Id of an unkeyed widget labelled `label`.
#[inline]
pub fn widget_id(prefix: &str, name: &str, label: &str) -> String {
    format!("{prefix}_{name}_{}", hash8(label))
}
