//! `[lifecycle]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [lifecycle]
//! max_reruns = 32     # Reruns allowed per request, 0 = unlimited
//! ```

use serde::{Deserialize, Serialize};

/// Request lifecycle limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Reruns allowed within one request before failing it.
    /// `0` disables the guard.
    pub max_reruns: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self { max_reruns: 32 }
    }
}

impl LifecycleConfig {
    /// Would the `count`-th rerun exceed the limit?
    #[inline]
    pub fn exceeded(&self, count: usize) -> bool {
        self.max_reruns != 0 && count > self.max_reruns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_lifecycle_config() {
        let config = test_parse_config("[lifecycle]\nmax_reruns = 3");
        assert_eq!(config.lifecycle.max_reruns, 3);
        assert!(!config.lifecycle.exceeded(3));
        assert!(config.lifecycle.exceeded(4));
    }

    #[test]
    fn test_zero_disables_guard() {
        let lifecycle = LifecycleConfig { max_reruns: 0 };
        assert!(!lifecycle.exceeded(usize::MAX));
    }
}
