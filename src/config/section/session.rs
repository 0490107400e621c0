//! `[session]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [session]
//! cookie = "ROUTELIT_SESSION_ID"                 # Session id cookie
//! clear_param = "__routelit_clear_session_state" # Query flag purging the route
//! fragment_param = "__fragment"                  # Query fallback for fragment ids
//! ```

use serde::{Deserialize, Serialize};

/// Session naming settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie holding the session id.
    pub cookie: String,

    /// Query parameter that purges persisted data for the session+route.
    pub clear_param: String,

    /// Query parameter read when the payload carries no `fragmentId`.
    pub fragment_param: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: "ROUTELIT_SESSION_ID".into(),
            clear_param: "__routelit_clear_session_state".into(),
            fragment_param: crate::app::FRAGMENT_PARAM.into(),
        }
    }
}
