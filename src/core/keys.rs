//! Session key derivation.
//!
//! All persisted data for one session on one route lives under a common
//! namespace `{session_id}:{host}{path}`:
//!
//! | Field       | Key                                        |
//! |-------------|--------------------------------------------|
//! | `tree`      | `{ns}`                                     |
//! | `state`     | `{ns}:state`                               |
//! | `fragments` | `{ns}:fragments:addresses`                 |
//! | `params`    | `{ns}:fragments:params`                    |

use url::Url;

/// The four store keys owned by one session+route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKeys {
    pub tree: String,
    pub state: String,
    pub fragments: String,
    pub params: String,
}

impl SessionKeys {
    /// Keys for `session_id` on `host` + `pathname`.
    pub fn new(session_id: &str, host: &str, pathname: &str) -> Self {
        let ns = format!("{session_id}:{host}{pathname}");
        Self {
            state: format!("{ns}:state"),
            fragments: format!("{ns}:fragments:addresses"),
            params: format!("{ns}:fragments:params"),
            tree: ns,
        }
    }

    /// Keys for the page the client navigated away from.
    ///
    /// Falls back to `host` + `pathname` when the referrer is missing,
    /// unparseable, or lacks a host or path.
    pub fn from_referrer(session_id: &str, referrer: Option<&str>, host: &str, pathname: &str) -> Self {
        match referrer.and_then(referrer_host_path) {
            Some((ref_host, ref_path)) => Self::new(session_id, &ref_host, &ref_path),
            None => Self::new(session_id, host, pathname),
        }
    }

    /// All four keys, tree first.
    pub fn all(&self) -> [&str; 4] {
        [&self.tree, &self.state, &self.fragments, &self.params]
    }
}

/// `host[:port]` and path of an absolute referrer URL.
fn referrer_host_path(referrer: &str) -> Option<(String, String)> {
    let url = Url::parse(referrer).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let path = url.path();
    if path.is_empty() {
        return None;
    }
    let netloc = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Some((netloc, path.to_string()))
}
