//! Session ids and per-session request serialisation.
//!
//! The controller does not lock across its read-modify-write of session
//! data, so the host runs at most one request per session at a time.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tiny_http::Request;

/// One mutex per session id.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Lock for `session_id`, created on first use.
    pub fn get(&self, session_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(&self.locks.entry(session_id.to_string()).or_default())
    }

    /// Hand back a lock from [`get`](Self::get); evicts it once unused.
    pub fn release(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks.remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Session id from the `cookie` cookie, or a fresh one.
///
/// The flag is `true` when the id was just minted and must be set.
pub fn session_id(request: &Request, cookie: &str) -> (String, bool) {
    match header(request, "Cookie").and_then(|raw| find_cookie(raw, cookie)) {
        Some(id) => (id.to_string(), false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    }
}

/// `Set-Cookie` value for a freshly minted id.
pub fn set_cookie(cookie: &str, session_id: &str) -> String {
    format!("{cookie}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn header<'a>(request: &'a Request, name: &'static str) -> Option<&'a str> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str())
}

fn find_cookie<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie() {
        let raw = "theme=dark; ROUTELIT_SESSION_ID=abc-123; x=";
        assert_eq!(find_cookie(raw, "ROUTELIT_SESSION_ID"), Some("abc-123"));
        assert_eq!(find_cookie(raw, "theme"), Some("dark"));
        assert_eq!(find_cookie(raw, "x"), None);
        assert_eq!(find_cookie(raw, "missing"), None);
    }

    #[test]
    fn test_session_locks_are_shared_per_id() {
        let locks = SessionLocks::default();
        let a = locks.get("a");
        let again = locks.get("a");
        let b = locks.get("b");
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));

        let _guard = a.lock();
        assert!(again.try_lock().is_none());
        assert!(b.try_lock().is_some());
    }

    #[test]
    fn test_session_locks_evicted_after_release() {
        let locks = SessionLocks::default();
        let first = locks.get("a");
        let second = locks.get("a");

        locks.release("a", first);
        assert_eq!(locks.len(), 1, "still held by another request");

        locks.release("a", second);
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn test_set_cookie() {
        assert_eq!(set_cookie("sid", "42"), "sid=42; Path=/; HttpOnly; SameSite=Lax");
    }
}
