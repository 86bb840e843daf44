//! Client session context
//!
//! Cached identity fields live in two key/value stores, mirroring browser
//! session and local storage. Page code gets a [`SessionContext`] passed in
//! instead of reaching for ambient globals.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub const KEY_EMAIL: &str = "userEmail";
pub const KEY_NAME: &str = "userName";
pub const KEY_ROLE: &str = "userRole";
pub const KEY_AUTHENTICATED: &str = "isAuthenticated";

/// Key/value persistence
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self);
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

/// A user's profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// What the session cache currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedIdentity {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    /// True only when the flag is stored as exactly `"true"`
    pub authenticated: bool,
}

impl CachedIdentity {
    /// Email of a usable cached identity
    pub fn usable_email(&self) -> Option<&str> {
        match (self.authenticated, self.email.as_deref()) {
            (true, Some(email)) if !email.is_empty() => Some(email),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionContext {
    session: Arc<dyn SessionStore>,
    local: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(session: Arc<dyn SessionStore>, local: Arc<dyn SessionStore>) -> Self {
        Self { session, local }
    }

    /// Context backed by fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn snapshot(&self) -> CachedIdentity {
        CachedIdentity {
            email: self.session.get(KEY_EMAIL),
            name: self.session.get(KEY_NAME),
            role: self.session.get(KEY_ROLE),
            authenticated: self.session.get(KEY_AUTHENTICATED).as_deref() == Some("true"),
        }
    }

    pub fn user_role(&self) -> Option<String> {
        self.session.get(KEY_ROLE)
    }

    /// Record a successful sign-in
    pub fn establish(&self, profile: &Profile) {
        self.update_profile(profile);
        self.session.set(KEY_AUTHENTICATED, "true");
    }

    /// Overwrite the cached profile fields
    pub fn update_profile(&self, profile: &Profile) {
        self.session.set(KEY_NAME, &profile.name);
        self.session.set(KEY_EMAIL, &profile.email);
        self.session.set(KEY_ROLE, &profile.role);
    }

    /// Drop everything held in session and local storage
    pub fn invalidate(&self) {
        self.session.clear();
        self.local.clear();
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("identity", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: "Sara".to_string(),
            email: "sara@example.edu".to_string(),
            role: "Director".to_string(),
        }
    }

    #[test]
    fn test_empty_session_is_unauthenticated() {
        let ctx = SessionContext::in_memory();
        let identity = ctx.snapshot();
        assert_eq!(identity, CachedIdentity::default());
        assert_eq!(identity.usable_email(), None);
    }

    #[test]
    fn test_establish_and_snapshot() {
        let ctx = SessionContext::in_memory();
        ctx.establish(&profile());

        let identity = ctx.snapshot();
        assert!(identity.authenticated);
        assert_eq!(identity.usable_email(), Some("sara@example.edu"));
        assert_eq!(identity.name.as_deref(), Some("Sara"));
        assert_eq!(ctx.user_role().as_deref(), Some("Director"));
    }

    #[test]
    fn test_flag_must_be_exactly_true() {
        let session = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(session.clone(), Arc::new(MemoryStore::new()));
        session.set(KEY_EMAIL, "a@b.c");

        session.set(KEY_AUTHENTICATED, "TRUE");
        assert_eq!(ctx.snapshot().usable_email(), None);

        session.set(KEY_AUTHENTICATED, "true");
        assert_eq!(ctx.snapshot().usable_email(), Some("a@b.c"));
    }

    #[test]
    fn test_invalidate_clears_both_stores() {
        let session = Arc::new(MemoryStore::new());
        let local = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(session.clone(), local.clone());
        ctx.establish(&profile());
        local.set("theme", "dark");

        ctx.invalidate();
        assert!(session.is_empty());
        assert!(local.is_empty());
    }
}
