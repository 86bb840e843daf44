//! External collaborators of the auth gate
//!
//! The identity provider, its profile document store and the page the gate
//! runs in are all consumed through these traits.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Deserialize;

use super::session::Profile;
use super::AuthError;

/// A session the identity provider vouches for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Per-user profile document as stored by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ProfileDocument {
    /// Fill gaps: name and role default to `"User"`, email to the signed-in user's
    pub fn resolve(&self, fallback_email: &str) -> Profile {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        Profile {
            name: present(&self.name).unwrap_or_else(|| "User".to_string()),
            email: present(&self.email).unwrap_or_else(|| fallback_email.to_string()),
            role: present(&self.role).unwrap_or_else(|| "User".to_string()),
        }
    }
}

/// One push from the profile feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    /// Current document contents; `None` when the document does not exist
    Snapshot(Option<ProfileDocument>),
    Error(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the provider's view of the current session
    async fn current_user(&self) -> Result<Option<AuthUser>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[async_trait]
pub trait ProfileFeed: Send + Sync {
    /// Live updates of the profile document keyed by `email`
    async fn watch(&self, email: &str) -> Result<BoxStream<'static, ProfileEvent>, AuthError>;
}

/// Page elements showing the signed-in user
pub trait PageView: Send + Sync {
    fn show_profile(&self, name: Option<&str>, email: Option<&str>, role: Option<&str>);
}

pub trait Navigator: Send + Sync {
    /// Navigate, keeping the current page in history
    fn assign(&self, url: &str);

    /// Navigate, replacing the current history entry
    fn replace(&self, url: &str);
}

/// Interactive yes/no prompt
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}
