//! Auth gate for protected dashboard pages
//!
//! Authentication itself belongs to an external identity provider. This
//! module only decides whether a page may render, keeps the cached profile
//! fields in sync with the provider's profile document, and handles role
//! routing and logout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut gate = AuthGate::new(config.auth, session, provider, feed, view, navigator);
//! let page = gate.protect_page().await?;
//! // ... page is live, profile updates flow into `session` and `view`
//! page.teardown();
//! ```

mod gate;
mod provider;
mod role;
mod session;
mod subscription;

pub use gate::{AuthGate, GateState, LogoutOutcome, ProtectedPage};
pub use provider::{
    AuthUser, Confirm, IdentityProvider, Navigator, PageView, ProfileDocument, ProfileEvent, ProfileFeed,
};
pub use role::{dashboard_destination, Role};
pub use session::{
    CachedIdentity, MemoryStore, Profile, SessionContext, SessionStore, KEY_AUTHENTICATED, KEY_EMAIL,
    KEY_NAME, KEY_ROLE,
};
pub use subscription::SubscriptionHandle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session verification timed out")]
    VerificationTimedOut,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Profile feed error: {0}")]
    Feed(String),
}
