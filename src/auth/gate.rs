//! Protected page gate
//!
//! ```text
//! Unknown -> CacheChecked -> Redirecting ----------> Denied
//!                         \-> PendingVerification -> Verified
//!                                                 \-> Denied
//! ```
//!
//! Cached profile fields are shown as soon as the cache looks valid; they
//! are not trusted, the provider check still decides the outcome.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use super::provider::{AuthUser, Confirm, IdentityProvider, Navigator, PageView, ProfileEvent, ProfileFeed};
use super::role::dashboard_destination;
use super::session::SessionContext;
use super::subscription::{SubscriptionCloser, SubscriptionHandle};
use super::AuthError;
use crate::config::AuthConfig;

const LOGOUT_PROMPT: &str = "Are you sure you want to logout?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unknown,
    CacheChecked,
    Redirecting,
    PendingVerification,
    Verified,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The user declined the prompt; nothing changed
    Cancelled,
    SignedOut,
    /// Remote sign-out failed; local state was still cleared
    LocalOnly,
}

/// A page that passed the gate.
///
/// Holds the live profile subscription; call [`ProtectedPage::teardown`]
/// (or drop the page) when leaving. The gate also closes it on logout and
/// whenever a later check denies access.
#[derive(Debug)]
pub struct ProtectedPage {
    pub user: AuthUser,
    subscription: Option<SubscriptionHandle>,
}

impl ProtectedPage {
    pub fn subscription(&self) -> Option<&SubscriptionHandle> {
        self.subscription.as_ref()
    }

    pub fn teardown(mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.cancel();
        }
    }
}

pub struct AuthGate {
    config: AuthConfig,
    session: SessionContext,
    provider: Arc<dyn IdentityProvider>,
    feed: Arc<dyn ProfileFeed>,
    view: Arc<dyn PageView>,
    navigator: Arc<dyn Navigator>,
    verify_timeout: Option<Duration>,
    state: GateState,
    /// Closer for the subscription of the last page that passed the gate
    active: Option<SubscriptionCloser>,
}

impl AuthGate {
    pub fn new(
        config: AuthConfig,
        session: SessionContext,
        provider: Arc<dyn IdentityProvider>,
        feed: Arc<dyn ProfileFeed>,
        view: Arc<dyn PageView>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            session,
            provider,
            feed,
            view,
            navigator,
            verify_timeout: None,
            state: GateState::Unknown,
            active: None,
        }
    }

    /// Give up on provider verification after `timeout`. Without one, a
    /// provider that never answers leaves the gate pending.
    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn transition(&mut self, next: GateState) {
        tracing::debug!(from = ?self.state, to = ?next, "Auth gate transition");
        self.state = next;
    }

    /// Stop profile pushes before the cache they write to is cleared
    fn close_subscription(&mut self) {
        if let Some(closer) = self.active.take() {
            tracing::debug!("Closing profile subscription");
            closer.close();
        }
    }

    /// Clear local state and send the user to the login page
    fn deny(&mut self, reason: AuthError) -> AuthError {
        self.transition(GateState::Redirecting);
        self.close_subscription();
        self.session.invalidate();
        self.navigator.replace(&self.config.login_page);
        self.transition(GateState::Denied);
        reason
    }

    /// Gate a protected page.
    ///
    /// A missing or invalid cache is rejected before the provider is
    /// contacted at all.
    pub async fn protect_page(&mut self) -> Result<ProtectedPage, AuthError> {
        self.transition(GateState::Unknown);
        self.close_subscription();
        tracing::debug!("Checking authentication");

        let cached = self.session.snapshot();
        self.transition(GateState::CacheChecked);

        let Some(email) = cached.usable_email().map(str::to_string) else {
            tracing::info!("Not authenticated, redirecting to login");
            return Err(self.deny(AuthError::NotAuthenticated));
        };

        self.view
            .show_profile(cached.name.as_deref(), Some(email.as_str()), cached.role.as_deref());
        self.transition(GateState::PendingVerification);

        let verification = self.provider.current_user();
        let verified = match self.verify_timeout {
            Some(limit) => tokio::time::timeout(limit, verification)
                .await
                .unwrap_or(Err(AuthError::VerificationTimedOut)),
            None => verification.await,
        };

        let user = match verified {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Provider has no session, redirecting to login");
                return Err(self.deny(AuthError::NotAuthenticated));
            }
            Err(e) => {
                tracing::warn!("Session verification failed: {}", e);
                return Err(self.deny(e));
            }
        };

        tracing::info!(email = %user.email, "Authenticated");
        self.transition(GateState::Verified);
        let subscription = self.subscribe(&user).await;
        self.active = subscription.as_ref().map(SubscriptionHandle::closer);

        Ok(ProtectedPage { user, subscription })
    }

    /// Mirror the user's profile document into the session and the page
    async fn subscribe(&self, user: &AuthUser) -> Option<SubscriptionHandle> {
        let mut events = match self.feed.watch(&user.email).await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Error listening to user data: {}", e);
                return None;
            }
        };

        let session = self.session.clone();
        let view = Arc::clone(&self.view);
        let fallback_email = user.email.clone();

        Some(SubscriptionHandle::spawn(move |liveness| async move {
            while let Some(event) = events.next().await {
                match event {
                    ProfileEvent::Snapshot(Some(document)) => {
                        let profile = document.resolve(&fallback_email);
                        tracing::debug!(
                            name = %profile.name,
                            email = %profile.email,
                            role = %profile.role,
                            "User data updated"
                        );
                        let applied = liveness.run_if_open(|| {
                            session.update_profile(&profile);
                            view.show_profile(
                                Some(profile.name.as_str()),
                                Some(profile.email.as_str()),
                                Some(profile.role.as_str()),
                            );
                        });
                        if !applied {
                            break;
                        }
                    }
                    ProfileEvent::Snapshot(None) => {
                        tracing::debug!("User profile document does not exist");
                    }
                    ProfileEvent::Error(e) => {
                        tracing::error!("Error listening to user data: {}", e);
                    }
                }
            }
        }))
    }

    /// Navigate to the dashboard for the cached role
    pub fn go_to_dashboard(&self) -> &str {
        let role = self.session.user_role();
        let destination = dashboard_destination(role.as_deref(), &self.config);
        tracing::info!(role = ?role, destination, "Opening dashboard");
        self.navigator.assign(destination);
        destination
    }

    /// Sign out after confirmation.
    ///
    /// Local state is cleared and the user lands on the login page even
    /// when the provider sign-out fails.
    pub async fn logout(&mut self, confirm: &dyn Confirm) -> LogoutOutcome {
        if !confirm.confirm(LOGOUT_PROMPT) {
            return LogoutOutcome::Cancelled;
        }

        tracing::info!("Logging out");
        self.close_subscription();
        self.session.invalidate();

        let outcome = match self.provider.sign_out().await {
            Ok(()) => {
                tracing::info!("Logged out successfully");
                LogoutOutcome::SignedOut
            }
            Err(e) => {
                tracing::error!("Logout error: {}", e);
                LogoutOutcome::LocalOnly
            }
        };

        self.navigator.replace(&self.config.login_page);
        self.transition(GateState::Unknown);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::ProfileDocument;
    use crate::auth::session::{CachedIdentity, MemoryStore, Profile, SessionStore};
    use async_trait::async_trait;
    use futures::channel::mpsc;
    use futures::stream::BoxStream;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockProvider {
        user: Option<AuthUser>,
        hang: bool,
        sign_out_fails: bool,
        verify_calls: AtomicUsize,
        sign_out_calls: AtomicUsize,
    }

    impl MockProvider {
        fn signed_in() -> Self {
            Self {
                user: Some(AuthUser {
                    uid: "uid-1".to_string(),
                    email: "sara@example.edu".to_string(),
                }),
                hang: false,
                sign_out_fails: false,
                verify_calls: AtomicUsize::new(0),
                sign_out_calls: AtomicUsize::new(0),
            }
        }

        fn signed_out() -> Self {
            Self {
                user: None,
                ..Self::signed_in()
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for MockProvider {
        async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            Ok(self.user.clone())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
            if self.sign_out_fails {
                Err(AuthError::Provider("network down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Feed backed by a channel the test pushes into
    struct ChannelFeed {
        events: Mutex<Option<mpsc::UnboundedReceiver<ProfileEvent>>>,
        watched: Mutex<Vec<String>>,
    }

    impl ChannelFeed {
        fn new() -> (Self, mpsc::UnboundedSender<ProfileEvent>) {
            let (tx, rx) = mpsc::unbounded();
            let feed = Self {
                events: Mutex::new(Some(rx)),
                watched: Mutex::new(Vec::new()),
            };
            (feed, tx)
        }
    }

    #[async_trait]
    impl ProfileFeed for ChannelFeed {
        async fn watch(&self, email: &str) -> Result<BoxStream<'static, ProfileEvent>, AuthError> {
            self.watched.lock().push(email.to_string());
            self.events
                .lock()
                .take()
                .map(|rx| rx.boxed())
                .ok_or_else(|| AuthError::Feed("already watched".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingView {
        shown: Mutex<Vec<(Option<String>, Option<String>, Option<String>)>>,
    }

    impl PageView for RecordingView {
        fn show_profile(&self, name: Option<&str>, email: Option<&str>, role: Option<&str>) {
            self.shown.lock().push((
                name.map(str::to_string),
                email.map(str::to_string),
                role.map(str::to_string),
            ));
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<(&'static str, String)>>,
    }

    impl Navigator for RecordingNavigator {
        fn assign(&self, url: &str) {
            self.visits.lock().push(("assign", url.to_string()));
        }

        fn replace(&self, url: &str) {
            self.visits.lock().push(("replace", url.to_string()));
        }
    }

    struct Harness {
        gate: AuthGate,
        provider: Arc<MockProvider>,
        feed: Arc<ChannelFeed>,
        view: Arc<RecordingView>,
        navigator: Arc<RecordingNavigator>,
        session_store: Arc<MemoryStore>,
        local_store: Arc<MemoryStore>,
        events: mpsc::UnboundedSender<ProfileEvent>,
    }

    fn harness(provider: MockProvider) -> Harness {
        let provider = Arc::new(provider);
        let (feed, events) = ChannelFeed::new();
        let feed = Arc::new(feed);
        let view = Arc::new(RecordingView::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let session_store = Arc::new(MemoryStore::new());
        let local_store = Arc::new(MemoryStore::new());
        let session = SessionContext::new(session_store.clone(), local_store.clone());

        let gate = AuthGate::new(
            AuthConfig::default(),
            session,
            provider.clone(),
            feed.clone(),
            view.clone(),
            navigator.clone(),
        );
        Harness {
            gate,
            provider,
            feed,
            view,
            navigator,
            session_store,
            local_store,
            events,
        }
    }

    fn sign_in(h: &Harness) {
        h.gate.session().establish(&Profile {
            name: "Sara".to_string(),
            email: "sara@example.edu".to_string(),
            role: "Director".to_string(),
        });
        h.local_store.set("lastPage", "dashboard");
    }

    async fn wait_for(mut done: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_cache_miss_redirects_without_network() {
        let mut h = harness(MockProvider::signed_in());
        h.local_store.set("lastPage", "dashboard");

        let result = h.gate.protect_page().await;

        assert_eq!(result.unwrap_err(), AuthError::NotAuthenticated);
        assert_eq!(h.gate.state(), GateState::Denied);
        assert_eq!(h.provider.verify_calls.load(Ordering::SeqCst), 0);
        assert!(h.local_store.is_empty());
        assert_eq!(
            h.navigator.visits.lock().as_slice(),
            &[("replace", "login.html".to_string())]
        );
        assert!(h.view.shown.lock().is_empty());
    }

    #[tokio::test]
    async fn test_flag_not_true_redirects() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        h.session_store.set(crate::auth::session::KEY_AUTHENTICATED, "false");

        assert!(h.gate.protect_page().await.is_err());
        assert_eq!(h.provider.verify_calls.load(Ordering::SeqCst), 0);
        assert!(h.session_store.is_empty());
    }

    #[tokio::test]
    async fn test_verified_session_renders_cache_then_subscribes() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);

        let page = h.gate.protect_page().await.unwrap();

        assert_eq!(h.gate.state(), GateState::Verified);
        assert_eq!(page.user.email, "sara@example.edu");
        assert!(page.subscription().is_some());
        assert_eq!(h.feed.watched.lock().as_slice(), &["sara@example.edu".to_string()]);
        assert_eq!(
            h.view.shown.lock()[0],
            (
                Some("Sara".to_string()),
                Some("sara@example.edu".to_string()),
                Some("Director".to_string())
            )
        );
        assert!(h.navigator.visits.lock().is_empty());
        page.teardown();
    }

    #[tokio::test]
    async fn test_profile_updates_refresh_session_and_view() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        let page = h.gate.protect_page().await.unwrap();

        h.events
            .unbounded_send(ProfileEvent::Snapshot(Some(ProfileDocument {
                name: Some("Sara Ali".to_string()),
                email: None,
                role: Some("admin".to_string()),
            })))
            .unwrap();

        let session = h.gate.session().clone();
        wait_for(|| session.snapshot().name.as_deref() == Some("Sara Ali")).await;

        let identity = session.snapshot();
        assert_eq!(identity.email.as_deref(), Some("sara@example.edu"));
        assert_eq!(identity.role.as_deref(), Some("admin"));
        assert!(identity.authenticated);

        let view = h.view.clone();
        wait_for(|| view.shown.lock().len() == 2).await;
        assert_eq!(view.shown.lock()[1].0.as_deref(), Some("Sara Ali"));

        assert_eq!(h.gate.go_to_dashboard(), "admin-dashboard.html");
        page.teardown();
    }

    #[tokio::test]
    async fn test_missing_document_and_errors_are_ignored() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        let _page = h.gate.protect_page().await.unwrap();

        h.events.unbounded_send(ProfileEvent::Snapshot(None)).unwrap();
        h.events
            .unbounded_send(ProfileEvent::Error("permission denied".to_string()))
            .unwrap();
        h.events
            .unbounded_send(ProfileEvent::Snapshot(Some(ProfileDocument::default())))
            .unwrap();

        let session = h.gate.session().clone();
        wait_for(|| session.snapshot().name.as_deref() == Some("User")).await;
        assert_eq!(session.snapshot().role.as_deref(), Some("User"));
    }

    #[tokio::test]
    async fn test_teardown_releases_subscription() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        let page = h.gate.protect_page().await.unwrap();

        page.teardown();
        let events = h.events.clone();
        wait_for(|| events.is_closed()).await;
    }

    #[tokio::test]
    async fn test_provider_rejects_session() {
        let mut h = harness(MockProvider::signed_out());
        sign_in(&h);

        let result = h.gate.protect_page().await;

        assert_eq!(result.unwrap_err(), AuthError::NotAuthenticated);
        assert_eq!(h.gate.state(), GateState::Denied);
        assert_eq!(h.provider.verify_calls.load(Ordering::SeqCst), 1);
        assert!(h.session_store.is_empty());
        assert!(h.local_store.is_empty());
        assert_eq!(
            h.navigator.visits.lock().as_slice(),
            &[("replace", "login.html".to_string())]
        );
        assert!(h.feed.watched.lock().is_empty());
    }

    #[tokio::test]
    async fn test_verification_timeout_denies() {
        let h = harness(MockProvider {
            hang: true,
            ..MockProvider::signed_in()
        });
        sign_in(&h);
        let mut gate = h.gate.with_verify_timeout(Duration::from_millis(20));

        let result = gate.protect_page().await;

        assert_eq!(result.unwrap_err(), AuthError::VerificationTimedOut);
        assert_eq!(gate.state(), GateState::Denied);
        assert!(h.session_store.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_routing() {
        let h = harness(MockProvider::signed_in());
        assert_eq!(h.gate.go_to_dashboard(), "all-requests-d.html");

        sign_in(&h);
        assert_eq!(h.gate.go_to_dashboard(), "director-dashboard.html");
        assert_eq!(
            h.navigator.visits.lock().last().cloned(),
            Some(("assign", "director-dashboard.html".to_string()))
        );
    }

    #[tokio::test]
    async fn test_logout_cancelled() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);

        let outcome = h.gate.logout(&|_: &str| false).await;

        assert_eq!(outcome, LogoutOutcome::Cancelled);
        assert!(h.gate.session().snapshot().authenticated);
        assert_eq!(h.provider.sign_out_calls.load(Ordering::SeqCst), 0);
        assert!(h.navigator.visits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_logout_confirmed() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);

        let outcome = h.gate.logout(&|prompt: &str| prompt == LOGOUT_PROMPT).await;

        assert_eq!(outcome, LogoutOutcome::SignedOut);
        assert!(h.session_store.is_empty());
        assert!(h.local_store.is_empty());
        assert_eq!(h.provider.sign_out_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.navigator.visits.lock().as_slice(),
            &[("replace", "login.html".to_string())]
        );
    }

    fn director_push() -> ProfileEvent {
        ProfileEvent::Snapshot(Some(ProfileDocument {
            name: Some("Sara".to_string()),
            email: None,
            role: Some("director".to_string()),
        }))
    }

    #[tokio::test]
    async fn test_push_after_logout_does_not_repopulate_cache() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        let page = h.gate.protect_page().await.unwrap();
        assert_eq!(h.view.shown.lock().len(), 1);

        h.gate.logout(&|_: &str| true).await;
        assert!(h.session_store.is_empty());

        // The page is still alive, only the gate knows the user left
        let _ = h.events.unbounded_send(director_push());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(h.session_store.is_empty());
        assert_eq!(h.gate.session().snapshot(), CachedIdentity::default());
        assert_eq!(h.view.shown.lock().len(), 1);
        assert_eq!(h.gate.go_to_dashboard(), "all-requests-d.html");
        page.teardown();
    }

    #[tokio::test]
    async fn test_denied_recheck_closes_previous_subscription() {
        let mut h = harness(MockProvider::signed_in());
        sign_in(&h);
        let page = h.gate.protect_page().await.unwrap();

        h.session_store.set(crate::auth::session::KEY_AUTHENTICATED, "false");
        assert_eq!(h.gate.protect_page().await.unwrap_err(), AuthError::NotAuthenticated);

        let _ = h.events.unbounded_send(director_push());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(h.session_store.is_empty());
        assert_eq!(h.view.shown.lock().len(), 1);
        drop(page);
    }

    #[tokio::test]
    async fn test_logout_when_sign_out_fails() {
        let mut h = harness(MockProvider {
            sign_out_fails: true,
            ..MockProvider::signed_in()
        });
        sign_in(&h);

        let outcome = h.gate.logout(&|_: &str| true).await;

        assert_eq!(outcome, LogoutOutcome::LocalOnly);
        assert!(h.session_store.is_empty());
        assert_eq!(
            h.navigator.visits.lock().as_slice(),
            &[("replace", "login.html".to_string())]
        );
    }
}
