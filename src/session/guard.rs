use crate::api::backend::{Backend, FormFields};
use crate::api::context::AuthContext;
use crate::api::envelope;
use crate::crypto::token;
use crate::error::{AppError, Result};
use crate::models::permissions::Permissions;
use crate::models::session::{LoginProfile, Session, SessionUpdate, SubscriptionGate};
use crate::notice::Route;
use crate::session::clock::Clock;
use crate::session::store::SessionStore;
use crate::validation::forms::{LoginForm, validate_form};

/// Backend endpoint that exchanges credentials for a profile.
pub const LOGIN_ENDPOINT: &str = "login";

/// Default sliding session timeout: 8 hours.
pub const DEFAULT_SESSION_TIMEOUT_MS: i64 = 8 * 60 * 60 * 1000;

/// Owns the authenticated user's lifecycle.
///
/// Validity is always `now - last_refresh <= timeout`, evaluated against
/// the clock at call time. [`SessionGuard::current`] is the read used by
/// real work and slides the deadline; [`SessionGuard::restore_session`] and
/// [`SessionGuard::is_authenticated`] only probe.
pub struct SessionGuard<B, S, C> {
    backend: B,
    store: S,
    clock: C,
    timeout_ms: i64,
    session: Option<Session>,
    refreshed_at: i64,
}

impl<B: Backend, S: SessionStore, C: Clock> SessionGuard<B, S, C> {
    /// Creates a guard with no active session.
    ///
    /// # Arguments
    ///
    /// * `backend` - Used for the login call.
    /// * `store` - Encrypted persistence for the session.
    /// * `clock` - Wall-clock source for expiry.
    /// * `timeout_ms` - Sliding timeout, usually `Config::session_timeout_ms()`.
    pub fn new(backend: B, store: S, clock: C, timeout_ms: i64) -> Self {
        Self {
            backend,
            store,
            clock,
            timeout_ms,
            session: None,
            refreshed_at: 0,
        }
    }

    /// Authenticates against the backend and persists the new session.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Username and password; checked locally first.
    ///
    /// # Returns
    ///
    /// The new `Session`, or `InvalidCredentials` (401 or a rejected login),
    /// `Server` (5xx), `Network` (anything else).
    pub async fn login(&mut self, credentials: &LoginForm) -> Result<Session> {
        validate_form(credentials)?;
        tracing::debug!("🔐 Authenticating user: {}", credentials.username);

        let fields = FormFields::new()
            .text("username", credentials.username.trim())
            .text("password", credentials.password.as_str());

        let body = self
            .backend
            .post_form(LOGIN_ENDPOINT, fields)
            .await
            .map_err(login_error)?;

        let profile: LoginProfile = envelope::decode(&body).map_err(login_error)?;
        if profile.user_id.is_empty() {
            return Err(AppError::Serialization("Login response without user id".to_string()));
        }

        let now = self.clock.now_ms();
        let session = Session::from_login(profile, token::generate_session_id(), now);

        self.store.save(&session, now)?;
        self.session = Some(session.clone());
        self.refreshed_at = now;

        tracing::info!("✅ User authenticated: {}", session.user_id);
        Ok(session)
    }

    /// Loads the persisted session at startup.
    ///
    /// Absent, expired, undecryptable or unparseable state all end as
    /// `None` with persistence cleared. Does not slide the deadline, so
    /// repeated calls return the same answer.
    pub fn restore_session(&mut self) -> Option<Session> {
        let stored = match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::debug!("No persisted session");
                self.drop_session();
                return None;
            }
            Err(e) => {
                tracing::warn!("⚠️ Persisted session rejected (corrupted or tampered): {}", e);
                self.drop_session();
                return None;
            }
        };

        let now = self.clock.now_ms();
        if now - stored.refreshed_at > self.timeout_ms {
            tracing::info!("⌛ Persisted session expired for user: {}", stored.session.user_id);
            self.drop_session();
            return None;
        }

        tracing::debug!("✅ Session restored for user: {}", stored.session.user_id);
        self.refreshed_at = stored.refreshed_at;
        self.session = Some(stored.session.clone());
        Some(stored.session)
    }

    /// Whether a session exists and has not expired right now.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && !self.is_expired(self.clock.now_ms())
    }

    /// Returns the session for actual use, sliding its expiry.
    ///
    /// An expired session is cleared and `None` returned.
    pub fn current(&mut self) -> Option<&Session> {
        let now = self.clock.now_ms();

        if self.session.is_none() {
            return None;
        }

        if self.is_expired(now) {
            tracing::info!("⌛ Session expired");
            self.drop_session();
            return None;
        }

        self.refreshed_at = now;
        if let Some(session) = self.session.as_ref() {
            if let Err(e) = self.store.save(session, now) {
                tracing::error!("❌ Failed to refresh persisted session: {}", e);
            }
        }

        self.session.as_ref()
    }

    /// Identity for a screen controller, or `None` when logged out.
    pub fn context(&mut self) -> Option<AuthContext> {
        self.current().map(AuthContext::from_session)
    }

    /// Permission flags of the current session; empty when logged out.
    pub fn permissions(&self) -> Permissions {
        self.session
            .as_ref()
            .map(|s| s.permissions.clone())
            .unwrap_or_default()
    }

    /// Merges a profile change into the session and re-persists it.
    ///
    /// # Returns
    ///
    /// `false` when there is no valid session or persisting failed.
    pub fn update_user(&mut self, update: SessionUpdate) -> bool {
        let now = self.clock.now_ms();

        if self.session.is_none() || self.is_expired(now) {
            tracing::debug!("update_user without an active session");
            return false;
        }

        let Some(session) = self.session.as_mut() else {
            return false;
        };
        update.apply(session, now);

        match self.store.save(session, now) {
            Ok(()) => {
                self.refreshed_at = now;
                true
            }
            Err(e) => {
                tracing::error!("❌ Failed to persist updated session: {}", e);
                false
            }
        }
    }

    /// Clears the session everywhere and returns the entry route.
    pub fn logout(&mut self) -> Route {
        if let Some(session) = self.session.as_ref() {
            tracing::info!("👋 Logging out user: {}", session.user_id);
        }
        self.drop_session();
        Route::Login
    }

    /// Reacts to an error from a screen: a 401 forces logout, nothing else does.
    pub fn handle_error(&mut self, error: &AppError) -> Option<Route> {
        match error {
            AppError::SessionExpired | AppError::MissingIdentity => Some(self.logout()),
            _ => None,
        }
    }

    /// Subscription gate for the current session; `None` when logged out.
    pub fn subscription_gate(&mut self) -> Option<SubscriptionGate> {
        self.current().map(Session::subscription_gate)
    }

    /// Subscription gate for `session`.
    pub fn check_subscription_gate(session: &Session) -> SubscriptionGate {
        session.subscription_gate()
    }

    fn is_expired(&self, now: i64) -> bool {
        now - self.refreshed_at > self.timeout_ms
    }

    fn drop_session(&mut self) {
        self.store.clear();
        self.session = None;
        self.refreshed_at = 0;
    }
}

/// Login-specific error mapping: any rejection of the credentials is
/// `InvalidCredentials`; 5xx stays a server error; the rest is a network error.
fn login_error(error: AppError) -> AppError {
    match error {
        AppError::SessionExpired | AppError::Backend(_) => AppError::InvalidCredentials,
        e @ (AppError::Server { .. } | AppError::Network(_) | AppError::Serialization(_)) => e,
        other => AppError::Network(other.to_string()),
    }
}
