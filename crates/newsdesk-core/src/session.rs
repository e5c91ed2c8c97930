//! Authentication session lifecycle.
//!
//! The manager owns the `{token, user}` pair. It mirrors it to
//! [`LocalStore`] so a restart can restore it, and drops it on logout or
//! when the token is found expired.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use newsdesk_api::token::is_token_expired_at;
use newsdesk_api::{ApiClient, ForgotPasswordRequest, LoginRequest, RegisterRequest, User};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::storage::LocalStore;

/// What to do with a session restored from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Use the cached user as-is.
    TrustCached,
    /// Confirm the token with `GET /user` once after restoring.
    #[default]
    Revalidate,
}

/// Current authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been read yet.
    #[default]
    Uninitialized,
    /// Signed in.
    Authenticated {
        /// Bearer token.
        token: String,
        /// Signed-in user.
        user: User,
    },
    /// Signed out.
    Guest,
}

impl SessionState {
    /// Returns true when signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }
}

/// Registration form values.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password repeated.
    pub password_confirmation: String,
}

/// Owns the session and keeps storage in sync with it.
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: ApiClient,
    store: LocalStore,
    policy: SessionPolicy,
    state: Arc<RwLock<SessionState>>,
}

impl SessionManager {
    /// Creates a manager in the `Uninitialized` state.
    ///
    /// `client` should already carry `store` as its session store so 401s
    /// clear the same storage.
    #[must_use]
    pub fn new(client: ApiClient, store: LocalStore, policy: SessionPolicy) -> Self {
        Self {
            client,
            store,
            policy,
            state: Arc::new(RwLock::new(SessionState::Uninitialized)),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true when signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user()
            .cloned()
    }

    fn set_state(&self, state: SessionState) -> SessionState {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.clone_from(&state);
        state
    }

    fn drop_session(&self) -> SessionState {
        if let Err(e) = self.store.clear_session() {
            warn!("Failed to clear stored session: {e}");
        }
        self.set_state(SessionState::Guest)
    }

    /// Restores the session from storage.
    ///
    /// A missing, expired or unparsable session yields `Guest` with storage
    /// cleared. Under [`SessionPolicy::Revalidate`] a restored token is
    /// checked once against the backend; only a 401 signs the user out.
    pub async fn initialize(&self) -> SessionState {
        self.initialize_at(Utc::now()).await
    }

    /// [`initialize`](Self::initialize) with an explicit clock.
    pub async fn initialize_at(&self, now: DateTime<Utc>) -> SessionState {
        let (token, user) = match (self.store.token(), self.store.user()) {
            (Some(token), Some(user)) if !is_token_expired_at(&token, now) => (token, user),
            (Some(_), _) => {
                info!("Stored session is expired or incomplete, signing out");
                return self.drop_session();
            }
            (None, _) => {
                debug!("No stored session");
                return self.drop_session();
            }
        };

        self.set_state(SessionState::Authenticated {
            token: token.clone(),
            user,
        });

        if self.policy == SessionPolicy::TrustCached {
            return self.state();
        }

        match self.client.current_user().await {
            Ok(fresh) => {
                if let Err(e) = self.store.set_user(&fresh) {
                    warn!("Failed to store refreshed user: {e}");
                }
                self.set_state(SessionState::Authenticated { token, user: fresh })
            }
            Err(e) if e.is_unauthorized() => {
                info!("Stored token was rejected by the backend");
                self.drop_session()
            }
            Err(e) => {
                warn!("Could not revalidate session, keeping cached user: {e}");
                self.state()
            }
        }
    }

    fn establish(&self, token: String, user: User) -> Result<User> {
        self.store.save_session(&token, &user)?;
        info!("Signed in as {}", user.email);
        self.set_state(SessionState::Authenticated {
            token,
            user: user.clone(),
        });
        Ok(user)
    }

    /// Signs in.
    ///
    /// # Errors
    ///
    /// Returns the backend error (401/422) or a storage error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let payload = self
            .client
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.establish(payload.token, payload.user)
    }

    /// Creates an account and signs in.
    ///
    /// # Errors
    ///
    /// Returns the backend error (422 with field errors) or a storage error.
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let payload = self
            .client
            .register(&RegisterRequest {
                name: registration.name.trim().to_string(),
                email: registration.email.trim().to_string(),
                password: registration.password.clone(),
                password_confirmation: registration.password_confirmation.clone(),
            })
            .await?;
        self.establish(payload.token, payload.user)
    }

    /// Signs out. The backend call is best-effort; local state is always
    /// cleared.
    pub async fn logout(&self) -> SessionState {
        if let Err(e) = self.client.logout().await {
            warn!("Logout request failed, clearing local session anyway: {e}");
        }
        info!("Signed out");
        self.drop_session()
    }

    /// Requests a password reset email. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the request fails.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        let message = self
            .client
            .forgot_password(&ForgotPasswordRequest {
                email: email.trim().to_string(),
            })
            .await?;
        Ok(message)
    }

    /// Signs out locally if the current token has expired.
    ///
    /// Returns true if the session was dropped.
    pub fn expire_if_due(&self, now: DateTime<Utc>) -> bool {
        let expired = match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Authenticated { token, .. } => is_token_expired_at(token, now),
            _ => false,
        };
        if expired {
            info!("Session token expired");
            self.drop_session();
        }
        expired
    }

    /// Follows up on a 401 seen elsewhere: the client already cleared
    /// storage, so the in-memory state drops to `Guest` too.
    pub fn handle_unauthorized(&self) {
        if self.is_authenticated() {
            info!("Backend rejected the session");
            self.drop_session();
        }
    }
}
