// src/stores/auth.rs
//! Login state. The token and user live in the shared [`Session`]; this store
//! only adds the loading flag and the last error message on top.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::Session;
use crate::error::{ApiError, ApiResult};
use crate::services::AuthService;
use crate::types::User;

pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct LocalState {
    is_loading: bool,
    error: Option<String>,
}

pub struct AuthStore {
    service: AuthService,
    session: Arc<Session>,
    local: RwLock<LocalState>,
}

impl AuthStore {
    pub fn new(service: AuthService, session: Arc<Session>) -> Self {
        Self {
            service,
            session,
            local: RwLock::new(LocalState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        let snapshot = self.session.snapshot();
        let local = self.local.read();
        AuthState {
            is_authenticated: snapshot.is_authenticated(),
            user: snapshot.user,
            token: snapshot.token,
            is_loading: local.is_loading,
            error: local.error.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.session.snapshot().user
    }

    pub fn error(&self) -> Option<String> {
        self.local.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.local.write().error = None;
    }

    fn begin(&self) {
        let mut local = self.local.write();
        local.is_loading = true;
        local.error = None;
    }

    fn finish(&self, error: Option<String>) {
        let mut local = self.local.write();
        local.is_loading = false;
        local.error = error;
    }

    /// Register a client account, then log straight in with the same
    /// credentials. An account created before a failed login stays created.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<User> {
        self.begin();

        if let Err(e) = self.service.signup(name, email, password).await {
            warn!("auth/signup failed for {}: {}", email, e);
            self.finish(Some(e.message_or(SIGNUP_FAILED_MESSAGE)));
            return Err(e);
        }
        info!("auth/signup/success {}", email);

        match self.authenticate(email, password).await {
            Ok(user) => {
                self.finish(None);
                Ok(user)
            }
            Err(e) => {
                self.finish(Some(e.message_or(SIGNUP_FAILED_MESSAGE)));
                Err(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.begin();
        match self.authenticate(email, password).await {
            Ok(user) => {
                self.finish(None);
                Ok(user)
            }
            Err(e) => {
                warn!("auth/login failed for {}: {}", email, e);
                self.finish(Some(e.message_or(LOGIN_FAILED_MESSAGE)));
                Err(e)
            }
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> ApiResult<User> {
        let response = self.service.login(email, password).await?;
        self.session
            .establish(&response.token, &response.user)
            .await
            .map_err(|e| ApiError::Request {
                message: format!("Failed to store session: {:#}", e),
            })?;
        info!("auth/login/success user={}", response.user.id);
        Ok(response.user)
    }

    pub async fn logout(&self) {
        self.session.clear().await;
        self.finish(None);
    }

    /// Restore a persisted session if its token is still valid; log out
    /// otherwise. Returns the resulting authentication state.
    pub async fn check_auth(&self) -> bool {
        if self.session.hydrate().await {
            true
        } else {
            self.logout().await;
            false
        }
    }
}
