// src/core/session.rs
//! Persisted authentication state shared by the HTTP client and the auth store.
//!
//! Storage layout mirrors what the browser build kept in local storage: the raw
//! bearer token under `token`, the JSON user under `user`, and the combined
//! auth snapshot under `auth-storage`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth;
use crate::types::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

pub const LOGIN_ROUTE: &str = "/auth";

// ===== Storage backends =====

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Key/value strings kept as one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse session file: {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read session file: {}", self.path.display())),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

// ===== Redirect guard =====

pub type RedirectHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Sends the user to the login view at most once until re-armed.
pub struct RedirectGuard {
    target: String,
    fired: AtomicBool,
    count: AtomicUsize,
    hook: Option<RedirectHook>,
}

impl RedirectGuard {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            fired: AtomicBool::new(false),
            count: AtomicUsize::new(0),
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: RedirectHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns `true` if this call performed the redirect.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.count.fetch_add(1, Ordering::SeqCst);
        info!("Redirecting to {}", self.target);
        if let Some(hook) = &self.hook {
            hook(&self.target);
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    pub fn redirect_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn rearm(&self) {
        self.fired.store(false, Ordering::SeqCst);
    }
}

impl Default for RedirectGuard {
    fn default() -> Self {
        Self::new(LOGIN_ROUTE)
    }
}

// ===== Session =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuthState {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
}

#[derive(Serialize, Deserialize)]
struct PersistedEnvelope {
    state: PersistedAuthState,
    version: u32,
}

pub struct Session {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<SessionSnapshot>,
    redirect: RedirectGuard,
}

impl Session {
    pub fn new(storage: Arc<dyn SessionStorage>, redirect: RedirectGuard) -> Self {
        Self {
            storage,
            current: RwLock::new(SessionSnapshot::default()),
            redirect,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), RedirectGuard::default())
    }

    pub fn redirect(&self) -> &RedirectGuard {
        &self.redirect
    }

    /// In-memory view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_authenticated()
    }

    /// The token currently persisted, regardless of expiry.
    pub async fn persisted_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read persisted token: {:#}", e);
                None
            }
        }
    }

    pub async fn persisted_user(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read persisted user: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable persisted user: {}", e);
                None
            }
        }
    }

    /// Persist a fresh login and make it the in-memory session. Either all
    /// three keys are written or none are left behind.
    pub async fn establish(&self, token: &str, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        let envelope = PersistedEnvelope {
            state: PersistedAuthState {
                user: Some(user.clone()),
                token: Some(token.to_string()),
                is_authenticated: true,
            },
            version: 0,
        };
        let envelope_json = serde_json::to_string(&envelope)?;

        if let Err(e) = self.persist(token, &user_json, &envelope_json).await {
            warn!("Session write failed, discarding partial state: {:#}", e);
            self.clear().await;
            return Err(e);
        }

        *self.current.write() = SessionSnapshot {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        };
        self.redirect.rearm();
        debug!("Session established for user {}", user.id);
        Ok(())
    }

    async fn persist(&self, token: &str, user_json: &str, envelope_json: &str) -> Result<()> {
        self.storage.set(TOKEN_KEY, token).await?;
        self.storage.set(USER_KEY, user_json).await?;
        self.storage.set(AUTH_STORAGE_KEY, envelope_json).await
    }

    /// Restore the in-memory session from storage when the persisted token is
    /// present and unexpired. Returns whether the session is now authenticated.
    pub async fn hydrate(&self) -> bool {
        let token = self.persisted_token().await;
        let user = self.persisted_user().await;

        match (token, user) {
            (Some(token), Some(user)) if !auth::is_token_expired(&token) => {
                *self.current.write() = SessionSnapshot {
                    token: Some(token),
                    user: Some(user),
                };
                true
            }
            _ => false,
        }
    }

    /// Drop persisted and in-memory auth state. Safe to call repeatedly.
    pub async fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY, AUTH_STORAGE_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!("Failed to remove '{}' from session storage: {:#}", key, e);
            }
        }
        *self.current.write() = SessionSnapshot::default();
    }

    /// Clear the session and send the user to the login view (once).
    pub async fn force_logout(&self, reason: &str) {
        warn!("Forcing logout: {}", reason);
        self.clear().await;
        self.redirect.fire();
    }
}
