// src/stores/profile.rs
use parking_lot::RwLock;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::services::ProfileService;
use crate::types::{Profile, ProfileDraft, ProfilePatch};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The signed-in user's own profile.
pub struct ProfileStore {
    service: ProfileService,
    state: RwLock<ProfileState>,
}

impl ProfileStore {
    pub fn new(service: ProfileService) -> Self {
        Self {
            service,
            state: RwLock::new(ProfileState::default()),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.read().clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.read().profile.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn start(&self) {
        let mut state = self.state.write();
        state.is_loading = true;
        state.error = None;
    }

    fn fail(&self, err: &ApiError, fallback: &str) {
        let mut state = self.state.write();
        state.is_loading = false;
        if !err.is_session_expired() {
            state.error = Some(match err {
                ApiError::Decode { .. } => fallback.to_string(),
                other => other.to_string(),
            });
        }
        warn!("profile: {} ({})", fallback, err);
    }

    pub async fn fetch_my_profile(&self) -> ApiResult<Option<Profile>> {
        self.start();
        match self.service.get_my_profile().await {
            Ok(profile) => {
                let mut state = self.state.write();
                state.profile = profile.clone();
                state.is_loading = false;
                Ok(profile)
            }
            Err(e) => {
                self.fail(&e, "Failed to load profile");
                self.state.write().profile = None;
                Err(e)
            }
        }
    }

    pub async fn create_profile(&self, draft: &ProfileDraft) -> ApiResult<Profile> {
        draft.validate().map_err(ApiError::InvalidInput)?;
        self.start();
        match self.service.create_profile(draft).await {
            Ok(profile) => {
                let mut state = self.state.write();
                state.profile = Some(profile.clone());
                state.is_loading = false;
                Ok(profile)
            }
            Err(e) => {
                self.fail(&e, "Profile creation failed");
                Err(e)
            }
        }
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<Profile> {
        self.start();
        match self.service.update_profile(patch).await {
            Ok(profile) => {
                let mut state = self.state.write();
                state.profile = Some(profile.clone());
                state.is_loading = false;
                Ok(profile)
            }
            Err(e) => {
                self.fail(&e, "Profile update failed");
                Err(e)
            }
        }
    }

    pub async fn delete_profile(&self) -> ApiResult<()> {
        self.start();
        match self.service.delete_profile().await {
            Ok(()) => {
                let mut state = self.state.write();
                state.profile = None;
                state.is_loading = false;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "Profile deletion failed");
                Err(e)
            }
        }
    }

    pub fn clear_profile(&self) {
        let mut state = self.state.write();
        state.profile = None;
        state.error = None;
    }
}
