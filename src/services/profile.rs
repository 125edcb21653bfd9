// src/services/profile.rs
use std::sync::Arc;

use crate::core::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::types::response::{extract_entity, require_entity};
use crate::types::{Profile, ProfileDraft, ProfilePatch};

const PROFILES_ENDPOINT: &str = "/profiles";
const MY_PROFILE_ENDPOINT: &str = "/profiles/me";

pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `None` when the user has not set up a profile yet.
    pub async fn get_my_profile(&self) -> ApiResult<Option<Profile>> {
        let body = self.client.send(ApiRequest::get(MY_PROFILE_ENDPOINT)).await?;
        extract_entity(body, &["profile"])
    }

    pub async fn create_profile(&self, draft: &ProfileDraft) -> ApiResult<Profile> {
        let body = self
            .client
            .send(ApiRequest::post(PROFILES_ENDPOINT).json(draft)?)
            .await?;
        require_entity(body, &["profile"])
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> ApiResult<Profile> {
        let body = self
            .client
            .send(ApiRequest::put(MY_PROFILE_ENDPOINT).json(patch)?)
            .await?;
        require_entity(body, &["updated", "profile"])
    }

    pub async fn delete_profile(&self) -> ApiResult<()> {
        self.client
            .send(ApiRequest::delete(MY_PROFILE_ENDPOINT))
            .await
            .map(|_| ())
    }
}
