// src/services/applications.rs
use std::sync::Arc;
use tracing::info;

use crate::core::{ApiClient, ApiRequest};
use crate::error::{ApiError, ApiResult};
use crate::types::response::require_entity;
use crate::types::{Application, ApplicationDraft};

pub(crate) const APPLICATIONS_ENDPOINT: &str = "/applications";
const MY_APPLICATIONS_ENDPOINT: &str = "/applications/me";

/// Job-seeker side of applications.
pub struct ApplicationService {
    client: Arc<ApiClient>,
}

impl ApplicationService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /applications`. The backend answers with either
    /// `{message, application}` or the bare application.
    pub async fn apply(&self, draft: &ApplicationDraft) -> ApiResult<Application> {
        let body = self
            .client
            .send(ApiRequest::post(APPLICATIONS_ENDPOINT).json(draft)?)
            .await?;
        let application: Application = require_entity(body, &["application"])?;
        info!(
            "Application {} submitted for job {}",
            application.id, application.job_id
        );
        Ok(application)
    }

    pub async fn my_applications(&self) -> ApiResult<Vec<Application>> {
        let body = self.client.send(ApiRequest::get(MY_APPLICATIONS_ENDPOINT)).await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(body).map_err(ApiError::from)
    }
}
