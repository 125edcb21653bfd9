// src/services/admin.rs
//! Admin-only endpoints: job, user and application management plus the
//! dashboard figures.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::applications::APPLICATIONS_ENDPOINT;
use super::jobs::{JobService, JOBS_ENDPOINT};
use super::{DeleteResource, DetailResource, ListQuery, ListResource, UpdateResource};
use crate::core::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::types::response::{extract_entity, parse_page, require_entity};
use crate::types::{
    Application, DashboardStats, Job, JobDraft, JobPatch, Page, RecentApplicant, StatusUpdate,
    User, UserPatch,
};

const USERS_ENDPOINT: &str = "/users";
const STATS_ENDPOINT: &str = "/admin/stats";
const RECENT_APPLICATIONS_ENDPOINT: &str = "/admin/applications/recent";

fn item_path(base: &str, id: i64) -> String {
    format!("{}/{}", base, id)
}

// ===== Jobs =====

/// Job management. Reads go through the public [`JobService`]; writes need
/// the admin routes.
pub struct AdminJobService {
    client: Arc<ApiClient>,
    jobs: JobService,
}

impl AdminJobService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            jobs: JobService::new(Arc::clone(&client)),
            client,
        }
    }

    pub async fn create_job(&self, draft: &JobDraft) -> ApiResult<Option<Job>> {
        let body = self
            .client
            .send(ApiRequest::post(JOBS_ENDPOINT).json(draft)?)
            .await?;
        info!("Job '{}' created", draft.title);
        extract_entity(body, &["job", "created"])
    }
}

#[async_trait]
impl ListResource for AdminJobService {
    type Item = Job;

    fn label(&self) -> &'static str {
        "adminJobs"
    }

    async fn list(&self, query: &ListQuery) -> ApiResult<Page<Job>> {
        self.jobs.list_jobs(query).await
    }
}

#[async_trait]
impl DetailResource for AdminJobService {
    async fn get(&self, id: i64) -> ApiResult<Job> {
        self.jobs.get_job(id).await
    }
}

#[async_trait]
impl UpdateResource for AdminJobService {
    type Patch = JobPatch;

    async fn update(&self, id: i64, patch: &JobPatch) -> ApiResult<Option<Job>> {
        let body = self
            .client
            .send(ApiRequest::put(&item_path(JOBS_ENDPOINT, id)).json(patch)?)
            .await?;
        extract_entity(body, &["updated", "job"])
    }
}

#[async_trait]
impl DeleteResource for AdminJobService {
    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .send(ApiRequest::delete(&item_path(JOBS_ENDPOINT, id)))
            .await
            .map(|_| ())
    }
}

// ===== Users =====

pub struct AdminUserService {
    client: Arc<ApiClient>,
}

impl AdminUserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListResource for AdminUserService {
    type Item = User;

    fn label(&self) -> &'static str {
        "adminUsers"
    }

    async fn list(&self, query: &ListQuery) -> ApiResult<Page<User>> {
        parse_page(self.client.send(query.to_request(USERS_ENDPOINT)).await?)
    }
}

#[async_trait]
impl DetailResource for AdminUserService {
    async fn get(&self, id: i64) -> ApiResult<User> {
        self.client
            .send_as(ApiRequest::get(&item_path(USERS_ENDPOINT, id)))
            .await
    }
}

#[async_trait]
impl UpdateResource for AdminUserService {
    type Patch = UserPatch;

    async fn update(&self, id: i64, patch: &UserPatch) -> ApiResult<Option<User>> {
        let body = self
            .client
            .send(ApiRequest::put(&item_path(USERS_ENDPOINT, id)).json(patch)?)
            .await?;
        extract_entity(body, &["user", "updated"])
    }
}

#[async_trait]
impl DeleteResource for AdminUserService {
    async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .send(ApiRequest::delete(&item_path(USERS_ENDPOINT, id)))
            .await
            .map(|_| ())
    }
}

// ===== Applications =====

/// Admin view of every application, searchable by `filterBy`.
pub struct AdminApplicationService {
    client: Arc<ApiClient>,
}

impl AdminApplicationService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListResource for AdminApplicationService {
    type Item = Application;

    fn label(&self) -> &'static str {
        "adminApplications"
    }

    async fn list(&self, query: &ListQuery) -> ApiResult<Page<Application>> {
        parse_page(self.client.send(query.to_request(APPLICATIONS_ENDPOINT)).await?)
    }
}

#[async_trait]
impl UpdateResource for AdminApplicationService {
    type Patch = StatusUpdate;

    async fn update(&self, id: i64, patch: &StatusUpdate) -> ApiResult<Option<Application>> {
        let body = self
            .client
            .send(ApiRequest::put(&item_path(APPLICATIONS_ENDPOINT, id)).json(patch)?)
            .await?;
        extract_entity(body, &["updated", "application"])
    }
}

// ===== Dashboard =====

pub struct AdminService {
    client: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let body = self.client.send(ApiRequest::get(STATS_ENDPOINT)).await?;
        require_entity(body, &["stats"])
    }

    pub async fn get_recent_applicants(&self, limit: u32) -> ApiResult<Vec<RecentApplicant>> {
        let body = self
            .client
            .send(ApiRequest::get(RECENT_APPLICATIONS_ENDPOINT).param("limit", Some(limit)))
            .await?;

        let rows = match body {
            serde_json::Value::Array(rows) => rows,
            other => other
                .get("applications")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default(),
        };

        Ok(rows
            .iter()
            .filter_map(|row| {
                let mapped = RecentApplicant::from_row(row);
                if mapped.is_none() {
                    warn!("Skipping recent application row without id: {}", row);
                }
                mapped
            })
            .collect())
    }
}
