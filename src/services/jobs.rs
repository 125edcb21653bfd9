// src/services/jobs.rs
use async_trait::async_trait;
use std::sync::Arc;

use super::{DetailResource, ListQuery, ListResource};
use crate::core::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::types::response::parse_page;
use crate::types::{Job, Page};

pub(crate) const JOBS_ENDPOINT: &str = "/jobs";

/// Public job listing.
pub struct JobService {
    client: Arc<ApiClient>,
}

impl JobService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_jobs(&self, query: &ListQuery) -> ApiResult<Page<Job>> {
        let body = self.client.send(query.to_request(JOBS_ENDPOINT)).await?;
        parse_page(body)
    }

    pub async fn get_job(&self, id: i64) -> ApiResult<Job> {
        self.client
            .send_as(ApiRequest::get(&format!("{}/{}", JOBS_ENDPOINT, id)))
            .await
    }
}

#[async_trait]
impl ListResource for JobService {
    type Item = Job;

    fn label(&self) -> &'static str {
        "jobs"
    }

    async fn list(&self, query: &ListQuery) -> ApiResult<Page<Job>> {
        self.list_jobs(query).await
    }
}

#[async_trait]
impl DetailResource for JobService {
    async fn get(&self, id: i64) -> ApiResult<Job> {
        self.get_job(id).await
    }
}
