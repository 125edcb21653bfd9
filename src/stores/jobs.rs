// src/stores/jobs.rs
use tracing::{info, warn};

use super::resource::ResourceStore;
use crate::error::{ApiError, ApiResult};
use crate::services::{AdminJobService, JobService};
use crate::types::{Job, JobDraft};

pub const JOBS_PAGE_LIMIT: u32 = 10;

/// Public job board: list with paging/search/sort and job detail.
pub type JobStore = ResourceStore<JobService>;

/// Admin job management: everything [`JobStore`] does plus create, update
/// and delete.
pub type AdminJobStore = ResourceStore<AdminJobService>;

impl ResourceStore<AdminJobService> {
    /// Validate and submit a new job. The list is not touched; callers
    /// refetch the page they are showing.
    pub async fn create_job(&self, draft: &JobDraft) -> ApiResult<Option<Job>> {
        draft.validate().map_err(ApiError::InvalidInput)?;

        match self.service().create_job(draft).await {
            Ok(created) => {
                info!("adminJobs/create/success '{}'", draft.title);
                Ok(created)
            }
            Err(e) => {
                warn!("adminJobs/create failed: {}", e);
                Err(e)
            }
        }
    }
}
