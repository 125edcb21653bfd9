// src/stores/applications.rs
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::admin::AdminApplicationStore;
use super::resource::FetchOutcome;
use crate::error::{ApiError, ApiResult};
use crate::services::{ApplicationService, ListQuery};
use crate::types::{Application, ApplicationDraft, ApplicationFilter, StatusSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MyApplicationsState {
    pub my_applications: Vec<Application>,
    /// Jobs with an apply request in flight.
    pub applying_jobs: BTreeSet<i64>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Applications as the job seeker sees them, plus the admin list.
pub struct ApplicationStore {
    service: ApplicationService,
    admin: AdminApplicationStore,
    statuses: StatusSet,
    state: RwLock<MyApplicationsState>,
}

impl ApplicationStore {
    pub fn new(service: ApplicationService, admin: AdminApplicationStore, statuses: StatusSet) -> Self {
        Self {
            service,
            admin,
            statuses,
            state: RwLock::new(MyApplicationsState::default()),
        }
    }

    pub fn state(&self) -> MyApplicationsState {
        self.state.read().clone()
    }

    pub fn my_applications(&self) -> Vec<Application> {
        self.state.read().my_applications.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn is_applying(&self, job_id: i64) -> bool {
        self.state.read().applying_jobs.contains(&job_id)
    }

    pub fn has_applied(&self, job_id: i64) -> bool {
        self.state
            .read()
            .my_applications
            .iter()
            .any(|app| app.job_id == job_id)
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    pub async fn fetch_my_applications(&self) -> FetchOutcome {
        {
            let mut state = self.state.write();
            if state.is_loading {
                debug!("applications/fetchMine dropped: already loading");
                return FetchOutcome::Dropped;
            }
            state.is_loading = true;
            state.error = None;
        }

        let result = self.service.my_applications().await;

        let mut state = self.state.write();
        state.is_loading = false;
        match result {
            Ok(applications) => {
                state.my_applications = applications;
                FetchOutcome::Loaded
            }
            Err(ApiError::SessionExpired) => FetchOutcome::SessionExpired,
            Err(e) => {
                warn!("applications/fetchMine failed: {}", e);
                state.error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Submit an application and append it to `my_applications`.
    ///
    /// The job's applying flag is set for the duration of the call and
    /// cleared whatever the outcome.
    pub async fn apply_to_job(&self, draft: ApplicationDraft) -> ApiResult<Application> {
        let job_id = draft.job_id;
        {
            let mut state = self.state.write();
            if !state.applying_jobs.insert(job_id) {
                return Err(ApiError::InvalidInput(format!(
                    "An application for job {} is already being submitted",
                    job_id
                )));
            }
            state.error = None;
        }

        let result = self.service.apply(&draft).await;

        let mut state = self.state.write();
        state.applying_jobs.remove(&job_id);
        match result {
            Ok(application) => {
                info!("applications/apply/success job={}", job_id);
                state.my_applications.push(application.clone());
                Ok(application)
            }
            Err(e) => {
                warn!("applications/apply job={} failed: {}", job_id, e);
                if !e.is_session_expired() {
                    state.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    // ===== Admin view =====

    pub fn admin(&self) -> &AdminApplicationStore {
        &self.admin
    }

    pub fn admin_applications(&self) -> Vec<Application> {
        self.admin.items()
    }

    pub async fn fetch_admin_applications(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
        filter_by: Option<ApplicationFilter>,
    ) -> FetchOutcome {
        let mut query = ListQuery::new(page, limit);
        if let Some(search) = search {
            query = query.with_search(search);
        }
        if let Some(filter) = filter_by {
            query = query.with_filter(filter.as_str());
        }
        self.admin.fetch_all(query).await
    }

    /// Optimistic status change with rollback to the pre-call list.
    pub async fn update_application_status(
        &self,
        id: i64,
        status: &str,
    ) -> ApiResult<Option<Application>> {
        self.admin.update_status(&self.statuses, id, status).await
    }
}
