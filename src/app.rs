// src/app.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::ClientConfig;
use crate::core::{ApiClient, FileStorage, RedirectGuard, Session};
use crate::services::{
    AdminApplicationService, AdminJobService, AdminService, AdminUserService, ApplicationService,
    AuthService, JobService, ProfileService,
};
use crate::stores::{
    AdminJobStore, AdminUserStore, ApplicationStore, AuthStore, DashboardStore, JobStore,
    ProfileStore, ResourceStore, ADMIN_APPLICATIONS_PAGE_LIMIT, ADMIN_USERS_PAGE_LIMIT,
    JOBS_PAGE_LIMIT,
};
use crate::types::StatusSet;

/// Everything one running client needs: the HTTP client and every store,
/// all sharing the same session.
pub struct AppContext {
    client: Arc<ApiClient>,
    statuses: StatusSet,
    pub auth: AuthStore,
    pub jobs: JobStore,
    pub admin_jobs: AdminJobStore,
    pub admin_users: AdminUserStore,
    pub applications: ApplicationStore,
    pub profile: ProfileStore,
    pub dashboard: DashboardStore,
}

impl AppContext {
    /// Build against the network with a file-backed session.
    pub fn new(config: &ClientConfig, redirect: RedirectGuard) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(config.state_path.clone()));
        let session = Arc::new(Session::new(storage, redirect));
        let client = Arc::new(ApiClient::new(config, session)?);
        info!("Client ready for {}", client.base_url());
        Ok(Self::with_client(client, config.status_set.clone()))
    }

    pub fn with_client(client: Arc<ApiClient>, statuses: StatusSet) -> Self {
        let session = Arc::clone(client.session());
        Self {
            auth: AuthStore::new(AuthService::new(Arc::clone(&client)), session),
            jobs: ResourceStore::new(JobService::new(Arc::clone(&client)), JOBS_PAGE_LIMIT),
            admin_jobs: ResourceStore::new(
                AdminJobService::new(Arc::clone(&client)),
                JOBS_PAGE_LIMIT,
            ),
            admin_users: ResourceStore::new(
                AdminUserService::new(Arc::clone(&client)),
                ADMIN_USERS_PAGE_LIMIT,
            ),
            applications: ApplicationStore::new(
                ApplicationService::new(Arc::clone(&client)),
                ResourceStore::new(
                    AdminApplicationService::new(Arc::clone(&client)),
                    ADMIN_APPLICATIONS_PAGE_LIMIT,
                ),
                statuses.clone(),
            ),
            profile: ProfileStore::new(ProfileService::new(Arc::clone(&client))),
            dashboard: DashboardStore::new(AdminService::new(Arc::clone(&client))),
            client,
            statuses,
        }
    }

    /// End the session and drop per-user state held by the stores.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.profile.clear_profile();
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }
}
