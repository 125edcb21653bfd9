// src/stores/admin.rs
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::resource::ResourceStore;
use crate::error::{ApiError, ApiResult};
use crate::services::{AdminApplicationService, AdminService, AdminUserService};
use crate::types::{Application, DashboardStats, RecentApplicant, StatusSet, StatusUpdate};

pub const ADMIN_USERS_PAGE_LIMIT: u32 = 20;
pub const ADMIN_APPLICATIONS_PAGE_LIMIT: u32 = 10;
pub const RECENT_APPLICANTS_LIMIT: u32 = 10;

pub type AdminUserStore = ResourceStore<AdminUserService>;
pub type AdminApplicationStore = ResourceStore<AdminApplicationService>;

impl ResourceStore<AdminApplicationService> {
    /// Move an application to `status`, which must belong to `statuses`.
    /// Optimistic, rolled back if the server refuses.
    pub async fn update_status(
        &self,
        statuses: &StatusSet,
        id: i64,
        status: &str,
    ) -> ApiResult<Option<Application>> {
        let status = statuses.parse(status).map_err(ApiError::InvalidInput)?;
        self.update(id, StatusUpdate { status }).await
    }
}

// ===== Dashboard =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
    pub recent: Vec<RecentApplicant>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Admin landing figures: totals plus the latest applicants.
pub struct DashboardStore {
    service: AdminService,
    state: RwLock<DashboardState>,
}

impl DashboardStore {
    pub fn new(service: AdminService) -> Self {
        Self {
            service,
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Load stats and recent applicants together; either failing fails both.
    pub async fn fetch_dashboard(&self, recent_limit: u32) -> ApiResult<()> {
        {
            let mut state = self.state.write();
            if state.is_loading {
                debug!("dashboard/fetch dropped: already loading");
                return Ok(());
            }
            state.is_loading = true;
            state.error = None;
        }

        let result = tokio::try_join!(
            self.service.get_dashboard_stats(),
            self.service.get_recent_applicants(recent_limit)
        );

        let mut state = self.state.write();
        state.is_loading = false;
        match result {
            Ok((stats, recent)) => {
                state.stats = Some(stats);
                state.recent = recent;
                Ok(())
            }
            Err(e) => {
                warn!("dashboard/fetch failed: {}", e);
                if !e.is_session_expired() {
                    state.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }
}
