// src/services/mod.rs
//! Thin typed wrappers over the REST endpoints.
//!
//! Services marshal parameters and normalize errors; they hold no state and
//! never retry.

use async_trait::async_trait;

use crate::core::ApiRequest;
use crate::error::ApiResult;
use crate::types::{Entity, Page, Patch};

pub mod admin;
pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profile;

pub use admin::{AdminApplicationService, AdminJobService, AdminService, AdminUserService};
pub use applications::ApplicationService;
pub use auth::{AuthResponse, AuthService, SignupResponse};
pub use jobs::JobService;
pub use profile::ProfileService;

/// Paging, search and ordering parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub filter_by: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
            sort: None,
            filter_by: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = crate::utils::normalize_search(search);
        self
    }

    pub fn with_sort(mut self, sort: &str) -> Self {
        self.sort = crate::utils::normalize_search(sort);
        self
    }

    pub fn with_filter(mut self, filter_by: &str) -> Self {
        self.filter_by = crate::utils::normalize_search(filter_by);
        self
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// `GET path?page&limit[&search][&sort][&filterBy]`
    pub fn to_request(&self, path: &str) -> ApiRequest {
        ApiRequest::get(path)
            .param("page", Some(self.page))
            .param("limit", Some(self.limit))
            .param("search", self.search.as_deref())
            .param("sort", self.sort.as_deref())
            .param("filterBy", self.filter_by.as_deref())
    }
}

#[async_trait]
pub trait ListResource: Send + Sync + 'static {
    type Item: Entity;

    /// Short name used in log lines, e.g. `"adminJobs"`.
    fn label(&self) -> &'static str;

    async fn list(&self, query: &ListQuery) -> ApiResult<Page<Self::Item>>;
}

#[async_trait]
pub trait DetailResource: ListResource {
    async fn get(&self, id: i64) -> ApiResult<Self::Item>;
}

#[async_trait]
pub trait UpdateResource: ListResource {
    type Patch: Patch<Self::Item> + Send + Sync;

    /// Returns the server's copy of the record when the response carries one.
    async fn update(&self, id: i64, patch: &Self::Patch) -> ApiResult<Option<Self::Item>>;
}

#[async_trait]
pub trait DeleteResource: ListResource {
    async fn delete(&self, id: i64) -> ApiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_dropped() {
        let query = ListQuery::new(0, 0).with_search("   ").with_sort("newest");
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);
        assert!(!query.has_search());
        assert_eq!(query.sort.as_deref(), Some("newest"));
    }
}
