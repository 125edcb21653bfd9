// src/stores/mod.rs
//! Client-side state containers. Each store wraps one or more services and
//! exposes a cloneable snapshot of its state.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profile;
pub mod resource;

pub use admin::{
    AdminApplicationStore, AdminUserStore, DashboardState, DashboardStore,
    ADMIN_APPLICATIONS_PAGE_LIMIT, ADMIN_USERS_PAGE_LIMIT, RECENT_APPLICANTS_LIMIT,
};
pub use applications::{ApplicationStore, MyApplicationsState};
pub use auth::{AuthState, AuthStore};
pub use jobs::{AdminJobStore, JobStore, JOBS_PAGE_LIMIT};
pub use profile::{ProfileState, ProfileStore};
pub use resource::{FetchOutcome, ResourceState, ResourceStore};
