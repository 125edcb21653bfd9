// src/types/mod.rs
//! Wire records exchanged with the hiring backend

pub mod admin;
pub mod application;
pub mod job;
pub mod profile;
pub mod response;
pub mod user;

pub use admin::{DashboardStats, RecentApplicant};
pub use application::{
    ApplicantRef, Application, ApplicationDraft, ApplicationFilter, ApplicationStatus,
    JobRef, StatusSet, StatusUpdate,
};
pub use job::{HiringStatus, Job, JobDraft, JobPatch};
pub use profile::{Experience, Profile, ProfileDraft, ProfilePatch};
pub use response::{Page, Pagination};
pub use user::{Role, User, UserPatch};

/// Records held in store lists, addressed by numeric id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
}

/// A partial update that can be merged into a local copy of `T`.
pub trait Patch<T> {
    fn apply_to(&self, target: &mut T);
}
