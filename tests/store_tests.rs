// tests/store_tests.rs
mod common;

use common::{application_json, harness_with, job_json, logged_in, user_json};
use hireboard::error::ApiError;
use hireboard::services::ListQuery;
use hireboard::stores::FetchOutcome;
use hireboard::types::{
    ApplicationDraft, ApplicationFilter, JobDraft, JobPatch, ProfileDraft, ProfilePatch, StatusSet,
};
use serde_json::json;

#[tokio::test]
async fn test_apply_appends_pending_application() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        201,
        json!({
            "message": "Application submitted",
            "application": {
                "id": 100, "jobId": 42, "userId": 7, "status": "pending", "coverLetter": "Hello"
            }
        }),
    );

    let draft = ApplicationDraft::new(42, 7).with_cover_letter("Hello");
    let created = h.ctx.applications.apply_to_job(draft).await.unwrap();

    assert_eq!(created.status.as_str(), "pending");
    let mine = h.ctx.applications.my_applications();
    assert_eq!(mine.len(), 1);
    assert_eq!((mine[0].job_id, mine[0].user_id), (42, 7));
    assert!(h.ctx.applications.has_applied(42));
    assert!(!h.ctx.applications.is_applying(42));

    let sent = h.transport.last_request().unwrap().body.unwrap();
    assert_eq!(sent, json!({ "jobId": 42, "userId": 7, "coverLetter": "Hello" }));
}

#[tokio::test]
async fn test_failed_apply_clears_applying_flag() {
    let h = logged_in(7, 2).await;
    h.transport.respond(400, json!({ "message": "Already applied" }));

    let result = h.ctx.applications.apply_to_job(ApplicationDraft::new(42, 7)).await;

    assert!(result.is_err());
    assert!(!h.ctx.applications.is_applying(42));
    assert!(h.ctx.applications.my_applications().is_empty());
    assert_eq!(h.ctx.applications.error().as_deref(), Some("Already applied"));
}

#[tokio::test]
async fn test_status_update_rolls_back_on_failure() {
    let h = logged_in(1, 1).await;
    h.transport.respond(
        200,
        json!({
            "applications": [application_json(5, 42, 7, "pending")],
            "total": 1, "totalPages": 1, "currentPage": 1
        }),
    );
    h.transport.respond(500, json!({ "message": "Database unavailable" }));

    let outcome = h.ctx.applications.fetch_admin_applications(1, 10, None, None).await;
    assert_eq!(outcome, FetchOutcome::Loaded);

    let result = h.ctx.applications.update_application_status(5, "accepted").await;

    assert!(result.is_err());
    let apps = h.ctx.applications.admin_applications();
    assert_eq!(apps[0].status.as_str(), "pending");
    assert_eq!(
        h.ctx.applications.admin().error().as_deref(),
        Some("Database unavailable")
    );
}

#[tokio::test]
async fn test_status_outside_vocabulary_is_rejected_locally() {
    let h = logged_in(1, 1).await;

    let result = h.ctx.applications.update_application_status(5, "hired").await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn test_legacy_vocabulary_accepts_hired() {
    let h = harness_with(StatusSet::legacy());
    h.session
        .establish(&common::valid_token(1, 1), &common::user(1, 1))
        .await
        .unwrap();
    h.transport.respond(
        200,
        json!({ "message": "ok", "updated": application_json(5, 42, 7, "hired") }),
    );

    let updated = h
        .ctx
        .applications
        .update_application_status(5, "Hired")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status.as_str(), "hired");
    assert_eq!(
        h.transport.last_request().unwrap().body,
        Some(json!({ "status": "hired" }))
    );
}

#[tokio::test]
async fn test_admin_application_filter_param() {
    let h = logged_in(1, 1).await;
    h.transport.respond(200, json!({ "applications": [], "total": 0 }));

    h.ctx
        .applications
        .fetch_admin_applications(1, 10, Some("acme"), Some(ApplicationFilter::Company))
        .await;

    let query = h.transport.last_request().unwrap().query;
    assert!(query.contains(&("search".to_string(), "acme".to_string())));
    assert!(query.contains(&("filterBy".to_string(), "company".to_string())));
}

#[tokio::test]
async fn test_search_with_no_results_shows_empty_state() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        200,
        json!({ "jobs": [], "total": 0, "totalPages": 0, "currentPage": 1 }),
    );

    let outcome = h
        .ctx
        .jobs
        .search_all(ListQuery::new(1, 10).with_search("frontend"))
        .await;

    assert_eq!(outcome, FetchOutcome::Loaded);
    assert!(h.ctx.jobs.items().is_empty());
    assert!(h.ctx.jobs.error().is_none());
    assert!(h.ctx.jobs.shows_empty_state());
}

#[tokio::test]
async fn test_superseded_search_response_is_discarded() {
    let h = logged_in(7, 2).await;
    let release_first = h.transport.respond_gated(
        200,
        json!({ "jobs": [job_json(1, "Backend")], "total": 1, "totalPages": 1, "currentPage": 1 }),
    );
    h.transport.respond(
        200,
        json!({ "jobs": [job_json(2, "Frontend")], "total": 1, "totalPages": 1, "currentPage": 1 }),
    );

    let jobs = &h.ctx.jobs;
    let first = jobs.search_all(ListQuery::new(1, 10).with_search("back"));
    let second = async {
        tokio::task::yield_now().await;
        let outcome = jobs.search_all(ListQuery::new(1, 10).with_search("front")).await;
        release_first.send(()).ok();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second, FetchOutcome::Loaded);
    assert_eq!(first, FetchOutcome::Stale);
    let items = jobs.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Frontend");
}

#[tokio::test]
async fn test_fetch_page_and_truncate_to_limit() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        200,
        json!({
            "jobs": [job_json(1, "A"), job_json(2, "B"), job_json(3, "C")],
            "total": 12, "totalPages": 6, "currentPage": 3
        }),
    );

    h.ctx.jobs.fetch_all(ListQuery::new(3, 2)).await;

    let pagination = h.ctx.jobs.pagination();
    assert_eq!(pagination.current_page, 3);
    assert_eq!(pagination.limit, 2);
    assert_eq!(pagination.total, 12);
    assert_eq!(h.ctx.jobs.items().len(), 2);
}

#[tokio::test]
async fn test_delete_decrements_total() {
    let h = logged_in(1, 1).await;
    h.transport.respond(
        200,
        json!({
            "jobs": [job_json(1, "A"), job_json(2, "B")],
            "total": 2, "totalPages": 1, "currentPage": 1
        }),
    );
    h.transport.respond(200, json!({ "message": "Job deleted" }));

    h.ctx.admin_jobs.fetch_all(ListQuery::new(1, 10)).await;
    h.ctx.admin_jobs.delete(1).await.unwrap();

    let ids: Vec<i64> = h.ctx.admin_jobs.items().iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(h.ctx.admin_jobs.pagination().total, 1);
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let h = logged_in(1, 1).await;
    h.transport.respond(200, json!([user_json(3, 2), user_json(4, 2)]));
    h.transport.respond(403, json!({ "message": "Forbidden" }));

    h.ctx.admin_users.fetch_all(ListQuery::new(1, 20)).await;
    assert!(h.ctx.admin_users.delete(3).await.is_err());

    assert_eq!(h.ctx.admin_users.items().len(), 2);
    assert_eq!(h.ctx.admin_users.pagination().total, 2);
    assert_eq!(h.ctx.admin_users.error().as_deref(), Some("Forbidden"));
}

#[tokio::test]
async fn test_create_job_validates_before_sending() {
    let h = logged_in(1, 1).await;

    let result = h.ctx.admin_jobs.create_job(&JobDraft::new("  ", "Acme")).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn test_clear_error_twice() {
    let h = logged_in(7, 2).await;
    h.transport.respond(500, json!({ "message": "boom" }));

    h.ctx.jobs.fetch_all(ListQuery::new(1, 10)).await;
    assert_eq!(h.ctx.jobs.error().as_deref(), Some("boom"));

    h.ctx.jobs.clear_error();
    let once = h.ctx.jobs.state();
    h.ctx.jobs.clear_error();
    assert_eq!(h.ctx.jobs.state(), once);
    assert!(once.error.is_none());
}

#[tokio::test]
async fn test_dashboard_recent_applicants_fall_back_to_unknown() {
    let h = logged_in(1, 1).await;
    h.transport.respond(
        200,
        json!({
            "stats": {
                "totalJobs": 3, "totalUsers": 9, "totalApplications": 4,
                "applicationsByStatus": { "pending": 3, "accepted": 1 }
            }
        }),
    );
    h.transport.respond(
        200,
        json!([
            { "id": 1, "status": "pending", "appliedAt": "2024-05-01",
              "User": { "name": "Ada" }, "Job": { "title": "Engineer" } },
            { "id": 2, "status": "pending" }
        ]),
    );

    h.ctx.dashboard.fetch_dashboard(10).await.unwrap();

    let state = h.ctx.dashboard.state();
    assert_eq!(state.stats.unwrap().total_users, 9);
    assert_eq!(state.recent.len(), 2);
    assert_eq!(state.recent[0].applicant_name, "Ada");
    assert_eq!(state.recent[1].applicant_name, "Unknown");
    assert_eq!(state.recent[1].job_title, "Unknown");
}

#[tokio::test]
async fn test_profile_fetch_failure_clears_profile() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        200,
        json!({ "id": 1, "userId": 7, "fullName": "Grace", "skills": ["Rust"] }),
    );
    h.transport.respond(500, json!({ "message": "Profile service down" }));

    let profile = h.ctx.profile.fetch_my_profile().await.unwrap().unwrap();
    assert_eq!(profile.skills, vec!["Rust"]);

    assert!(h.ctx.profile.fetch_my_profile().await.is_err());
    let state = h.ctx.profile.state();
    assert!(state.profile.is_none());
    assert_eq!(state.error.as_deref(), Some("Profile service down"));
}

fn retitle(title: &str) -> JobPatch {
    JobPatch {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

async fn load_two_admin_jobs(h: &common::Harness) {
    h.transport.respond(
        200,
        json!({
            "jobs": [job_json(1, "A"), job_json(2, "B")],
            "total": 4, "totalPages": 2, "currentPage": 1
        }),
    );
    let outcome = h.ctx.admin_jobs.fetch_all(ListQuery::new(1, 2)).await;
    assert_eq!(outcome, FetchOutcome::Loaded);
}

#[tokio::test]
async fn test_failed_update_does_not_resurrect_concurrent_delete() {
    let h = logged_in(1, 1).await;
    load_two_admin_jobs(&h).await;
    let release_update = h.transport.respond_gated(500, json!({ "message": "Database unavailable" }));
    h.transport.respond(200, json!({ "message": "Job deleted" }));

    let store = &h.ctx.admin_jobs;
    let update = store.update(1, retitle("Renamed"));
    let delete = async {
        tokio::task::yield_now().await;
        let deleted = store.delete(2).await;
        release_update.send(()).ok();
        deleted
    };
    let (updated, deleted) = tokio::join!(update, delete);

    assert!(deleted.is_ok());
    assert!(updated.is_err());
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!((items[0].id, items[0].title.as_str()), (1, "A"));
    assert_eq!(store.pagination().total, 3);
    assert_eq!(store.error().as_deref(), Some("Database unavailable"));
}

#[tokio::test]
async fn test_failed_update_keeps_page_fetched_meanwhile() {
    let h = logged_in(1, 1).await;
    load_two_admin_jobs(&h).await;
    let release_update = h.transport.respond_gated(500, json!({ "message": "Database unavailable" }));
    h.transport.respond(
        200,
        json!({
            "jobs": [job_json(3, "C"), job_json(4, "D")],
            "total": 4, "totalPages": 2, "currentPage": 2
        }),
    );

    let store = &h.ctx.admin_jobs;
    let update = store.update(1, retitle("Renamed"));
    let fetch = async {
        tokio::task::yield_now().await;
        let outcome = store.fetch_all(ListQuery::new(2, 2)).await;
        release_update.send(()).ok();
        outcome
    };
    let (updated, fetched) = tokio::join!(update, fetch);

    assert_eq!(fetched, FetchOutcome::Loaded);
    assert!(updated.is_err());
    let ids: Vec<i64> = store.items().iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(store.pagination().current_page, 2);
}

#[tokio::test]
async fn test_failed_update_rolls_back_despite_detail_fetch() {
    let h = logged_in(1, 1).await;
    load_two_admin_jobs(&h).await;
    let release_update = h.transport.respond_gated(500, json!({ "message": "Database unavailable" }));
    h.transport.respond(200, job_json(2, "B"));

    let store = &h.ctx.admin_jobs;
    let update = store.update(1, retitle("Renamed"));
    let detail = async {
        tokio::task::yield_now().await;
        let outcome = store.fetch_by_id(2).await;
        release_update.send(()).ok();
        outcome
    };
    let (updated, detail) = tokio::join!(update, detail);

    assert_eq!(detail, FetchOutcome::Loaded);
    assert!(updated.is_err());
    let items = store.items();
    assert_eq!(items[0].title, "A");
    assert_eq!(store.selected().map(|j| j.id), Some(2));
}

#[tokio::test]
async fn test_fetch_by_id_sets_then_clears_selected() {
    let h = logged_in(7, 2).await;
    h.transport.respond(200, job_json(3, "Platform Engineer"));
    h.transport.respond(404, json!({ "message": "Job not found" }));

    assert_eq!(h.ctx.jobs.fetch_by_id(3).await, FetchOutcome::Loaded);
    assert_eq!(h.ctx.jobs.selected().unwrap().title, "Platform Engineer");
    assert!(h.ctx.jobs.error().is_none());
    assert!(h.transport.last_request().unwrap().url.ends_with("/jobs/3"));

    assert_eq!(h.ctx.jobs.fetch_by_id(99).await, FetchOutcome::Failed);
    let state = h.ctx.jobs.state();
    assert!(state.selected.is_none());
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Job not found"));
}

#[tokio::test]
async fn test_fetch_by_id_dropped_while_list_in_flight() {
    let h = logged_in(7, 2).await;
    let release_list = h.transport.respond_gated(
        200,
        json!({ "jobs": [job_json(1, "A")], "total": 1, "totalPages": 1, "currentPage": 1 }),
    );

    let jobs = &h.ctx.jobs;
    let list = jobs.fetch_all(ListQuery::new(1, 10));
    let detail = async {
        tokio::task::yield_now().await;
        let outcome = jobs.fetch_by_id(1).await;
        release_list.send(()).ok();
        outcome
    };
    let (listed, detail) = tokio::join!(list, detail);

    assert_eq!(listed, FetchOutcome::Loaded);
    assert_eq!(detail, FetchOutcome::Dropped);
    assert_eq!(h.transport.request_count(), 1);
    assert!(jobs.selected().is_none());
}

#[tokio::test]
async fn test_admin_fetch_by_id_reads_job_endpoint() {
    let h = logged_in(1, 1).await;
    h.transport.respond(200, job_json(3, "C"));

    assert_eq!(h.ctx.admin_jobs.fetch_by_id(3).await, FetchOutcome::Loaded);

    assert_eq!(h.ctx.admin_jobs.selected().unwrap().id, 3);
    assert!(h.transport.last_request().unwrap().url.ends_with("/jobs/3"));
}

fn profile_json(full_name: &str, skills: &[&str]) -> serde_json::Value {
    json!({ "id": 1, "userId": 7, "fullName": full_name, "skills": skills })
}

#[tokio::test]
async fn test_profile_create_stores_profile() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        201,
        json!({ "message": "Profile created", "profile": profile_json("Grace", &["Rust"]) }),
    );

    let mut draft = ProfileDraft::new("Grace");
    draft.add_skill("Rust");
    let created = h.ctx.profile.create_profile(&draft).await.unwrap();

    assert_eq!(created.full_name, "Grace");
    let state = h.ctx.profile.state();
    assert_eq!(state.profile, Some(created));
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_profile_create_requires_full_name() {
    let h = logged_in(7, 2).await;

    let result = h.ctx.profile.create_profile(&ProfileDraft::new("   ")).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn test_profile_create_without_record_uses_fallback() {
    let h = logged_in(7, 2).await;
    h.transport.respond(201, json!({ "message": "Profile created" }));

    let result = h.ctx.profile.create_profile(&ProfileDraft::new("Grace")).await;

    assert!(matches!(result, Err(ApiError::Decode { .. })));
    assert!(h.ctx.profile.profile().is_none());
    assert_eq!(
        h.ctx.profile.error().as_deref(),
        Some("Profile creation failed")
    );
}

#[tokio::test]
async fn test_profile_update_replaces_profile() {
    let h = logged_in(7, 2).await;
    h.transport.respond(
        200,
        json!({ "message": "Profile updated", "updated": profile_json("Grace", &["Rust", "Go"]) }),
    );

    let patch = ProfilePatch {
        skills: Some(vec!["Rust".to_string(), "Go".to_string()]),
        ..Default::default()
    };
    let updated = h.ctx.profile.update_profile(&patch).await.unwrap();

    assert_eq!(updated.skills, vec!["Rust", "Go"]);
    assert_eq!(h.ctx.profile.profile(), Some(updated));
    assert_eq!(
        h.transport.last_request().unwrap().body,
        Some(json!({ "skills": ["Rust", "Go"] }))
    );
}

#[tokio::test]
async fn test_profile_update_without_record_uses_fallback() {
    let h = logged_in(7, 2).await;
    h.transport.respond(200, json!({ "message": "ok" }));

    assert!(h.ctx.profile.update_profile(&ProfilePatch::default()).await.is_err());

    assert_eq!(h.ctx.profile.error().as_deref(), Some("Profile update failed"));
}

#[tokio::test]
async fn test_profile_delete_clears_profile() {
    let h = logged_in(7, 2).await;
    h.transport.respond(200, profile_json("Grace", &[]));
    h.transport.respond(403, json!({ "message": "Not your profile" }));
    h.transport.respond(200, json!({ "message": "Profile deleted" }));

    h.ctx.profile.fetch_my_profile().await.unwrap();

    assert!(h.ctx.profile.delete_profile().await.is_err());
    assert!(h.ctx.profile.profile().is_some());
    assert_eq!(h.ctx.profile.error().as_deref(), Some("Not your profile"));

    h.ctx.profile.delete_profile().await.unwrap();
    let state = h.ctx.profile.state();
    assert!(state.profile.is_none());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_malformed_profile_is_an_error() {
    let h = logged_in(7, 2).await;
    h.transport.respond(200, json!({ "profile": { "id": 1, "fullName": 42 } }));

    let result = h.ctx.profile.fetch_my_profile().await;

    assert!(matches!(result, Err(ApiError::Decode { .. })));
    assert_eq!(h.ctx.profile.error().as_deref(), Some("Failed to load profile"));
}

#[tokio::test]
async fn test_app_logout_forgets_profile() {
    let h = logged_in(7, 2).await;
    h.transport.respond(200, profile_json("Grace", &["Rust"]));
    h.ctx.profile.fetch_my_profile().await.unwrap();

    h.ctx.logout().await;

    assert!(h.ctx.profile.profile().is_none());
    assert!(!h.ctx.auth.is_authenticated());
}
