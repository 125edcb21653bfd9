// src/types/admin.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_applications: u64,
    /// Keys are whatever statuses the backend reports.
    #[serde(default)]
    pub applications_by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplicant {
    pub id: i64,
    pub applicant_name: String,
    pub job_title: String,
    pub current_stage: String,
    pub applied_date: String,
}

const UNKNOWN: &str = "Unknown";

fn text_at<'a>(row: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(row, |value, key| value.get(*key))
        .and_then(|value| value.as_str())
        .filter(|s| !s.is_empty())
}

impl RecentApplicant {
    /// Map a raw `/admin/applications/recent` row. Returns `None` when the row
    /// has no numeric id.
    pub fn from_row(row: &serde_json::Value) -> Option<Self> {
        let id = row.get("id")?.as_i64()?;

        let applicant_name = text_at(row, &["applicantName"])
            .or_else(|| text_at(row, &["User", "name"]))
            .or_else(|| text_at(row, &["user", "name"]))
            .unwrap_or(UNKNOWN);
        let job_title = text_at(row, &["jobTitle"])
            .or_else(|| text_at(row, &["Job", "title"]))
            .or_else(|| text_at(row, &["job", "title"]))
            .unwrap_or(UNKNOWN);

        Some(Self {
            id,
            applicant_name: applicant_name.to_string(),
            job_title: job_title.to_string(),
            current_stage: text_at(row, &["status"]).unwrap_or_default().to_string(),
            applied_date: text_at(row, &["appliedAt"]).unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_applicant_mapping() {
        let row = serde_json::json!({
            "id": 11,
            "status": "reviewing",
            "appliedAt": "2024-06-01",
            "User": { "name": "Grace" },
            "Job": { "title": "SRE" }
        });
        let mapped = RecentApplicant::from_row(&row).unwrap();
        assert_eq!(mapped.applicant_name, "Grace");
        assert_eq!(mapped.job_title, "SRE");
        assert_eq!(mapped.current_stage, "reviewing");
        assert_eq!(mapped.applied_date, "2024-06-01");
    }

    #[test]
    fn test_recent_applicant_unknown_fallback() {
        let mapped = RecentApplicant::from_row(&serde_json::json!({ "id": 2 })).unwrap();
        assert_eq!(mapped.applicant_name, "Unknown");
        assert_eq!(mapped.job_title, "Unknown");
        assert!(RecentApplicant::from_row(&serde_json::json!({ "name": "x" })).is_none());
    }

    #[test]
    fn test_stats_accept_dynamic_status_keys() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalJobs": 4,
            "totalUsers": 9,
            "totalApplications": 12,
            "applicationsByStatus": { "pending": 5, "shortlisted": 7 }
        }))
        .unwrap();
        assert_eq!(stats.applications_by_status["shortlisted"], 7);
    }
}
