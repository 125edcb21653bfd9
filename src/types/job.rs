// src/types/job.rs
use serde::{Deserialize, Serialize};

use super::{Entity, Patch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiringStatus {
    #[default]
    Hiring,
    Applied,
    Interviewing,
    Hired,
    Rejected,
}

impl HiringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiringStatus::Hiring => "hiring",
            HiringStatus::Applied => "applied",
            HiringStatus::Interviewing => "interviewing",
            HiringStatus::Hired => "hired",
            HiringStatus::Rejected => "rejected",
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub status_options: Vec<String>,
    #[serde(default)]
    pub hiring_status: HiringStatus,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Job {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: String,
    pub short_description: String,
    pub responsibilities: String,
    pub requirements: String,
    pub benefits: String,
    pub deadline: String,
    pub hiring_status: HiringStatus,
    pub is_active: bool,
}

impl JobDraft {
    pub fn new(title: &str, company: &str) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            location: String::new(),
            employment_type: String::new(),
            salary_range: String::new(),
            short_description: String::new(),
            responsibilities: String::new(),
            requirements: String::new(),
            benefits: String::new(),
            deadline: String::new(),
            hiring_status: HiringStatus::Hiring,
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Job title is required".to_string());
        }
        if self.company.trim().is_empty() {
            return Err("Company is required".to_string());
        }
        Ok(())
    }
}

/// Partial job update; only the fields that are set go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hiring_status: Option<HiringStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Patch<Job> for JobPatch {
    fn apply_to(&self, job: &mut Job) {
        fn set(field: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        set(&mut job.title, &self.title);
        set(&mut job.company, &self.company);
        set(&mut job.location, &self.location);
        set(&mut job.employment_type, &self.employment_type);
        set(&mut job.salary_range, &self.salary_range);
        set(&mut job.short_description, &self.short_description);
        set(&mut job.responsibilities, &self.responsibilities);
        set(&mut job.requirements, &self.requirements);
        set(&mut job.benefits, &self.benefits);
        set(&mut job.deadline, &self.deadline);
        if let Some(status) = self.hiring_status {
            job.hiring_status = status;
        }
        if let Some(active) = self.is_active {
            job.is_active = active;
        }
    }
}
