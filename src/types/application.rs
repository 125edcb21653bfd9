// src/types/application.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Entity, Patch};

// ===== Status vocabulary =====

/// Status of an application, as the backend spells it.
///
/// Which spellings are valid depends on the backend contract, see [`StatusSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationStatus(String);

impl ApplicationStatus {
    pub fn new(status: &str) -> Self {
        Self(status.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

/// The ordered list of statuses a backend accepts. The first one is the
/// status a fresh application starts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet {
    name: String,
    statuses: Vec<ApplicationStatus>,
}

impl StatusSet {
    pub fn standard() -> Self {
        Self::build("standard", &["pending", "reviewing", "accepted", "rejected"])
    }

    pub fn legacy() -> Self {
        Self::build("legacy", &["received", "shortlisted", "rejected", "hired"])
    }

    /// A set from an explicit list, e.g. `"applied,screening,offer,closed"`.
    pub fn custom(statuses: &[&str]) -> Result<Self, String> {
        let set = Self::build("custom", statuses);
        if set.statuses.is_empty() {
            return Err("Status set must contain at least one status".to_string());
        }
        Ok(set)
    }

    fn build(name: &str, statuses: &[&str]) -> Self {
        let mut unique: Vec<ApplicationStatus> = Vec::with_capacity(statuses.len());
        for status in statuses.iter().map(|s| ApplicationStatus::new(s)) {
            if !status.as_str().is_empty() && !unique.contains(&status) {
                unique.push(status);
            }
        }
        Self {
            name: name.to_string(),
            statuses: unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statuses(&self) -> &[ApplicationStatus] {
        &self.statuses
    }

    pub fn initial(&self) -> &ApplicationStatus {
        &self.statuses[0]
    }

    pub fn contains(&self, status: &ApplicationStatus) -> bool {
        self.statuses.contains(status)
    }

    pub fn parse(&self, raw: &str) -> Result<ApplicationStatus, String> {
        let status = ApplicationStatus::new(raw);
        if self.contains(&status) {
            Ok(status)
        } else {
            Err(format!(
                "Unknown application status '{}'. Expected one of: {}",
                raw,
                self.statuses
                    .iter()
                    .map(ApplicationStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    }
}

impl Default for StatusSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for StatusSet {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "standard" | "default" => Ok(Self::standard()),
            "legacy" => Ok(Self::legacy()),
            list if list.contains(',') => {
                Self::custom(&list.split(',').collect::<Vec<_>>())
            }
            other => Err(format!("Unknown status set: {}", other)),
        }
    }
}

// ===== Records =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfileRef {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRef {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default, alias = "Profile")]
    pub profile: Option<ApplicantProfileRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub user_id: i64,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, alias = "User")]
    pub user: Option<ApplicantRef>,
    #[serde(default, alias = "Job")]
    pub job: Option<JobRef>,
}

impl Entity for Application {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for `POST /applications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl ApplicationDraft {
    pub fn new(job_id: i64, user_id: i64) -> Self {
        Self {
            job_id,
            user_id,
            resume_url: None,
            cover_letter: None,
            metadata: None,
        }
    }

    pub fn with_cover_letter(mut self, cover_letter: &str) -> Self {
        let trimmed = cover_letter.trim();
        self.cover_letter = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_resume_url(mut self, resume_url: &str) -> Self {
        self.resume_url = Some(resume_url.to_string());
        self
    }
}

/// Body of `PUT /applications/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

impl Patch<Application> for StatusUpdate {
    fn apply_to(&self, application: &mut Application) {
        application.status = self.status.clone();
    }
}

/// Column the admin application search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationFilter {
    Users,
    Company,
    Job,
}

impl ApplicationFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationFilter::Users => "users",
            ApplicationFilter::Company => "company",
            ApplicationFilter::Job => "job",
        }
    }
}

impl FromStr for ApplicationFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(ApplicationFilter::Users),
            "company" => Ok(ApplicationFilter::Company),
            "job" | "jobs" => Ok(ApplicationFilter::Job),
            other => Err(format!("Unknown application filter: {}", other)),
        }
    }
}
