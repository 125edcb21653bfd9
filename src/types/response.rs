use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

// ===== Pagination =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn empty(limit: u32) -> Self {
        Self {
            total: 0,
            total_pages: 0,
            current_page: 1,
            limit,
        }
    }

    /// Pagination for a fetched page. `current_page` is clamped to
    /// `[1, total_pages]` (or 1 when there are no pages).
    pub fn new(total: u64, total_pages: u32, current_page: u32, limit: u32) -> Self {
        let upper = total_pages.max(1);
        Self {
            total,
            total_pages,
            current_page: current_page.clamp(1, upper),
            limit,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of a list endpoint, normalized across response shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T> Page<T> {
    /// Treat a bare array as a single page holding everything.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            total_pages: u32::from(total > 0),
            current_page: 1,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedEnvelope<T> {
    #[serde(alias = "jobs", alias = "users", alias = "applications")]
    items: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    current_page: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Paged(PagedEnvelope<T>),
    Bare(Vec<T>),
}

/// Parse `{jobs|users|applications: [...], total, totalPages, currentPage}`
/// or a bare array.
pub fn parse_page<T: DeserializeOwned>(body: serde_json::Value) -> ApiResult<Page<T>> {
    let parsed: ListBody<T> = serde_json::from_value(body)?;
    Ok(match parsed {
        ListBody::Bare(items) => Page::single(items),
        ListBody::Paged(envelope) => {
            let total = envelope.total.unwrap_or(envelope.items.len() as u64);
            Page {
                total,
                total_pages: envelope.total_pages.unwrap_or(u32::from(total > 0)),
                current_page: envelope.current_page.unwrap_or(1),
                items: envelope.items,
            }
        }
    })
}

// ===== Write envelopes =====

/// Keys a write response may carry alongside (or instead of) the record.
const ENVELOPE_ONLY_KEYS: &[&str] = &["message", "success"];

fn carries_no_entity(body: &serde_json::Value) -> bool {
    match body {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map
            .keys()
            .all(|key| ENVELOPE_ONLY_KEYS.contains(&key.as_str())),
        _ => false,
    }
}

/// Pull the entity out of `{message?, <key>: {...}}` for the first of `keys`
/// present, or read the body as the bare entity. `Ok(None)` when the body
/// carries no entity at all (e.g. `{ "message": "ok" }`); a record that is
/// present but malformed is a decode error.
pub fn extract_entity<T: DeserializeOwned>(
    body: serde_json::Value,
    keys: &[&str],
) -> ApiResult<Option<T>> {
    if carries_no_entity(&body) {
        return Ok(None);
    }

    for key in keys {
        if let Some(inner) = body.get(key) {
            if inner.is_null() {
                return Ok(None);
            }
            return serde_json::from_value(inner.clone())
                .map(Some)
                .map_err(ApiError::from);
        }
    }

    serde_json::from_value(body)
        .map(Some)
        .map_err(ApiError::from)
}

/// Like [`extract_entity`] but the entity is mandatory.
pub fn require_entity<T: DeserializeOwned>(body: serde_json::Value, keys: &[&str]) -> ApiResult<T> {
    extract_entity(body, keys)?.ok_or_else(|| ApiError::Decode {
        detail: "response did not contain the expected record".to_string(),
    })
}
