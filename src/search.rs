// src/search.rs
//! Debounced search and page navigation.
//!
//! Nothing here sleeps or spawns: callers feed in keystrokes with the instant
//! they happened and poll with the current instant, so tests drive time by
//! hand.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::services::ListQuery;
use crate::types::Pagination;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a keystroke. Replaces whatever was pending and restarts the
    /// delay.
    pub fn input(&mut self, query: &str, at: Instant) {
        self.pending = Some((query.trim().to_string(), at));
    }

    /// When the pending query becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the latest query once `delay` has passed since its keystroke.
    /// A query equal to the last one released is swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        let (query, _) = self.pending.take()?;
        if self.last_emitted.as_deref() == Some(query.as_str()) {
            return None;
        }
        debug!("search settled on '{}'", query);
        self.last_emitted = Some(query.clone());
        Some(query)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// A settled search always starts from the first page.
pub fn search_query(search: &str, limit: u32) -> ListQuery {
    ListQuery::new(1, limit).with_search(search)
}

/// Page number from a user-supplied value; anything unusable means page 1.
pub fn page_from_param(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

/// The page to fetch when the user asks for `page`, or `None` when it is out
/// of range or already showing.
pub fn go_to_page(pagination: &Pagination, page: u32) -> Option<u32> {
    if page < 1 || page > pagination.total_pages || page == pagination.current_page {
        None
    } else {
        Some(page)
    }
}

pub fn next_page(pagination: &Pagination) -> Option<u32> {
    go_to_page(pagination, pagination.current_page.saturating_add(1))
}

pub fn previous_page(pagination: &Pagination) -> Option<u32> {
    go_to_page(pagination, pagination.current_page.saturating_sub(1))
}
