// src/stores/resource.rs
//! Generic paged store shared by the job, user and application lists.
//!
//! State moves `idle -> loading -> (success | error) -> idle`. A fetch started
//! while another is in flight is dropped. Every fetch carries a generation
//! ticket; a response whose ticket is no longer current is discarded, which is
//! how [`ResourceStore::search_all`] supersedes an older request.

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::services::{DeleteResource, DetailResource, ListQuery, ListResource, UpdateResource};
use crate::types::{Entity, Page, Pagination, Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
}

impl<T> ResourceState<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            is_loading: false,
            error: None,
            pagination: Pagination::empty(limit),
        }
    }

    /// Nothing to show and nothing went wrong: render the empty state.
    pub fn shows_empty_state(&self) -> bool {
        !self.is_loading && self.error.is_none() && self.items.is_empty()
    }
}

/// What a fetch call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response applied to the state.
    Loaded,
    /// Request failed; the error is recorded in the state.
    Failed,
    /// Another fetch was in flight; nothing was sent.
    Dropped,
    /// A newer fetch superseded this one; its response was discarded.
    Stale,
    /// The session had expired; the user is being sent to log in.
    SessionExpired,
}

struct Inner<T> {
    state: ResourceState<T>,
    generation: u64,
    /// Bumped whenever a list response replaces `items`.
    list_revision: u64,
}

pub struct ResourceStore<S: ListResource> {
    service: S,
    inner: RwLock<Inner<S::Item>>,
    default_limit: u32,
}

impl<S: ListResource> ResourceStore<S> {
    pub fn new(service: S, default_limit: u32) -> Self {
        Self {
            service,
            inner: RwLock::new(Inner {
                state: ResourceState::new(default_limit),
                generation: 0,
                list_revision: 0,
            }),
            default_limit,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub fn state(&self) -> ResourceState<S::Item> {
        self.inner.read().state.clone()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.inner.read().state.items.clone()
    }

    pub fn selected(&self) -> Option<S::Item> {
        self.inner.read().state.selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().state.is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().state.error.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.inner.read().state.pagination
    }

    pub fn shows_empty_state(&self) -> bool {
        self.inner.read().state.shows_empty_state()
    }

    pub fn clear_error(&self) {
        self.inner.write().state.error = None;
    }

    pub fn clear_selected(&self) {
        self.inner.write().state.selected = None;
    }

    /// Take a generation ticket. Without `supersede`, refuses while a fetch
    /// is in flight.
    fn begin(&self, action: &str, supersede: bool) -> Option<u64> {
        let mut inner = self.inner.write();
        if inner.state.is_loading && !supersede {
            debug!(
                "{}/{} dropped: a fetch is already in flight",
                self.service.label(),
                action
            );
            return None;
        }
        inner.generation += 1;
        inner.state.is_loading = true;
        inner.state.error = None;
        debug!(
            "{}/{}/start (generation {})",
            self.service.label(),
            action,
            inner.generation
        );
        Some(inner.generation)
    }

    /// Apply the result only if `ticket` is still the current generation.
    /// `replaces_list` marks list fetches, which overwrite `items` either way.
    fn settle<R>(
        &self,
        action: &str,
        ticket: u64,
        replaces_list: bool,
        result: ApiResult<R>,
        on_success: impl FnOnce(&mut ResourceState<S::Item>, R),
        on_failure: impl FnOnce(&mut ResourceState<S::Item>, &ApiError),
    ) -> FetchOutcome {
        let mut inner = self.inner.write();
        if inner.generation != ticket {
            debug!(
                "{}/{} discarded stale response (generation {} < {})",
                self.service.label(),
                action,
                ticket,
                inner.generation
            );
            return FetchOutcome::Stale;
        }
        if replaces_list && !matches!(result, Err(ApiError::SessionExpired)) {
            inner.list_revision += 1;
        }

        let state = &mut inner.state;
        state.is_loading = false;
        match result {
            Ok(value) => {
                on_success(state, value);
                state.error = None;
                debug!("{}/{}/success", self.service.label(), action);
                FetchOutcome::Loaded
            }
            Err(ApiError::SessionExpired) => {
                debug!("{}/{} cancelled: session expired", self.service.label(), action);
                FetchOutcome::SessionExpired
            }
            Err(e) => {
                warn!("{}/{} failed: {}", self.service.label(), action, e);
                on_failure(state, &e);
                state.error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch one page. Dropped (no request, no state change) while another
    /// fetch is in flight.
    pub async fn fetch_all(&self, query: ListQuery) -> FetchOutcome {
        match self.begin("fetchAll", false) {
            Some(ticket) => self.run_list(ticket, query).await,
            None => FetchOutcome::Dropped,
        }
    }

    /// Fetch one page, superseding any fetch in flight. The older response is
    /// discarded when it arrives.
    pub async fn search_all(&self, query: ListQuery) -> FetchOutcome {
        match self.begin("searchAll", true) {
            Some(ticket) => self.run_list(ticket, query).await,
            None => FetchOutcome::Dropped,
        }
    }

    async fn run_list(&self, ticket: u64, query: ListQuery) -> FetchOutcome {
        let result = self.service.list(&query).await;
        let limit = query.limit;
        let page = query.page;

        self.settle(
            "fetchAll",
            ticket,
            true,
            result,
            |state, fetched: Page<S::Item>| {
                if fetched.current_page != page {
                    debug!(
                        "server reported page {} for requested page {}",
                        fetched.current_page, page
                    );
                }
                let mut items = fetched.items;
                items.truncate(limit as usize);
                state.items = items;
                state.pagination = Pagination::new(fetched.total, fetched.total_pages, page, limit);
            },
            |state, _| state.items.clear(),
        )
    }
}

impl<S: DetailResource> ResourceStore<S> {
    /// Load one record into `selected`. Shares the in-flight guard with
    /// [`fetch_all`](Self::fetch_all).
    pub async fn fetch_by_id(&self, id: i64) -> FetchOutcome {
        let Some(ticket) = self.begin("fetchById", false) else {
            return FetchOutcome::Dropped;
        };
        let result = self.service.get(id).await;
        self.settle(
            "fetchById",
            ticket,
            false,
            result,
            |state, item| state.selected = Some(item),
            |state, _| state.selected = None,
        )
    }
}

impl<S: UpdateResource> ResourceStore<S> {
    /// Optimistically merge `patch` into the listed record, then confirm with
    /// the server. On failure only that record is put back, and only while the
    /// list is still the one the patch was applied to: a fetch that landed in
    /// the meantime wins, and a record deleted in the meantime stays deleted.
    pub async fn update(&self, id: i64, patch: S::Patch) -> ApiResult<Option<S::Item>> {
        let (previous, revision) = {
            let mut inner = self.inner.write();
            inner.state.error = None;
            let previous = inner.state.items.iter().find(|item| item.id() == id).cloned();
            for item in inner.state.items.iter_mut().filter(|item| item.id() == id) {
                patch.apply_to(item);
            }
            (previous, inner.list_revision)
        };

        let result = self.service.update(id, &patch).await;

        let mut inner = self.inner.write();
        match result {
            Ok(updated) => {
                if let Some(fresh) = &updated {
                    for item in inner.state.items.iter_mut().filter(|item| item.id() == id) {
                        *item = fresh.clone();
                    }
                }
                inner.state.selected = updated.clone();
                debug!("{}/update/success id={}", self.service.label(), id);
                Ok(updated)
            }
            Err(e) => {
                if inner.list_revision == revision {
                    if let Some(previous) = previous {
                        for item in inner.state.items.iter_mut().filter(|item| item.id() == id) {
                            *item = previous.clone();
                        }
                    }
                } else {
                    debug!(
                        "{}/update id={} not rolled back: list refetched meanwhile",
                        self.service.label(),
                        id
                    );
                }
                if !e.is_session_expired() {
                    inner.state.error = Some(e.to_string());
                }
                warn!("{}/update id={} rolled back: {}", self.service.label(), id, e);
                Err(e)
            }
        }
    }
}

impl<S: DeleteResource> ResourceStore<S> {
    /// Remove a record once the server confirms the delete.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.inner.write().state.error = None;

        let result = self.service.delete(id).await;

        let mut inner = self.inner.write();
        match result {
            Ok(()) => {
                let before = inner.state.items.len();
                inner.state.items.retain(|item| item.id() != id);
                inner.state.pagination.total = inner.state.pagination.total.saturating_sub(1);
                if inner.state.selected.as_ref().map(|item| item.id()) == Some(id) {
                    inner.state.selected = None;
                }
                debug!(
                    "{}/delete/success id={} (removed {} listed)",
                    self.service.label(),
                    id,
                    before - inner.state.items.len()
                );
                Ok(())
            }
            Err(e) => {
                if !e.is_session_expired() {
                    inner.state.error = Some(e.to_string());
                }
                warn!("{}/delete id={} failed: {}", self.service.label(), id, e);
                Err(e)
            }
        }
    }
}
