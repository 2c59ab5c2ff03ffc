//! Incremental paginated search controller.
//!
//! [`SearchController`] owns the query state for one search screen. It
//! debounces field edits, cancels stale fetches, merges result pages while
//! de-duplicating by item identifier, and decides whether more pages may
//! exist. One generic controller serves every item kind; jobs and insights
//! differ only in their provider.
//!
//! # Lifecycle
//!
//! ```text
//!            refresh() / load_more_if_needed()        on_field_changed()
//!                     │ (zero delay)                      │ (debounced)
//!                     ▼                                   ▼
//!   Idle ──────▶ Scheduled ──── dispatch ────▶ Loading ──┬──▶ Idle (results)
//!     ▲              │                           │       └──▶ Idle (error)
//!     └── superseded ┘◀──────── superseded ──────┘
//! ```
//!
//! # Single flight
//!
//! At most one fetch is scheduled or in flight per controller. Every
//! trigger aborts the previous task and bumps a generation counter; a
//! result is applied only while its generation is still current, so a late
//! response never touches `items`, `error_message`, or `can_load_more`.
//! Scheduled tasks hold a [`Weak`] reference and stop once the controller
//! is gone.
//!
//! # Observing state
//!
//! Every change publishes an immutable [`SearchSnapshot`] on a
//! `tokio::sync::watch` channel; see [`SearchController::subscribe`].
//!
//! All triggering operations spawn onto the current tokio runtime and must
//! be called from within one.

use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::SearchItem;
use crate::provider::SearchProvider;
use crate::query::SearchQuery;

/// Quiet period applied to field edits before a fetch is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// How close to the end of the list the UI may get before the next page is requested.
pub const DEFAULT_PREFETCH_THRESHOLD: usize = 5;

/// Tuning knobs for a [`SearchController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub prefetch_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
        }
    }
}

/// Immutable view of the controller state, published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot<I> {
    /// Accumulated results across pages, in fetch order.
    pub items: Vec<I>,
    /// Page of the current (or last) fetch.
    pub page: u32,
    /// A fetch has been dispatched and has not completed.
    pub is_loading: bool,
    /// A fetch is waiting out its debounce delay.
    pub fetch_scheduled: bool,
    pub can_load_more: bool,
    pub error_message: Option<String>,
}

impl<I> SearchSnapshot<I> {
    /// Nothing scheduled and nothing in flight.
    pub fn is_idle(&self) -> bool {
        !self.is_loading && !self.fetch_scheduled
    }
}

struct State<P: SearchProvider> {
    query: P::Query,
    items: Vec<P::Item>,
    is_loading: bool,
    scheduled: bool,
    can_load_more: bool,
    error_message: Option<String>,
    auto_search_enabled: bool,
    generation: u64,
    /// Last page whose results reached `items`; 0 before the first one.
    applied_page: u32,
    task: Option<JoinHandle<()>>,
}

impl<P: SearchProvider> State<P> {
    fn snapshot(&self) -> SearchSnapshot<P::Item> {
        SearchSnapshot {
            items: self.items.clone(),
            page: self.query.page(),
            is_loading: self.is_loading,
            fetch_scheduled: self.scheduled,
            can_load_more: self.can_load_more,
            error_message: self.error_message.clone(),
        }
    }

    /// Abort whatever is pending or in flight and invalidate its result.
    fn supersede(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = false;
        self.scheduled = false;
        self.generation
    }

    /// Step the query back to the last applied page after a fetch was
    /// dropped, so the next load-more asks for the same page again.
    fn rewind_unapplied_page(&mut self) {
        let applied = self.applied_page.max(1);
        if self.query.page() > applied {
            self.query.set_page(applied);
        }
    }
}

struct Shared<P: SearchProvider> {
    provider: Arc<P>,
    config: SearchConfig,
    state: Mutex<State<P>>,
    events: watch::Sender<SearchSnapshot<P::Item>>,
}

impl<P: SearchProvider> Shared<P> {
    fn publish(&self, state: &State<P>) {
        self.events.send_replace(state.snapshot());
    }

    /// Cancel the previous fetch and schedule a new one after `delay`.
    fn schedule(self: &Arc<Self>, state: &mut State<P>, delay: Duration) {
        let generation = state.supersede();
        state.scheduled = true;

        let weak: Weak<Self> = Arc::downgrade(self);
        state.task = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(shared) = weak.upgrade() {
                shared.fetch(generation).await;
            }
        }));
        self.publish(state);
    }

    async fn fetch(self: Arc<Self>, generation: u64) {
        let query = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.scheduled = false;
            if !state.query.has_criteria() {
                debug!("search skipped: query has no criteria");
                state.task = None;
                self.publish(&state);
                return;
            }
            state.is_loading = true;
            state.error_message = None;
            self.publish(&state);
            state.query.clone()
        };

        debug!(page = query.page(), "dispatching search");
        let result = self.provider.search(&query).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(page = query.page(), "discarding superseded search result");
            return;
        }

        match result {
            Ok(page) => {
                let received = page.len();
                if query.page() <= 1 {
                    state.items = page;
                } else {
                    let mut seen: HashSet<String> =
                        state.items.iter().map(|i| i.id().to_string()).collect();
                    let fresh: Vec<P::Item> = page
                        .into_iter()
                        .filter(|item| seen.insert(item.id().to_string()))
                        .collect();
                    state.items.extend(fresh);
                }
                state.can_load_more = received >= query.page_size() as usize;
                state.applied_page = query.page();
                debug!(
                    page = query.page(),
                    received,
                    total = state.items.len(),
                    "search page applied"
                );
            }
            Err(err) if err.is_cancelled() => {
                debug!(page = query.page(), "search cancelled");
                state.rewind_unapplied_page();
            }
            Err(err) => {
                warn!(page = query.page(), error = %err, "search failed");
                state.error_message = Some(err.to_string());
                state.can_load_more = false;
            }
        }

        state.is_loading = false;
        state.task = None;
        self.publish(&state);
    }
}

/// Generic incremental search controller over a [`SearchProvider`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use job_searcher_core::provider::memory::InMemoryProvider;
/// use job_searcher_core::{JobPosting, JobQuery, SearchController};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider: InMemoryProvider<JobPosting, JobQuery> = InMemoryProvider::new(vec![]);
/// let controller = SearchController::new(Arc::new(provider), JobQuery::new("rust"));
///
/// controller.refresh();
/// controller.wait_idle().await;
/// assert!(controller.items().is_empty());
/// assert!(!controller.can_load_more());
/// # }
/// ```
pub struct SearchController<P: SearchProvider> {
    shared: Arc<Shared<P>>,
}

impl<P: SearchProvider> SearchController<P> {
    pub fn new(provider: Arc<P>, query: P::Query) -> Self {
        Self::with_config(provider, query, SearchConfig::default())
    }

    pub fn with_config(provider: Arc<P>, query: P::Query, config: SearchConfig) -> Self {
        let state = State {
            query,
            items: Vec::new(),
            is_loading: false,
            scheduled: false,
            can_load_more: true,
            error_message: None,
            auto_search_enabled: false,
            generation: 0,
            applied_page: 0,
            task: None,
        };
        let (events, _) = watch::channel(state.snapshot());
        Self {
            shared: Arc::new(Shared {
                provider,
                config,
                state: Mutex::new(state),
                events,
            }),
        }
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot<P::Item>> {
        self.shared.events.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot<P::Item> {
        self.shared.state.lock().snapshot()
    }

    pub fn config(&self) -> SearchConfig {
        self.shared.config
    }

    pub fn query(&self) -> P::Query {
        self.shared.state.lock().query.clone()
    }

    pub fn items(&self) -> Vec<P::Item> {
        self.shared.state.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().is_loading
    }

    pub fn can_load_more(&self) -> bool {
        self.shared.state.lock().can_load_more
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared.state.lock().error_message.clone()
    }

    pub fn auto_search_enabled(&self) -> bool {
        self.shared.state.lock().auto_search_enabled
    }

    /// Turn live search-as-you-type on or off.
    pub fn set_auto_search_enabled(&self, enabled: bool) {
        self.shared.state.lock().auto_search_enabled = enabled;
    }

    /// True iff the current query has at least one significant filter.
    pub fn has_criteria(&self) -> bool {
        self.shared.state.lock().query.has_criteria()
    }

    /// Start a new search session at page 1.
    ///
    /// Clears accumulated items, re-enables pagination, turns auto-search
    /// on, and dispatches immediately. Returns `false` (and does nothing)
    /// when the query has no criteria.
    pub fn refresh(&self) -> bool {
        let mut state = self.shared.state.lock();
        if !state.query.has_criteria() {
            warn!("refresh skipped: query has no search criteria");
            return false;
        }
        state.items.clear();
        state.can_load_more = true;
        state.query.set_page(1);
        state.applied_page = 0;
        state.auto_search_enabled = true;
        self.shared.schedule(&mut state, Duration::ZERO);
        true
    }

    /// React to an edit of a bound field.
    ///
    /// Schedules a debounced fetch, replacing any pending one, when
    /// auto-search is on and the query has criteria. Otherwise the edit
    /// stays local. Returns whether a fetch was scheduled.
    pub fn on_field_changed(&self) -> bool {
        let mut state = self.shared.state.lock();
        self.field_changed(&mut state)
    }

    /// Edit the query in place, then behave like [`on_field_changed`](Self::on_field_changed).
    ///
    /// A change to any filter (anything but the page) restarts at page 1.
    /// An edit that leaves the query untouched schedules nothing.
    pub fn update_query(&self, edit: impl FnOnce(&mut P::Query)) -> bool {
        let mut state = self.shared.state.lock();
        let before = state.query.clone();
        edit(&mut state.query);
        if before == state.query {
            return false;
        }
        if before.filters_differ(&state.query) {
            state.query.set_page(1);
            state.applied_page = 0;
        }
        if self.field_changed(&mut state) {
            return true;
        }
        self.shared.publish(&state);
        false
    }

    /// Replace the whole query; see [`update_query`](Self::update_query).
    pub fn set_query(&self, query: P::Query) -> bool {
        self.update_query(move |q| *q = query)
    }

    /// Request the next page when `current` is close to the end of the list.
    ///
    /// Fires only if `current` is among the last `prefetch_threshold` items,
    /// nothing is loading or scheduled, and the last page was full.
    pub fn load_more_if_needed(&self, current: &P::Item) -> bool {
        let mut state = self.shared.state.lock();
        if !state.query.has_criteria()
            || state.is_loading
            || state.scheduled
            || !state.can_load_more
        {
            return false;
        }
        let Some(index) = state.items.iter().position(|i| i.id() == current.id()) else {
            return false;
        };
        if index + self.shared.config.prefetch_threshold < state.items.len() {
            return false;
        }
        let next = state.query.page() + 1;
        state.query.set_page(next);
        debug!(page = next, "prefetching next page");
        self.shared.schedule(&mut state, Duration::ZERO);
        true
    }

    /// Cancel any scheduled or in-flight fetch without starting another.
    ///
    /// A cancelled load-more leaves the page where it was, so the same
    /// page is requested next time.
    pub fn cancel(&self) {
        let mut state = self.shared.state.lock();
        state.supersede();
        state.rewind_unapplied_page();
        self.shared.publish(&state);
    }

    /// Resolve once nothing is scheduled or in flight.
    pub async fn wait_idle(&self) {
        let mut events = self.subscribe();
        let _ = events.wait_for(|snapshot| snapshot.is_idle()).await;
    }

    fn field_changed(&self, state: &mut State<P>) -> bool {
        if !state.auto_search_enabled || !state.query.has_criteria() {
            return false;
        }
        let debounce = self.shared.config.debounce;
        self.shared.schedule(state, debounce);
        true
    }
}

impl<P: SearchProvider> Drop for SearchController<P> {
    fn drop(&mut self) {
        if let Some(task) = self.shared.state.lock().task.take() {
            task.abort();
        }
    }
}
