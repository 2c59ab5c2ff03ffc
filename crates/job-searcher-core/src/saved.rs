//! Saved-items list controller.
//!
//! Loads the whole saved collection once per visit and applies removals
//! only after the server confirms them. A failed removal leaves the list as
//! it was and surfaces `error_message`; the remedy is a manual reload.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::models::SearchItem;
use crate::provider::SearchProvider;

/// Immutable view of the saved list, published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSnapshot<I> {
    pub items: Vec<I>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

struct SavedState<I> {
    items: Vec<I>,
    is_loading: bool,
    error_message: Option<String>,
}

impl<I: Clone> SavedState<I> {
    fn snapshot(&self) -> SavedSnapshot<I> {
        SavedSnapshot {
            items: self.items.clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
        }
    }
}

/// Controller for a saved-items screen.
pub struct SavedItemsController<P: SearchProvider> {
    provider: Arc<P>,
    state: Mutex<SavedState<P::Item>>,
    events: watch::Sender<SavedSnapshot<P::Item>>,
}

/// Clears the loading flag if a `load` future is dropped mid-flight.
struct LoadingGuard<'a, P: SearchProvider> {
    controller: &'a SavedItemsController<P>,
    armed: bool,
}

impl<P: SearchProvider> Drop for LoadingGuard<'_, P> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.controller.state.lock();
            state.is_loading = false;
            self.controller.publish(&state);
        }
    }
}

impl<P: SearchProvider> SavedItemsController<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let state = SavedState {
            items: Vec::new(),
            is_loading: false,
            error_message: None,
        };
        let (events, _) = watch::channel(state.snapshot());
        Self {
            provider,
            state: Mutex::new(state),
            events,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SavedSnapshot<P::Item>> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SavedSnapshot<P::Item> {
        self.state.lock().snapshot()
    }

    pub fn items(&self) -> Vec<P::Item> {
        self.state.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.lock().error_message.clone()
    }

    fn publish(&self, state: &SavedState<P::Item>) {
        self.events.send_replace(state.snapshot());
    }

    /// Fetch the saved collection, replacing the local list.
    ///
    /// A call made while another load is in flight does nothing and
    /// returns `false`.
    pub async fn load(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.is_loading {
                debug!("saved load already in flight");
                return false;
            }
            state.is_loading = true;
            state.error_message = None;
            self.publish(&state);
        }
        let mut guard = LoadingGuard {
            controller: self,
            armed: true,
        };

        let result = self.provider.fetch_saved().await;

        guard.armed = false;
        let mut state = self.state.lock();
        match result {
            Ok(items) => {
                debug!(count = items.len(), "saved items loaded");
                state.items = items;
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                warn!(error = %err, "loading saved items failed");
                state.error_message = Some(err.to_string());
            }
        }
        state.is_loading = false;
        self.publish(&state);
        true
    }

    /// Unsave `item`. The local list changes only once the server confirms.
    pub async fn remove(&self, item: &P::Item) -> Result<(), ProviderError> {
        self.remove_by_id(item.id()).await
    }

    /// Unsave by identifier; see [`remove`](Self::remove).
    pub async fn remove_by_id(&self, id: &str) -> Result<(), ProviderError> {
        match self.provider.delete_saved(id).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.items.retain(|i| i.id() != id);
                state.error_message = None;
                self.publish(&state);
                debug!(id, "saved item removed");
                Ok(())
            }
            Err(err) => {
                if !err.is_cancelled() {
                    warn!(id, error = %err, "removing saved item failed");
                    let mut state = self.state.lock();
                    state.error_message = Some(err.to_string());
                    self.publish(&state);
                }
                Err(err)
            }
        }
    }

    /// Save `item` and add the server's copy (or `item` itself when the
    /// server echoes nothing) to the local list unless already present.
    pub async fn save(&self, item: &P::Item) -> Result<P::Item, ProviderError> {
        match self.provider.save(item).await {
            Ok(echo) => {
                let stored = echo.unwrap_or_else(|| item.clone());
                let mut state = self.state.lock();
                if !state.items.iter().any(|i| i.id() == stored.id()) {
                    state.items.push(stored.clone());
                }
                state.error_message = None;
                self.publish(&state);
                Ok(stored)
            }
            Err(err) => {
                if !err.is_cancelled() {
                    warn!(id = item.id(), error = %err, "saving item failed");
                    let mut state = self.state.lock();
                    state.error_message = Some(err.to_string());
                    self.publish(&state);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobPosting, JobPostingFields};
    use crate::provider::memory::{InMemoryProvider, Operation};
    use crate::query::JobQuery;
    use std::time::Duration;

    fn job(id: &str) -> JobPosting {
        JobPosting::from(JobPostingFields {
            job_id: Some(id.to_string()),
            title: format!("Job {}", id),
            ..Default::default()
        })
    }

    fn provider(saved: Vec<JobPosting>) -> Arc<InMemoryProvider<JobPosting, JobQuery>> {
        Arc::new(InMemoryProvider::new(Vec::new()).with_saved(saved))
    }

    #[tokio::test]
    async fn test_load_replaces_items() {
        let controller = SavedItemsController::new(provider(vec![job("a"), job("b")]));
        assert!(controller.load().await);
        let ids: Vec<String> = controller.items().iter().map(|j| j.id().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let controller = SavedItemsController::new(provider(Vec::new()));
        controller.load().await;
        assert!(controller.items().is_empty());
        assert!(controller.error_message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_load_is_noop() {
        let provider = Arc::new(
            InMemoryProvider::<JobPosting, JobQuery>::new(Vec::new())
                .with_saved(vec![job("a")])
                .with_latency(Duration::from_millis(50)),
        );
        let controller = SavedItemsController::new(provider);
        let (first, second) = tokio::join!(controller.load(), controller.load());
        assert!(first);
        assert!(!second);
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let provider = provider(vec![job("a")]);
        provider.fail_next(Operation::FetchSaved, ProviderError::Network("offline".into()));
        let controller = SavedItemsController::new(provider);
        controller.load().await;
        assert!(controller.items().is_empty());
        assert_eq!(
            controller.error_message().as_deref(),
            Some("network error: offline")
        );
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_load_clears_loading_flag() {
        let provider = Arc::new(
            InMemoryProvider::<JobPosting, JobQuery>::new(Vec::new())
                .with_latency(Duration::from_millis(100)),
        );
        let controller = SavedItemsController::new(provider);
        let outcome =
            tokio::time::timeout(Duration::from_millis(10), controller.load()).await;
        assert!(outcome.is_err());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_remove_success_drops_item() {
        let controller = SavedItemsController::new(provider(vec![job("a"), job("b")]));
        controller.load().await;
        controller.remove(&job("a")).await.unwrap();
        let ids: Vec<String> = controller.items().iter().map(|j| j.id().to_string()).collect();
        assert_eq!(ids, ["b"]);
        assert!(controller.error_message().is_none());
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_item() {
        let provider = provider(vec![job("a"), job("b")]);
        let controller = SavedItemsController::new(provider.clone());
        controller.load().await;

        provider.fail_next(
            Operation::DeleteSaved,
            ProviderError::Server {
                status: 500,
                body: String::new(),
            },
        );
        let err = controller.remove(&job("a")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(controller.items().len(), 2);
        assert_eq!(
            controller.error_message().as_deref(),
            Some("the server had a problem (HTTP 500)")
        );
    }

    #[tokio::test]
    async fn test_save_adds_once() {
        let provider = provider(Vec::new());
        let controller = SavedItemsController::new(provider.clone());
        controller.save(&job("x")).await.unwrap();
        controller.save(&job("x")).await.unwrap();
        assert_eq!(controller.items().len(), 1);
        assert_eq!(provider.saved_ids(), ["x"]);
    }
}
