//! In-memory [`SearchProvider`] for tests and offline demos.
//!
//! Serves pages out of a fixed catalog, keeps the saved collection in a
//! `Vec`, and can simulate latency and one-shot failures. Every search is
//! recorded so callers can assert on what was dispatched.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::error::ProviderError;
use crate::models::SearchItem;
use crate::query::SearchQuery;

use super::SearchProvider;

type Matcher<I, Q> = Box<dyn Fn(&Q, &I) -> bool + Send + Sync>;

/// Operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Save,
    FetchSaved,
    DeleteSaved,
}

/// In-memory provider over a fixed catalog.
pub struct InMemoryProvider<I, Q> {
    catalog: RwLock<Vec<I>>,
    saved: RwLock<Vec<I>>,
    matcher: Matcher<I, Q>,
    latency: Duration,
    failures: Mutex<VecDeque<(Operation, ProviderError)>>,
    searches: Mutex<Vec<Q>>,
}

impl<I: SearchItem, Q: SearchQuery> InMemoryProvider<I, Q> {
    /// A provider whose every item matches every query.
    pub fn new(catalog: Vec<I>) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            saved: RwLock::new(Vec::new()),
            matcher: Box::new(|_, _| true),
            latency: Duration::ZERO,
            failures: Mutex::new(VecDeque::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Restrict search results to items accepted by `matcher`.
    pub fn with_matcher(
        mut self,
        matcher: impl Fn(&Q, &I) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Delay every operation by `latency` (honours paused tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pre-populate the saved collection.
    pub fn with_saved(self, saved: Vec<I>) -> Self {
        *self.saved.write() = saved;
        self
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ProviderError) {
        self.failures.lock().push_back((operation, error));
    }

    /// Every query passed to [`search`](SearchProvider::search), in call order.
    pub fn recorded_searches(&self) -> Vec<Q> {
        self.searches.lock().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().len()
    }

    pub fn saved_ids(&self) -> Vec<String> {
        self.saved.read().iter().map(|i| i.id().to_string()).collect()
    }

    async fn simulate(&self, operation: Operation) -> Result<(), ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut failures = self.failures.lock();
        match failures.iter().position(|(op, _)| *op == operation) {
            Some(index) => match failures.remove(index) {
                Some((_, err)) => Err(err),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<I: SearchItem, Q: SearchQuery> SearchProvider for InMemoryProvider<I, Q> {
    type Item = I;
    type Query = Q;

    async fn search(&self, query: &Q) -> Result<Vec<I>, ProviderError> {
        self.searches.lock().push(query.clone());
        self.simulate(Operation::Search).await?;

        let size = query.page_size().max(1) as usize;
        let skip = query.page().saturating_sub(1) as usize * size;
        let catalog = self.catalog.read();
        Ok(catalog
            .iter()
            .filter(|item| (self.matcher)(query, item))
            .skip(skip)
            .take(size)
            .cloned()
            .collect())
    }

    async fn save(&self, item: &I) -> Result<Option<I>, ProviderError> {
        self.simulate(Operation::Save).await?;
        let mut saved = self.saved.write();
        if !saved.iter().any(|s| s.id() == item.id()) {
            saved.push(item.clone());
        }
        Ok(Some(item.clone()))
    }

    async fn fetch_saved(&self) -> Result<Vec<I>, ProviderError> {
        self.simulate(Operation::FetchSaved).await?;
        Ok(self.saved.read().clone())
    }

    async fn delete_saved(&self, id: &str) -> Result<(), ProviderError> {
        self.simulate(Operation::DeleteSaved).await?;
        let mut saved = self.saved.write();
        let before = saved.len();
        saved.retain(|s| s.id() != id);
        if saved.len() == before {
            return Err(ProviderError::Server {
                status: 404,
                body: format!("no saved item with id {}", id),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobPosting, JobPostingFields};
    use crate::query::JobQuery;

    fn job(id: &str, title: &str) -> JobPosting {
        JobPosting::from(JobPostingFields {
            job_id: Some(id.to_string()),
            title: title.to_string(),
            ..Default::default()
        })
    }

    fn catalog(n: usize) -> Vec<JobPosting> {
        (1..=n)
            .map(|i| job(&format!("j{}", i), &format!("Job {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_search_pages_through_catalog() {
        let provider: InMemoryProvider<JobPosting, JobQuery> = InMemoryProvider::new(catalog(5));
        let mut query = JobQuery::new("job").with_page_size(2);

        let first = provider.search(&query).await.unwrap();
        assert_eq!(first.iter().map(|j| j.id()).collect::<Vec<_>>(), ["j1", "j2"]);

        query.page = 3;
        let last = provider.search(&query).await.unwrap();
        assert_eq!(last.iter().map(|j| j.id()).collect::<Vec<_>>(), ["j5"]);

        query.page = 4;
        assert!(provider.search(&query).await.unwrap().is_empty());
        assert_eq!(provider.search_count(), 3);
    }

    #[tokio::test]
    async fn test_matcher_filters_results() {
        let provider = InMemoryProvider::new(vec![job("a", "Rust Dev"), job("b", "Go Dev")])
            .with_matcher(|q: &JobQuery, j: &JobPosting| {
                j.title.to_lowercase().contains(&q.q.to_lowercase())
            });
        let hits = provider.search(&JobQuery::new("rust")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "a");
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let provider: InMemoryProvider<JobPosting, JobQuery> = InMemoryProvider::new(catalog(1));
        provider.fail_next(Operation::Search, ProviderError::Network("offline".into()));
        let query = JobQuery::new("x");
        assert!(provider.search(&query).await.is_err());
        assert!(provider.search(&query).await.is_ok());
    }

    #[tokio::test]
    async fn test_saved_round_trip() {
        let provider: InMemoryProvider<JobPosting, JobQuery> = InMemoryProvider::new(Vec::new());
        let item = job("s1", "Saved");
        provider.save(&item).await.unwrap();
        provider.save(&item).await.unwrap();
        assert_eq!(provider.saved_ids(), ["s1"]);

        provider.delete_saved("s1").await.unwrap();
        assert!(provider.fetch_saved().await.unwrap().is_empty());

        let err = provider.delete_saved("s1").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
