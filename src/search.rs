//! `jobs search` and `jobs insights`.
//!
//! Both commands drive the real [`SearchController`]: one `refresh()`, then
//! `load_more_if_needed(last)` until the requested number of pages has been
//! fetched or the controller reports no more results.

use std::sync::Arc;

use anyhow::{bail, Result};
use job_searcher_core::{SearchController, SearchProvider};
use tracing::{info, warn};

use crate::api::{Resource, RestProvider};
use crate::config::Config;
use crate::render::{print_items, Listing, OutputFormat};

/// Outcome of a multi-page collection run.
#[derive(Debug)]
pub struct Collected<I> {
    pub items: Vec<I>,
    pub pages: u32,
    pub can_load_more: bool,
    /// Error that stopped pagination after at least one page succeeded.
    pub partial_error: Option<String>,
}

/// Fetch up to `max_pages` pages through `controller`.
///
/// Fails when the query has no criteria or when the first page fails. A
/// failure on a later page keeps what was already collected.
pub async fn collect_pages<P: SearchProvider>(
    controller: &SearchController<P>,
    max_pages: u32,
) -> Result<Collected<P::Item>> {
    let max_pages = max_pages.max(1);
    if !controller.refresh() {
        bail!("nothing to search for: give a search term or at least one filter");
    }
    controller.wait_idle().await;
    let mut pages = 1;

    loop {
        let snapshot = controller.snapshot();
        if let Some(message) = snapshot.error_message {
            if pages == 1 {
                bail!("search failed: {}", message);
            }
            warn!(page = pages, error = %message, "stopping after partial results");
            return Ok(Collected {
                items: snapshot.items,
                pages: pages - 1,
                can_load_more: false,
                partial_error: Some(message),
            });
        }
        if pages >= max_pages || !snapshot.can_load_more {
            return Ok(Collected {
                items: snapshot.items,
                pages,
                can_load_more: snapshot.can_load_more,
                partial_error: None,
            });
        }
        let advanced = match snapshot.items.last() {
            Some(last) => controller.load_more_if_needed(last),
            None => false,
        };
        if !advanced {
            return Ok(Collected {
                items: controller.items(),
                pages,
                can_load_more: controller.can_load_more(),
                partial_error: None,
            });
        }
        controller.wait_idle().await;
        pages += 1;
    }
}

/// Run a search against the REST API and print the results.
pub async fn run_search<R: Resource + Listing>(
    config: &Config,
    query: R::Query,
    max_pages: u32,
    format: OutputFormat,
) -> Result<()> {
    let provider = Arc::new(RestProvider::<R>::from_config(&config.api)?);
    let controller =
        SearchController::with_config(provider, query, config.search.controller_config());

    let collected = collect_pages(&controller, max_pages).await?;
    info!(
        items = collected.items.len(),
        pages = collected.pages,
        more = collected.can_load_more,
        "search finished"
    );
    print_items(&collected.items, format)?;
    if let Some(message) = collected.partial_error {
        eprintln!("warning: results are incomplete: {}", message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_searcher_core::models::JobPostingFields;
    use job_searcher_core::provider::memory::{InMemoryProvider, Operation};
    use job_searcher_core::{JobPosting, JobQuery, ProviderError, SearchItem};

    fn catalog(n: usize) -> Vec<JobPosting> {
        (1..=n)
            .map(|i| {
                JobPosting::from(JobPostingFields {
                    job_id: Some(format!("j{}", i)),
                    title: format!("Job {}", i),
                    ..Default::default()
                })
            })
            .collect()
    }

    fn controller(
        provider: Arc<InMemoryProvider<JobPosting, JobQuery>>,
        page_size: u32,
    ) -> SearchController<InMemoryProvider<JobPosting, JobQuery>> {
        SearchController::new(provider, JobQuery::new("job").with_page_size(page_size))
    }

    #[tokio::test]
    async fn test_collects_requested_pages() {
        let provider = Arc::new(InMemoryProvider::new(catalog(10)));
        let collected = collect_pages(&controller(provider.clone(), 3), 2).await.unwrap();
        assert_eq!(collected.items.len(), 6);
        assert_eq!(collected.pages, 2);
        assert!(collected.can_load_more);
        assert_eq!(provider.search_count(), 2);
    }

    #[tokio::test]
    async fn test_stops_at_short_page() {
        let provider = Arc::new(InMemoryProvider::new(catalog(4)));
        let collected = collect_pages(&controller(provider.clone(), 3), 10).await.unwrap();
        let ids: Vec<&str> = collected.items.iter().map(|j| j.id()).collect();
        assert_eq!(ids, ["j1", "j2", "j3", "j4"]);
        assert!(!collected.can_load_more);
        assert_eq!(provider.search_count(), 2);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_an_error() {
        let provider = Arc::new(InMemoryProvider::new(catalog(4)));
        provider.fail_next(Operation::Search, ProviderError::Network("offline".into()));
        let err = collect_pages(&controller(provider, 3), 2).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    /// Serves `ok_pages` pages from the catalog, then fails.
    struct Flaky {
        inner: InMemoryProvider<JobPosting, JobQuery>,
        ok_pages: u32,
    }

    #[async_trait::async_trait]
    impl SearchProvider for Flaky {
        type Item = JobPosting;
        type Query = JobQuery;

        async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, ProviderError> {
            if query.page > self.ok_pages {
                return Err(ProviderError::Server {
                    status: 502,
                    body: String::new(),
                });
            }
            self.inner.search(query).await
        }

        async fn save(&self, item: &JobPosting) -> Result<Option<JobPosting>, ProviderError> {
            self.inner.save(item).await
        }

        async fn fetch_saved(&self) -> Result<Vec<JobPosting>, ProviderError> {
            self.inner.fetch_saved().await
        }

        async fn delete_saved(&self, id: &str) -> Result<(), ProviderError> {
            self.inner.delete_saved(id).await
        }
    }

    #[tokio::test]
    async fn test_later_failure_keeps_partial_results() {
        let provider = Arc::new(Flaky {
            inner: InMemoryProvider::new(catalog(10)),
            ok_pages: 2,
        });
        let c = SearchController::new(provider, JobQuery::new("job").with_page_size(3));
        let collected = collect_pages(&c, 5).await.unwrap();
        assert_eq!(collected.items.len(), 6);
        assert_eq!(collected.pages, 2);
        assert!(!collected.can_load_more);
        assert_eq!(
            collected.partial_error.as_deref(),
            Some("the server had a problem (HTTP 502)")
        );
    }

    #[tokio::test]
    async fn test_no_criteria_is_rejected() {
        let provider = Arc::new(InMemoryProvider::new(catalog(4)));
        let c = SearchController::new(provider.clone(), JobQuery::default());
        assert!(collect_pages(&c, 1).await.is_err());
        assert_eq!(provider.search_count(), 0);
    }
}
