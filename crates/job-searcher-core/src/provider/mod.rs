//! Remote provider abstraction.
//!
//! The [`SearchProvider`] trait is everything the controllers consume from
//! the remote API: paged search, save, list saved, delete saved. The REST
//! implementations live in the application crate; [`memory::InMemoryProvider`]
//! backs tests and offline demos.
//!
//! Implementations must be `Send + Sync` so controllers can call them from
//! spawned tasks. Dropping a returned future must abandon the underlying
//! request; controllers rely on that for cancellation.

pub mod memory;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::SearchItem;
use crate::query::SearchQuery;

/// A remote source of searchable, saveable items.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`search`](SearchProvider::search) | One ordered page of results for a query |
/// | [`save`](SearchProvider::save) | Bookmark an item; the server may echo a canonical copy |
/// | [`fetch_saved`](SearchProvider::fetch_saved) | The whole saved collection |
/// | [`delete_saved`](SearchProvider::delete_saved) | Remove a bookmark by identifier |
#[async_trait]
pub trait SearchProvider: Send + Sync + 'static {
    type Item: SearchItem;
    type Query: SearchQuery;

    /// Fetch the page selected by `query.page()`.
    async fn search(&self, query: &Self::Query) -> Result<Vec<Self::Item>, ProviderError>;

    /// Save an item. `Ok(None)` means the server accepted it without echoing it back.
    async fn save(&self, item: &Self::Item) -> Result<Option<Self::Item>, ProviderError>;

    /// Fetch the saved collection. An empty response is an empty collection.
    async fn fetch_saved(&self) -> Result<Vec<Self::Item>, ProviderError>;

    /// Delete a saved item by its identifier.
    async fn delete_saved(&self, id: &str) -> Result<(), ProviderError>;
}
