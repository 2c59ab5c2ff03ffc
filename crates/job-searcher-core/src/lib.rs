//! # Job Searcher Core
//!
//! Transport-agnostic logic for Job Searcher: item and query models,
//! identifier derivation, the [`SearchProvider`](provider::SearchProvider)
//! abstraction, and the two controllers that sit between a front end and
//! the remote API.
//!
//! This crate contains no HTTP client, configuration, or filesystem I/O.
//! It uses tokio only for timers, task spawning, and `watch` channels.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Job postings, insight reports, identifier derivation |
//! | [`query`] | Query state and query-to-wire mapping |
//! | [`error`] | Provider error taxonomy |
//! | [`provider`] | Remote provider trait and an in-memory implementation |
//! | [`controller`] | Incremental paginated search controller |
//! | [`saved`] | Saved-items list controller |

pub mod controller;
pub mod error;
pub mod models;
pub mod provider;
pub mod query;
pub mod saved;

pub use controller::{SearchConfig, SearchController, SearchSnapshot};
pub use error::ProviderError;
pub use models::{Compensation, JobInsight, JobPosting, SearchItem, Skill};
pub use provider::SearchProvider;
pub use query::{InsightsQuery, JobQuery, SearchQuery};
pub use saved::{SavedItemsController, SavedSnapshot};
