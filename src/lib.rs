//! # Job Searcher
//!
//! Command-line client for a job search API: incremental paginated search
//! over job postings and job-insight reports, plus saved lists for both.
//!
//! The search and saved-list logic lives in [`job_searcher_core`]; this
//! crate adds the REST providers, configuration, logging, and the `jobs`
//! binary.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────┐
//! │  jobs (CLI)  │──▶│  SearchController   │──▶│ RestProvider │──▶ HTTP API
//! │ clap + toml  │   │  SavedItemsController│   │   reqwest    │
//! └──────────────┘   └────────────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! jobs search "rust" --city Austin --pages 2
//! jobs insights "data analyst" --company Acme --company Globex
//! jobs saved jobs
//! jobs save job ./posting.json
//! jobs unsave jobs <id>
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`api`] | REST providers for jobs and insights |
//! | [`search`] | `jobs search` / `jobs insights` |
//! | [`saved`] | `jobs saved` / `save` / `unsave` |
//! | [`render`] | Plain and JSON output |

pub mod api;
pub mod config;
pub mod logging;
pub mod render;
pub mod saved;
pub mod search;
