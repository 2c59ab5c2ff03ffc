//! REST implementations of [`SearchProvider`].
//!
//! One generic [`RestProvider`] serves both item kinds; a [`Resource`]
//! impl supplies the query type and endpoint paths for each.
//!
//! # Endpoints
//!
//! | Item | search | save | saved | delete |
//! |------|--------|------|-------|--------|
//! | jobs | `GET /jobs` | `POST /save-job` | `GET /saved-jobs` | `DELETE /delete-jobs/{id}` |
//! | insights | `GET /job-insights` | `POST /save-insight` | `GET /saved-insights` | `DELETE /delete-insights/{id}` |
//!
//! # Error mapping
//!
//! - transport failures and timeouts → [`ProviderError::Network`]
//! - non-2xx status → [`ProviderError::Server`] carrying the body
//! - undecodable payload → [`ProviderError::Decode`]; the raw body is logged at `error!`
//!
//! No request is retried. Dropping a returned future aborts the request.

use std::marker::PhantomData;

use anyhow::{Context, Result};
use async_trait::async_trait;
use job_searcher_core::{
    InsightsQuery, JobInsight, JobPosting, JobQuery, ProviderError, SearchItem, SearchProvider,
    SearchQuery,
};
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;

/// Paths of the four endpoints backing one item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub search: &'static str,
    pub save: &'static str,
    pub saved: &'static str,
    pub delete: &'static str,
}

/// An item kind served by the REST API.
pub trait Resource: SearchItem + Serialize + DeserializeOwned {
    type Query: SearchQuery;
    const ENDPOINTS: Endpoints;
}

impl Resource for JobPosting {
    type Query = JobQuery;
    const ENDPOINTS: Endpoints = Endpoints {
        search: "jobs",
        save: "save-job",
        saved: "saved-jobs",
        delete: "delete-jobs",
    };
}

impl Resource for JobInsight {
    type Query = InsightsQuery;
    const ENDPOINTS: Endpoints = Endpoints {
        search: "job-insights",
        save: "save-insight",
        saved: "saved-insights",
        delete: "delete-insights",
    };
}

pub type JobsApi = RestProvider<JobPosting>;
pub type InsightsApi = RestProvider<JobInsight>;

/// HTTP transport shared by every [`RestProvider`].
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", config.base_url);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send `request` and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), %url, "request rejected");
            return Err(ProviderError::Server {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), %url, bytes = body.len(), "response received");
        Ok(body)
    }
}

fn network(err: reqwest::Error) -> ProviderError {
    ProviderError::Network(err.to_string())
}

/// Decode a JSON payload, logging the raw body when it does not match.
fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|err| {
        error!(error = %err, body = %body, "failed to decode {}", what);
        ProviderError::Decode {
            message: err.to_string(),
            body: body.to_string(),
        }
    })
}

/// [`SearchProvider`] backed by the REST API.
pub struct RestProvider<R> {
    client: RestClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RestProvider<R> {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(RestClient::new(config)?))
    }
}

#[async_trait]
impl<R: Resource> SearchProvider for RestProvider<R> {
    type Item = R;
    type Query = R::Query;

    async fn search(&self, query: &R::Query) -> Result<Vec<R>, ProviderError> {
        let url = self.client.endpoint(&[R::ENDPOINTS.search]);
        let params = query.to_params();
        debug!(endpoint = R::ENDPOINTS.search, page = query.page(), "searching");
        let body = self
            .client
            .send(self.client.http.get(url).query(&params))
            .await?;
        decode(&body, R::ENDPOINTS.search)
    }

    async fn save(&self, item: &R) -> Result<Option<R>, ProviderError> {
        let url = self.client.endpoint(&[R::ENDPOINTS.save]);
        let body = self.client.send(self.client.http.post(url).json(item)).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        decode(&body, R::ENDPOINTS.save).map(Some)
    }

    async fn fetch_saved(&self) -> Result<Vec<R>, ProviderError> {
        let url = self.client.endpoint(&[R::ENDPOINTS.saved]);
        let body = self.client.send(self.client.http.get(url)).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode(&body, R::ENDPOINTS.saved)
    }

    async fn delete_saved(&self, id: &str) -> Result<(), ProviderError> {
        let url = self.client.endpoint(&[R::ENDPOINTS.delete, id]);
        self.client.send(self.client.http.delete(url)).await?;
        Ok(())
    }
}
