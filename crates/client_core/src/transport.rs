//! Wire access to the puzzle services.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Backend, PuzzleImage, Recommendation},
    protocol::{FilterRequest, RecommendationRequest},
};
use url::Url;

use crate::config::Settings;

#[async_trait]
pub trait PuzzleBackend: Send + Sync {
    async fn initial_images(&self) -> Result<Vec<PuzzleImage>>;
    async fn search(&self, query: &str) -> Result<Vec<PuzzleImage>>;
    async fn filter(&self, request: &FilterRequest) -> Result<Vec<PuzzleImage>>;
    async fn recommendations(
        &self,
        backend: Backend,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>>;
}

pub struct HttpBackend {
    http: Client,
    settings: Settings,
}

impl HttpBackend {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: Settings) -> Self {
        Self { http, settings }
    }

    /// The query is appended to the search base verbatim. `Url` encodes
    /// spaces and other characters that cannot appear raw, but `#`, `&` and
    /// `+` keep their URL meaning: `Qh7#` is sent as `query=Qh7`.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let raw = format!("{}{query}", self.settings.search_base_url);
        Url::parse(&raw).with_context(|| format!("invalid search URL '{raw}'"))
    }
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response, what: &str) -> Result<T> {
    res.error_for_status()
        .with_context(|| format!("{what} endpoint returned an error status"))?
        .json()
        .await
        .with_context(|| format!("malformed {what} response"))
}

#[async_trait]
impl PuzzleBackend for HttpBackend {
    async fn initial_images(&self) -> Result<Vec<PuzzleImage>> {
        let res = self
            .http
            .get(&self.settings.initial_base_url)
            .send()
            .await
            .context("failed to reach initial image endpoint")?;
        decode(res, "initial image").await
    }

    async fn search(&self, query: &str) -> Result<Vec<PuzzleImage>> {
        let url = self.search_url(query)?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("failed to reach search endpoint")?;
        decode(res, "search").await
    }

    async fn filter(&self, request: &FilterRequest) -> Result<Vec<PuzzleImage>> {
        let res = self
            .http
            .post(&self.settings.filter_base_url)
            .json(request)
            .send()
            .await
            .context("failed to reach filter endpoint")?;
        decode(res, "filter").await
    }

    async fn recommendations(
        &self,
        backend: Backend,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>> {
        let res = self
            .http
            .post(self.settings.recommendation_url(backend))
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to reach {backend} recommendation endpoint"))?;
        decode(res, "recommendation").await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
