//! OMDb poster provider
//!
//! Looks titles up with `GET {api_url}?apikey=..&t=<title>[&y=<year>]` and
//! reads the `Poster` field. Results are kept in a bounded in-process cache.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::AppResult,
    models::OmdbResponse,
    services::providers::{
        PosterCache, PosterKey, PosterLookup, PosterLookupError, PosterResolver,
    },
};

/// OMDb's marker for a missing field
const NOT_AVAILABLE: &str = "N/A";

pub struct OmdbPosterResolver {
    http_client: HttpClient,
    /// `None` disables lookups entirely
    api_key: Option<String>,
    api_url: String,
    cache: PosterCache,
}

impl OmdbPosterResolver {
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        timeout: Duration,
        cache_capacity: usize,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache: PosterCache::new(cache_capacity),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.poster_api_key().map(str::to_string),
            config.omdb_api_url.clone(),
            config.poster_timeout(),
            config.poster_cache_capacity,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Looks up a poster and reports how the lookup ended
    pub async fn lookup(&self, title: &str, year: Option<i32>) -> PosterLookup {
        let Some(api_key) = self.api_key.as_deref() else {
            return PosterLookup::Disabled;
        };

        let key = PosterKey::new(title, year);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(title = %title, year = ?year, "Poster cache hit");
            return hit;
        }

        let lookup = match self.fetch(api_key, title, year).await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    year = ?year,
                    error = %e,
                    provider = "omdb",
                    "Poster lookup failed"
                );
                PosterLookup::Failed(e)
            }
        };

        if lookup.is_cacheable() {
            self.cache.insert(key, lookup.clone());
        }

        lookup
    }

    async fn fetch(
        &self,
        api_key: &str,
        title: &str,
        year: Option<i32>,
    ) -> Result<PosterLookup, PosterLookupError> {
        let mut params = vec![("apikey", api_key.to_string()), ("t", title.to_string())];
        if let Some(year) = year {
            params.push(("y", year.to_string()));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterLookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: OmdbResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(response = %body, "Unparseable OMDb response");
            PosterLookupError::Malformed(e.to_string())
        })?;

        let lookup = Self::interpret(parsed);

        tracing::debug!(
            title = %title,
            year = ?year,
            found = matches!(lookup, PosterLookup::Found(_)),
            provider = "omdb",
            "Poster fetched"
        );

        Ok(lookup)
    }

    fn interpret(response: OmdbResponse) -> PosterLookup {
        if !response.is_match() {
            tracing::debug!(error = ?response.error, provider = "omdb", "No poster match");
            return PosterLookup::NoMatch;
        }

        match response.poster {
            Some(poster) if !poster.trim().is_empty() && poster != NOT_AVAILABLE => {
                PosterLookup::Found(poster)
            }
            _ => PosterLookup::NoImage,
        }
    }
}

#[async_trait::async_trait]
impl PosterResolver for OmdbPosterResolver {
    async fn resolve(&self, title: &str, year: Option<i32>) -> Option<String> {
        self.lookup(title, year).await.into_url()
    }
}
