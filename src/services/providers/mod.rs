//! Poster image providers
//!
//! The recommendation pipeline only depends on the `PosterResolver` trait; the
//! OMDb implementation lives in `omdb`. Resolvers never return errors: every
//! failure degrades to "no poster".

pub mod cache;
pub mod omdb;

pub use cache::{PosterCache, PosterKey};
pub use omdb::OmdbPosterResolver;

/// Trait for poster image lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterResolver: Send + Sync {
    /// Poster URL for a title, disambiguated by year when one is known
    ///
    /// Returns `None` when there is no match, no image, or the lookup failed.
    async fn resolve(&self, title: &str, year: Option<i32>) -> Option<String>;
}

/// How a single poster lookup ended
#[derive(Debug, Clone, PartialEq)]
pub enum PosterLookup {
    Found(String),
    /// Service reported no title match
    NoMatch,
    /// Title matched but has no usable image (missing, empty or "N/A")
    NoImage,
    /// No API key configured; no request was made
    Disabled,
    Failed(PosterLookupError),
}

impl PosterLookup {
    /// Definitive answers are worth caching; failures may succeed next time
    pub fn is_cacheable(&self) -> bool {
        matches!(
            self,
            PosterLookup::Found(_) | PosterLookup::NoMatch | PosterLookup::NoImage
        )
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            PosterLookup::Found(url) => Some(url),
            _ => None,
        }
    }
}

/// Failure modes that are absorbed into "no poster"
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PosterLookupError {
    #[error("poster request timed out")]
    Timeout,

    #[error("poster request failed: {0}")]
    Network(String),

    #[error("poster service returned status {0}")]
    Status(u16),

    #[error("malformed poster response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for PosterLookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PosterLookupError::Timeout
        } else if e.is_decode() {
            PosterLookupError::Malformed(e.to_string())
        } else {
            PosterLookupError::Network(e.to_string())
        }
    }
}
