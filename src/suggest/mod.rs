//! Autocomplete suggestions for the track and artist fields
//!
//! [`SuggestionProvider`] wraps a [`MetadataSearch`] backend and applies the
//! suggestion policy: blank input never reaches the network, results are
//! capped, and any backend failure degrades to an empty list.

pub mod lastfm;

pub use lastfm::LastfmClient;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on suggestions per lookup, whatever the configured limit.
pub const MAX_SUGGESTIONS: usize = 12;

/// Which input a suggestion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Track,
    Artist,
}

impl Field {
    pub fn other(self) -> Self {
        match self {
            Field::Track => Field::Artist,
            Field::Artist => Field::Track,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Track => "Track",
            Field::Artist => "Artist",
        }
    }
}

/// Extra scoping for a suggestion lookup.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    /// Required for track lookups.
    pub artist_name: Option<String>,
}

impl SearchContext {
    pub fn with_artist(artist_name: impl Into<String>) -> Self {
        Self {
            artist_name: Some(artist_name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("metadata service error: {0}")]
    Upstream(String),
    #[error("malformed response: {0}")]
    Invalid(String),
}

/// Name search against a music metadata service.
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    /// Names matching `query`, in upstream order. `artist` is only set for
    /// track lookups.
    async fn search_names(
        &self,
        field: Field,
        query: &str,
        artist: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, SuggestError>;
}

#[derive(Clone)]
pub struct SuggestionProvider {
    source: Arc<dyn MetadataSearch>,
    limit: usize,
}

impl SuggestionProvider {
    pub fn new(source: Arc<dyn MetadataSearch>, limit: usize) -> Self {
        Self {
            source,
            limit: limit.min(MAX_SUGGESTIONS),
        }
    }

    /// Never fails: blank input, a missing artist for track lookups, and
    /// backend errors all yield an empty list.
    pub async fn search(&self, field: Field, query_text: &str, ctx: &SearchContext) -> Vec<String> {
        let query = query_text.trim();
        if query.is_empty() || self.limit == 0 {
            return Vec::new();
        }

        let artist = match field {
            Field::Artist => None,
            Field::Track => {
                match ctx.artist_name.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
                    Some(a) => Some(a),
                    None => return Vec::new(),
                }
            }
        };

        match self.source.search_names(field, query, artist, self.limit).await {
            Ok(mut names) => {
                names.truncate(self.limit);
                names
            }
            Err(e) => {
                tracing::warn!(field = field.label(), query, error = %e, "suggestion lookup failed");
                Vec::new()
            }
        }
    }
}
