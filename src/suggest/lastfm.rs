//! Last.fm `track.search` / `artist.search` client
//!
//! API Documentation: https://www.last.fm/api/show/track.search

use super::{Field, MetadataSearch, SuggestError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LastfmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LastfmClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lyricfind/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("build metadata http client")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.into(),
        })
    }

    fn search_url(&self, field: Field, query: &str, artist: Option<&str>, limit: usize) -> String {
        let mut url = match field {
            Field::Track => format!(
                "{}?method=track.search&track={}",
                self.base_url,
                urlencoding::encode(query)
            ),
            Field::Artist => format!(
                "{}?method=artist.search&artist={}",
                self.base_url,
                urlencoding::encode(query)
            ),
        };

        if let (Field::Track, Some(artist)) = (field, artist) {
            url.push_str(&format!("&artist={}", urlencoding::encode(artist)));
        }

        url.push_str(&format!(
            "&api_key={}&format=json&limit={}",
            urlencoding::encode(&self.api_key),
            limit
        ));
        url
    }
}

#[async_trait]
impl MetadataSearch for LastfmClient {
    async fn search_names(
        &self,
        field: Field,
        query: &str,
        artist: Option<&str>,
        limit: usize,
    ) -> Result<Vec<String>, SuggestError> {
        let url = self.search_url(field, query, artist, limit);
        // The URL carries the api key; log the parts that matter instead.
        tracing::debug!(field = field.label(), query, artist, "metadata search");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;

        decode_matches(field, status, &body)
    }
}

/// Pull the `name` of every match out of a search reply, in order.
fn decode_matches(field: Field, status: StatusCode, body: &str) -> Result<Vec<String>, SuggestError> {
    let value = serde_json::from_str::<Value>(body).ok();

    // Errors come back as {"error": 10, "message": "Invalid API key"}, with
    // or without a failing HTTP status.
    if let Some(v) = value.as_ref().filter(|v| v.get("error").is_some()) {
        let message = v
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| v["error"].to_string());
        return Err(SuggestError::Upstream(message));
    }
    if !status.is_success() {
        return Err(SuggestError::Transport(format!("HTTP {status}")));
    }

    let value = value.ok_or_else(|| SuggestError::Invalid("body is not JSON".into()))?;
    let (container, item) = match field {
        Field::Track => ("/results/trackmatches", "track"),
        Field::Artist => ("/results/artistmatches", "artist"),
    };
    let matches = value
        .pointer(container)
        .ok_or_else(|| SuggestError::Invalid(format!("missing {container}")))?;

    let items = match matches.get(item) {
        Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
        // A single match is sometimes sent as a bare object.
        Some(one @ Value::Object(_)) => vec![one],
        // No matches: an empty array, a missing key, or a whitespace string.
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter_map(|m| m.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect())
}
