//! Lyrics lookup
//!
//! This module provides:
//! - [`LyricsFetcher`], the seam the search controller fetches through
//! - [`LrclibClient`], the LRCLIB-backed implementation
//! - [`LyricsResult`] and the [`LyricsError`] taxonomy shown to the user

pub mod lrclib;
pub mod text;

pub use lrclib::LrclibClient;

use crate::search::state::Query;
use async_trait::async_trait;
use thiserror::Error;

const NOT_FOUND_MESSAGE: &str = "Failed to find specified track";

/// A matched track as returned by the lyrics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsResult {
    pub name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub duration_seconds: Option<u32>,
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
}

impl LyricsResult {
    /// Lyrics body, if the match has a non-blank one.
    pub fn lyrics(&self) -> Option<&str> {
        self.plain_lyrics
            .as_deref()
            .filter(|l| !l.trim().is_empty())
    }

    /// Count of non-blank lines in the lyrics body.
    pub fn line_count(&self) -> usize {
        self.lyrics().map(text::count_lines).unwrap_or(0)
    }

    /// Duration formatted as `m:ss`.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_seconds
            .filter(|d| *d > 0)
            .map(|d| format!("{}:{:02}", d / 60, d % 60))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LyricsError {
    /// The API has no lyrics for this track/artist pair.
    #[error("{0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response from lyrics service: {0}")]
    Invalid(String),
}

impl LyricsError {
    /// NotFound carrying the upstream message, or a stock one if it is blank.
    pub fn not_found(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::NotFound(m),
            _ => Self::NotFound(NOT_FOUND_MESSAGE.to_string()),
        }
    }
}

#[async_trait]
pub trait LyricsFetcher: Send + Sync {
    /// Exact track + artist lookup.
    async fn fetch_lyrics(&self, query: &Query) -> Result<LyricsResult, LyricsError>;
}
