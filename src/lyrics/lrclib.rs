//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API. Only the exact-match `get` endpoint is used.
//! API Documentation: https://lrclib.net/docs

use super::{LyricsError, LyricsFetcher, LyricsResult, text};
use crate::search::state::Query;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// LRCLIB `get` response. LRCLIB sends both `name` and `trackName`.
#[derive(Debug, Deserialize)]
struct LrclibTrack {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "trackName", default)]
    track_name: Option<String>,
    #[serde(rename = "artistName")]
    artist_name: String,
    #[serde(rename = "albumName", default)]
    album_name: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    instrumental: bool,
    #[serde(rename = "plainLyrics", default)]
    plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics", default)]
    synced_lyrics: Option<String>,
}

impl LrclibTrack {
    fn into_result(self) -> Result<LyricsResult, LyricsError> {
        let name = self
            .name
            .or(self.track_name)
            .ok_or_else(|| LyricsError::Invalid("missing track name".into()))?;

        let plain_lyrics = match self.plain_lyrics {
            Some(p) if !p.trim().is_empty() => Some(p),
            _ => self
                .synced_lyrics
                .as_deref()
                .map(text::strip_timestamps)
                .filter(|p| !p.trim().is_empty()),
        };

        Ok(LyricsResult {
            name,
            artist_name: self.artist_name,
            album_name: self.album_name.filter(|a| !a.trim().is_empty()),
            duration_seconds: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u32),
            instrumental: self.instrumental,
            plain_lyrics,
        })
    }
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    const USER_AGENT: &'static str = concat!("lyricfind/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("build lrclib http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_url(&self, query: &Query) -> String {
        format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(&query.track_name),
            urlencoding::encode(&query.artist_name)
        )
    }
}

#[async_trait]
impl LyricsFetcher for LrclibClient {
    async fn fetch_lyrics(&self, query: &Query) -> Result<LyricsResult, LyricsError> {
        let url = self.get_url(query);
        tracing::debug!(%url, "lrclib get");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LyricsError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LyricsError::Transport(e.to_string()))?;

        decode_response(status, &body)
    }
}

/// Map an LRCLIB `get` reply onto a result or one of the three failure kinds.
fn decode_response(status: StatusCode, body: &str) -> Result<LyricsResult, LyricsError> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok();
    let upstream_message = value.as_ref().and_then(error_message);

    if status == StatusCode::NOT_FOUND {
        return Err(LyricsError::not_found(upstream_message));
    }
    if !status.is_success() {
        let detail = match upstream_message {
            Some(m) => format!("HTTP {status}: {m}"),
            None => format!("HTTP {status}"),
        };
        return Err(LyricsError::Transport(detail));
    }

    let value = value.ok_or_else(|| LyricsError::Invalid("body is not JSON".into()))?;
    if value.get("error").is_some() {
        return Err(LyricsError::not_found(upstream_message));
    }

    let track: LrclibTrack =
        serde_json::from_value(value).map_err(|e| LyricsError::Invalid(e.to_string()))?;
    track.into_result()
}

/// `error` takes precedence over `message`; either may be absent.
fn error_message(v: &serde_json::Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|k| v.get(*k))
        .find_map(|m| m.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"{
        "id": 3396226,
        "name": "她说",
        "trackName": "她说",
        "artistName": "林俊杰",
        "albumName": "她说 概念自选辑",
        "duration": 320.0,
        "instrumental": false,
        "plainLyrics": "他静悄悄地来过\n他慢慢带走沉默\n\n只是最后的承诺\n还是没有带走了寂寞",
        "syncedLyrics": "[00:28.16] 他静悄悄地来过"
    }"#;

    #[test]
    fn test_decode_found_track() {
        let r = decode_response(StatusCode::OK, FOUND).unwrap();
        assert_eq!(r.name, "她说");
        assert_eq!(r.artist_name, "林俊杰");
        assert_eq!(r.album_name.as_deref(), Some("她说 概念自选辑"));
        assert_eq!(r.duration_seconds, Some(320));
        assert!(!r.instrumental);
        assert_eq!(r.line_count(), 4);
    }

    #[test]
    fn test_decode_falls_back_to_synced_lyrics() {
        let body = r#"{
            "trackName": "Song",
            "artistName": "Band",
            "duration": 61.6,
            "instrumental": false,
            "plainLyrics": null,
            "syncedLyrics": "[00:01.00]one\n[00:02.00]two"
        }"#;
        let r = decode_response(StatusCode::OK, body).unwrap();
        assert_eq!(r.name, "Song");
        assert_eq!(r.plain_lyrics.as_deref(), Some("one\ntwo"));
        assert_eq!(r.duration_seconds, Some(62));
    }

    #[test]
    fn test_decode_instrumental_without_lyrics() {
        let body = r#"{"name":"Intro","artistName":"Band","instrumental":true,"plainLyrics":null,"syncedLyrics":null}"#;
        let r = decode_response(StatusCode::OK, body).unwrap();
        assert!(r.instrumental);
        assert!(r.lyrics().is_none());
        assert_eq!(r.duration_seconds, None);
    }

    #[test]
    fn test_decode_404_is_not_found_with_upstream_message() {
        let body = r#"{"code":404,"name":"TrackNotFound","message":"Failed to find specified track"}"#;
        let err = decode_response(StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(err, LyricsError::NotFound("Failed to find specified track".into()));
    }

    #[test]
    fn test_decode_error_shaped_body_is_not_found() {
        let err = decode_response(StatusCode::OK, r#"{"error":"No lyrics for that track"}"#).unwrap_err();
        assert_eq!(err, LyricsError::NotFound("No lyrics for that track".into()));
    }

    #[test]
    fn test_decode_server_error_is_transport() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LyricsError::Transport(ref m) if m.contains("502")));
    }

    #[test]
    fn test_decode_garbage_is_invalid() {
        assert!(matches!(
            decode_response(StatusCode::OK, "not json"),
            Err(LyricsError::Invalid(_))
        ));
        assert!(matches!(
            decode_response(StatusCode::OK, r#"{"name":"x"}"#),
            Err(LyricsError::Invalid(_))
        ));
    }

    #[test]
    fn test_get_url_encodes_query() {
        let client = LrclibClient::new("https://lrclib.net/api/", Duration::from_secs(1)).unwrap();
        let url = client.get_url(&Query::new("她说", "林俊杰"));
        assert_eq!(
            url,
            "https://lrclib.net/api/get?track_name=%E5%A5%B9%E8%AF%B4&artist_name=%E6%9E%97%E4%BF%8A%E6%9D%B0"
        );
    }

    #[tokio::test]
    #[ignore = "hits the live LRCLIB service"]
    async fn test_live_fetch() {
        let client = LrclibClient::new("https://lrclib.net/api", Duration::from_secs(10)).unwrap();

        let r = client.fetch_lyrics(&Query::new("她说", "林俊杰")).await.unwrap();
        assert!(!r.instrumental);
        assert!(r.line_count() > 0);

        let err = client
            .fetch_lyrics(&Query::new("zzzzqqqq", "nonexistent"))
            .await
            .unwrap_err();
        assert!(matches!(err, LyricsError::NotFound(_)));
    }
}
