use super::Config;

pub const LYRICS_BASE_URL: &str = "https://lrclib.net/api";
pub const LYRICS_TIMEOUT_SECS: u64 = 10;
pub const METADATA_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const METADATA_TIMEOUT_SECS: u64 = 5;
pub const DEBOUNCE_MS: u64 = 300;
pub const SUGGESTION_LIMIT: usize = 12;
pub const DEFAULT_TRACK: &str = "她说";
pub const DEFAULT_ARTIST: &str = "林俊杰";

/// Config written to disk on first run.
pub fn defaults() -> Config {
    Config::default()
}
