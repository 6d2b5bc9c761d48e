use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

/// Environment variable that overrides `metadata.api_key`.
pub const API_KEY_ENV: &str = "LYRICFIND_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lyrics: LyricsConfig,
    pub metadata: MetadataConfig,
    pub search: SearchConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// LRCLIB-compatible API root (the `/get` endpoint is appended).
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Last.fm-compatible `2.0/` endpoint used for autocomplete.
    pub base_url: String,
    /// Credential sent as `api_key`. Can be overridden with `LYRICFIND_API_KEY`.
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// Capped at `suggest::MAX_SUGGESTIONS`.
    pub suggestion_limit: usize,
    /// Query fetched automatically on startup.
    pub default_track: String,
    pub default_artist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LYRICS_BASE_URL.to_string(),
            timeout_secs: defaults::LYRICS_TIMEOUT_SECS,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::METADATA_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: defaults::METADATA_TIMEOUT_SECS,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::DEBOUNCE_MS,
            suggestion_limit: defaults::SUGGESTION_LIMIT,
            default_track: defaults::DEFAULT_TRACK.to_string(),
            default_artist: defaults::DEFAULT_ARTIST.to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("lyricfind"));
        Self { data_dir }
    }
}

impl LyricsConfig {
    /// Never zero; a zero timeout fails every request.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "lyricfind", "lyricfind")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut cfg = if path.exists() {
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        parse(&raw).with_context(|| format!("parse {}", path.display()))?
    } else {
        let cfg = defaults::defaults();
        write_config(&path, &cfg)?;
        cfg
    };

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        apply_api_key_override(&mut cfg, &key);
    }
    Ok(cfg)
}

fn parse(raw: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str::<Config>(raw)?)
}

fn apply_api_key_override(cfg: &mut Config, key: &str) {
    let key = key.trim();
    if !key.is_empty() {
        cfg.metadata.api_key = key.to_string();
    }
}

fn write_config(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    // The file holds an API credential.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}
