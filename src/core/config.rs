//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.twin/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TwinConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub twin_name: Option<String>,
    pub greeting: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    pub sent_delay_ms: Option<u64>,
    pub thinking_delay_ms: Option<u64>,
    pub reply_delay_ms: Option<u64>,
    pub mood_reset_ms: Option<u64>,
    pub reply_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// `"scripted"` (default) or `"backend"`.
    pub replies: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TWIN_NAME: &str = "Twin";
pub const DEFAULT_GREETING: &str =
    "Hi! I'm your digital twin. Tell me how your day is going, or ask me 'what if'.";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SENT_DELAY_MS: u64 = 300;
pub const DEFAULT_THINKING_DELAY_MS: u64 = 600;
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1200;
pub const DEFAULT_MOOD_RESET_MS: u64 = 8000;
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Delays that drive one exchange.
///
/// ```text
/// submit ─ sent_delay ─► Sent
///        ─ thinking_delay ─► placeholder + mood
///                         ─ reply_delay ─► reply
///                                       ─ mood_reset ─► Neutral
/// ```
///
/// `sent_delay` and `thinking_delay` both count from submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub sent_delay: Duration,
    pub thinking_delay: Duration,
    pub reply_delay: Duration,
    pub mood_reset: Duration,
    pub reply_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            sent_delay: Duration::from_millis(DEFAULT_SENT_DELAY_MS),
            thinking_delay: Duration::from_millis(DEFAULT_THINKING_DELAY_MS),
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            mood_reset: Duration::from_millis(DEFAULT_MOOD_RESET_MS),
            reply_timeout: Duration::from_millis(DEFAULT_REPLY_TIMEOUT_MS),
        }
    }
}

/// Where twin replies come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyBackend {
    /// The built-in rule table. Never fails.
    #[default]
    Scripted,
    /// `POST {base_url}/conversation/chat`, bounded by `reply_timeout`.
    Backend,
}

impl ReplyBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "scripted" => Some(ReplyBackend::Scripted),
            "backend" => Some(ReplyBackend::Backend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub twin_name: String,
    pub greeting: String,
    pub log_level: LevelFilter,
    pub timing: Timing,
    pub api_base_url: String,
    pub replies: ReplyBackend,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            twin_name: DEFAULT_TWIN_NAME.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            log_level: LevelFilter::Debug,
            timing: Timing::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            replies: ReplyBackend::default(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.twin/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".twin").join("config.toml"))
}

/// Load config from `~/.twin/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TwinConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TwinConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(TwinConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TwinConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TwinConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TwinConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = format!(
        r#"# Twin Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# twin_name = "{DEFAULT_TWIN_NAME}"           # Or set TWIN_NAME env var
# greeting = "Hi! I'm your digital twin."
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"

# [timing]
# sent_delay_ms = {DEFAULT_SENT_DELAY_MS}
# thinking_delay_ms = {DEFAULT_THINKING_DELAY_MS}
# reply_delay_ms = {DEFAULT_REPLY_DELAY_MS}
# mood_reset_ms = {DEFAULT_MOOD_RESET_MS}
# reply_timeout_ms = {DEFAULT_REPLY_TIMEOUT_MS}

# [api]
# base_url = "{DEFAULT_API_BASE_URL}"   # Or set TWIN_API_URL env var
# replies = "scripted"               # "backend" asks base_url/conversation/chat (or TWIN_REPLIES)
"#
    );

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_name` is the `--name` flag (None = not specified).
pub fn resolve(config: &TwinConfig, cli_name: Option<&str>) -> ResolvedConfig {
    // Twin name: CLI → env → config → default
    let twin_name = cli_name
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TWIN_NAME").ok())
        .or_else(|| config.general.twin_name.clone())
        .unwrap_or_else(|| DEFAULT_TWIN_NAME.to_string());

    // API base URL: env → config → default
    let api_base_url = std::env::var("TWIN_API_URL")
        .ok()
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // Reply source: env → config → default
    let replies = match std::env::var("TWIN_REPLIES").ok().or_else(|| config.api.replies.clone()) {
        None => ReplyBackend::default(),
        Some(value) => ReplyBackend::parse(&value).unwrap_or_else(|| {
            warn!("Unknown reply source '{}', using scripted replies", value);
            ReplyBackend::Scripted
        }),
    };

    let log_level = match config.general.log_level.as_deref() {
        None => LevelFilter::Debug,
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using debug", level);
            LevelFilter::Debug
        }),
    };

    let ms = |value: Option<u64>, default: u64| Duration::from_millis(value.unwrap_or(default));
    let timing = Timing {
        sent_delay: ms(config.timing.sent_delay_ms, DEFAULT_SENT_DELAY_MS),
        thinking_delay: ms(config.timing.thinking_delay_ms, DEFAULT_THINKING_DELAY_MS),
        reply_delay: ms(config.timing.reply_delay_ms, DEFAULT_REPLY_DELAY_MS),
        mood_reset: ms(config.timing.mood_reset_ms, DEFAULT_MOOD_RESET_MS),
        reply_timeout: ms(config.timing.reply_timeout_ms, DEFAULT_REPLY_TIMEOUT_MS),
    };

    ResolvedConfig {
        twin_name,
        greeting: config
            .general
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        log_level,
        timing,
        api_base_url,
        replies,
    }
}
