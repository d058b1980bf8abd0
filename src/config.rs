//! Configuration management for moodmatch.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Precedence:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Secrets (client id/secret, API key) have no default and are required.

use std::{env, fmt, path::PathBuf};

use reqwest::Url;

pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidUrl { var: &'static str, reason: String },
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::InvalidUrl { var, reason } => {
                write!(f, "{} is not a valid URL: {}", var, reason)
            }
            ConfigError::Io(e) => write!(f, "cannot prepare config directory: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the Spotify accounts service and Web API.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Url,
    pub auth_url: Url,
    pub token_url: Url,
    /// Base URL of the Web API, e.g. `https://api.spotify.com/v1`. Endpoint
    /// paths are appended as segments.
    pub api_url: Url,
}

/// Settings for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL without a trailing slash; `/chat/completions` is appended.
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub openai: OpenAiConfig,
    /// Bind address of the local OAuth callback server.
    pub server_addr: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Call [`load_env`] first so values from the `.env` file are visible.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset, so a `.env` line like `OPENAI_API_KEY=`
    /// still reports the key as missing.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value for a variable name, if any
    ///
    /// # Required Variables
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID`
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET`
    /// - `OPENAI_API_KEY`
    ///
    /// Everything else falls back to the `DEFAULT_*` constants of this module.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` - a required variable is unset or blank
    /// - `ConfigError::InvalidUrl` - an endpoint does not parse as a URL, or
    ///   `SPOTIFY_API_URL` cannot serve as a base for endpoint paths
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_lookup(|key| match key {
    ///     "SPOTIFY_API_AUTH_CLIENT_ID" => Some("id".to_string()),
    ///     "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("secret".to_string()),
    ///     "OPENAI_API_KEY" => Some("sk-...".to_string()),
    ///     _ => None,
    /// })?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let raw = |key: &'static str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let url = |key: &'static str, default: &str| parse_url(key, &raw(key, default));
        let base_url = |key: &'static str, default: &str| {
            let url = parse_url(key, raw(key, default).trim_end_matches('/'))?;
            if url.cannot_be_a_base() {
                return Err(ConfigError::InvalidUrl {
                    var: key,
                    reason: "not usable as a base URL".to_string(),
                });
            }
            Ok(url)
        };

        let spotify = SpotifyConfig {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: url("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)?,
            auth_url: url("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)?,
            token_url: url("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)?,
            api_url: base_url("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)?,
        };

        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY")?,
            api_url: trim_base(get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string())),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        };

        Ok(Config {
            spotify,
            openai,
            server_addr: get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Root of everything moodmatch keeps on disk.
///
/// - Linux: `~/.local/share/moodmatch`
/// - macOS: `~/Library/Application Support/moodmatch`
/// - Windows: `%LOCALAPPDATA%/moodmatch`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodmatch");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is fine:
/// the variables may just as well come from the real environment, and
/// variables already set are never overridden.
///
/// # Example
///
/// ```
/// use moodmatch::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(ConfigError::Io)?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Io(std::io::Error::other(e.to_string())))?;
    }
    Ok(())
}
