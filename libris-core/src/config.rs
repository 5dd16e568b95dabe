//! Client configuration, read from the environment

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5134";
pub const DEFAULT_COVER_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ACTIVE_RESERVATIONS: usize = 3;

/// Settings for talking to the catalog and cover APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the catalog API, without a trailing slash
    pub api_base_url: String,

    /// Volume search endpoint used for cover lookups
    pub cover_lookup_url: String,

    /// File holding the persisted session
    pub session_path: PathBuf,

    pub request_timeout: Duration,

    /// Active reservations a member may hold at once
    pub max_active_reservations: usize,
}

impl ClientConfig {
    /// Defaults against the given API and session file
    pub fn new(api_base_url: impl Into<String>, session_path: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            cover_lookup_url: DEFAULT_COVER_URL.to_string(),
            session_path: session_path.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_active_reservations: DEFAULT_MAX_ACTIVE_RESERVATIONS,
        }
    }

    /// Read `LIBRIS_*` variables from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = var("LIBRIS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_path = match var("LIBRIS_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_path().ok_or(ConfigError::NoSessionPath)?,
        };

        let mut config = Self::new(api_base_url, session_path);

        if let Some(url) = var("LIBRIS_COVER_URL") {
            config.cover_lookup_url = url;
        }
        if let Some(secs) = var("LIBRIS_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_positive("LIBRIS_TIMEOUT_SECS", &secs)?);
        }
        if let Some(max) = var("LIBRIS_MAX_ACTIVE_RESERVATIONS") {
            config.max_active_reservations =
                parse_positive("LIBRIS_MAX_ACTIVE_RESERVATIONS", &max)? as usize;
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let n: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })?;
    if n < 1 {
        Err(ConfigError::OutOfRange { key })
    } else {
        Ok(n)
    }
}

fn default_session_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "libris")
        .map(|dirs| dirs.config_dir().join("session.json"))
}
