use config::{Config, Environment, File, FileFormat};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::ConfigError;

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for the backend's REST endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL without a trailing slash, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub schema: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    url: Option<String>,
    anon_key: Option<String>,
    schema: String,
    request_timeout_ms: u64,
}

impl Settings {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            schema: DEFAULT_SCHEMA.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Loads settings from the process environment and an optional TOML file.
    ///
    /// Later sources win: built-in defaults, the file, `NEXT_PUBLIC_SUPABASE_*`
    /// and finally `SUPABASE_*`.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(file, None)
    }

    /// Same as [`Settings::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        trace!("Building configuration sources");
        let mut builder = Config::builder()
            .set_default("schema", DEFAULT_SCHEMA)?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?;

        if let Some(path) = file {
            debug!("Reading configuration file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let raw: RawSettings = builder
            .add_source(
                Environment::with_prefix("NEXT_PUBLIC_SUPABASE")
                    .try_parsing(true)
                    .source(env.clone()),
            )
            .add_source(
                Environment::with_prefix("SUPABASE")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let url = raw
            .url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = raw
            .anon_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            value: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        debug!("Backend configured at {} (schema {})", url, raw.schema);
        Ok(Self {
            url,
            anon_key,
            schema: raw.schema,
            request_timeout_ms: raw.request_timeout_ms,
        })
    }
}
