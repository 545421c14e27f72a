// src/config.rs

use std::env;

use dotenvy::dotenv;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-002";

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the generative service. Never logged.
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub generation_timeout_secs: u64,
    /// Sessions untouched for longer than this are pruned.
    pub session_ttl_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let gemini_base_url =
            get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        Url::parse(&gemini_base_url).map_err(|e| ConfigError::Invalid {
            key: "GEMINI_BASE_URL",
            reason: e.to_string(),
        })?;

        let gemini_model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let generation_timeout_secs = parse_or("GENERATION_TIMEOUT_SECS", get("GENERATION_TIMEOUT_SECS"), 60u64)?;
        if generation_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GENERATION_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let session_ttl_minutes = parse_or("SESSION_TTL_MINUTES", get("SESSION_TTL_MINUTES"), 120i64)?;
        if session_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_MINUTES",
                reason: "must be greater than zero".to_string(),
            });
        }

        let port = parse_or("PORT", get("PORT"), 3000u16)?;

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            generation_timeout_secs,
            session_ttl_minutes,
            port,
            rust_log,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
