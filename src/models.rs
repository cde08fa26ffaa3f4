//! Data models and structures
//!
//! Defines the credential, the generated battle map, and the runtime
//! configuration read from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable and secrets-store key holding the OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.env";

/// Secret API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw value, treating empty or whitespace-only input as missing.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First `n` characters of the key, for debugging output.
    pub fn prefix(&self, n: usize) -> String {
        self.0.chars().take(n).collect()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A rendered battle map together with the summary it was drawn from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Battlemap {
    pub summary: String,
    pub url: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_model: String,
    pub image_model: String,
    pub openai_base_url: String,
    pub secrets_file: PathBuf,
    pub disclose_key_prefix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            secrets_file: PathBuf::from(DEFAULT_SECRETS_FILE),
            disclose_key_prefix: false,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let disclose_key_prefix = match non_empty("BATTLEMAP_DISCLOSE_KEY_PREFIX") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                crate::Error::Config(format!(
                    "BATTLEMAP_DISCLOSE_KEY_PREFIX must be a boolean, got '{}'",
                    raw
                ))
            })?,
            None => defaults.disclose_key_prefix,
        };

        Ok(Self {
            chat_model: non_empty("BATTLEMAP_CHAT_MODEL").unwrap_or(defaults.chat_model),
            image_model: non_empty("BATTLEMAP_IMAGE_MODEL").unwrap_or(defaults.image_model),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            secrets_file: non_empty("BATTLEMAP_SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.secrets_file),
            disclose_key_prefix,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
