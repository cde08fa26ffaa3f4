//! Error handling and custom error types
//!
//! Provides unified error handling across the generator using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secrets file error: {0}")]
    Secrets(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
