//! Battle map generator for tabletop role-playing games
//!
//! Condenses a free-text battle map description with a chat model, then renders
//! a top-down battle map from the condensed text with an image model and hands
//! back the generated image's URL.

pub mod ai;
pub mod app;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod init;
pub mod models;
pub mod prompts;
pub mod secrets;

pub use error::{Error, Result};
