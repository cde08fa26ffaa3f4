pub mod client;
pub mod service;
pub mod types;

pub use service::OpenAiClient;
