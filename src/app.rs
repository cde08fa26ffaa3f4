//! Composition root wiring configuration, credential sources, the client
//! initializer and the generator together.

use crate::ai::{AiService, OpenAiClient};
use crate::diagnostics::{DiagnosticReporter, TracingReporter};
use crate::generator::BattlemapGenerator;
use crate::init::{ClientFactory, ClientInitializer};
use crate::models::{Battlemap, Config, Credential};
use crate::secrets::{EnvSecretStore, FileSecretStore, SecretStore};
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub struct App {
    generator: BattlemapGenerator,
}

/// Injectable parts used to construct [`App`] in tests and harnesses.
pub struct AppServices {
    pub stores: Vec<Box<dyn SecretStore>>,
    pub factory: ClientFactory,
    pub reporter: Arc<dyn DiagnosticReporter>,
    pub disclose_key_prefix: bool,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        let initializer = Arc::new(
            ClientInitializer::new(services.stores, services.factory, services.reporter.clone())
                .with_key_prefix_disclosure(services.disclose_key_prefix),
        );

        Self {
            generator: BattlemapGenerator::new(initializer, services.reporter),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config, Arc::new(TracingReporter)))
    }

    /// Wire the production OpenAI client: environment first, secrets file second.
    pub fn from_config(config: &Config, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        info!(
            "Chat model: {}, image model: {}",
            config.chat_model, config.image_model
        );

        Self::with_services(AppServices {
            stores: vec![
                Box::new(EnvSecretStore),
                Box::new(FileSecretStore::new(config.secrets_file.clone())),
            ],
            factory: openai_factory(config),
            reporter,
            disclose_key_prefix: config.disclose_key_prefix,
        })
    }

    pub fn generator(&self) -> &BattlemapGenerator {
        &self.generator
    }

    pub async fn run(&self, prompt: &str) -> Option<Battlemap> {
        info!("Generating battle map ({} chars of description)", prompt.len());
        self.generator.generate_battlemap(prompt).await
    }
}

fn openai_factory(config: &Config) -> ClientFactory {
    // Reuse one HTTP connection pool for every client built by this app.
    let http_client = reqwest::Client::new();
    let base_url = config.openai_base_url.clone();
    let chat_model = config.chat_model.clone();
    let image_model = config.image_model.clone();

    Box::new(move |credential: &Credential| {
        Arc::new(
            OpenAiClient::new_with_client(credential, http_client.clone())
                .with_base_url(base_url.clone())
                .with_models(chat_model.clone(), image_model.clone()),
        ) as Arc<dyn AiService>
    })
}
