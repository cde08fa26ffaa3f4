//! Battle map generation pipeline
//!
//! Summarize the description, then render the summary. Each step returns a
//! `Result`; the public entry points turn any failure into a diagnostic and
//! `None`, so callers only ever see a finished map or nothing.

use crate::ai::AiService;
use crate::diagnostics::{Diagnostic, DiagnosticReporter};
use crate::init::ClientInitializer;
use crate::models::Battlemap;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub struct BattlemapGenerator {
    initializer: Arc<ClientInitializer>,
    reporter: Arc<dyn DiagnosticReporter>,
}

impl BattlemapGenerator {
    pub fn new(
        initializer: Arc<ClientInitializer>,
        reporter: Arc<dyn DiagnosticReporter>,
    ) -> Self {
        Self {
            initializer,
            reporter,
        }
    }

    /// Generate a battle map and return its image URL.
    pub async fn generate(&self, prompt: &str) -> Option<String> {
        self.generate_battlemap(prompt)
            .await
            .map(|battlemap| battlemap.url)
    }

    /// Like [`generate`](Self::generate), but also hands back the summary the
    /// image was rendered from.
    pub async fn generate_battlemap(&self, prompt: &str) -> Option<Battlemap> {
        let client = self.initializer.initialize().await?;

        let summary = match summarize(client.as_ref(), prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                self.reporter.report(&Diagnostic::SummarizationFailed {
                    message: e.to_string(),
                });
                return None;
            }
        };

        match render(client.as_ref(), &summary).await {
            Ok(url) => Some(Battlemap { summary, url }),
            Err(e) => {
                self.reporter.report(&Diagnostic::ImageGenerationFailed {
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

async fn summarize(client: &dyn AiService, prompt: &str) -> Result<String> {
    let summary = client.summarize(prompt).await?;
    info!(
        "Summarized description ({} words): {}",
        summary.split_whitespace().count(),
        summary
    );
    Ok(summary)
}

async fn render(client: &dyn AiService, summary: &str) -> Result<String> {
    let url = client.generate_image(summary).await?;
    debug!("Battle map image available at {}", url);
    Ok(url)
}
