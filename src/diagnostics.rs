//! User-facing diagnostics
//!
//! Failures in client setup and generation never escape as errors; they are
//! described as a [`Diagnostic`] and handed to a caller-supplied
//! [`DiagnosticReporter`], which decides how to present them.

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No API key in the environment or the secrets store.
    MissingCredential,
    /// Leading characters of the resolved API key. Only emitted when enabled.
    CredentialPrefix { prefix: String },
    /// The key resolved but the validation probe failed.
    ProbeFailed { message: String },
    SummarizationFailed { message: String },
    ImageGenerationFailed { message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingCredential => write!(
                f,
                "OpenAI API key not found. Please set it in your environment variables or secrets file."
            ),
            Diagnostic::CredentialPrefix { prefix } => {
                write!(f, "API Key (first 5 chars): {}...", prefix)
            }
            Diagnostic::ProbeFailed { message } => {
                write!(f, "Error initializing OpenAI client: {}", message)
            }
            Diagnostic::SummarizationFailed { message } => {
                write!(f, "Error summarizing battle map description: {}", message)
            }
            Diagnostic::ImageGenerationFailed { message } => {
                write!(f, "Error generating image: {}", message)
            }
        }
    }
}

impl Diagnostic {
    /// Whether this diagnostic describes a failure rather than debug output.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Diagnostic::CredentialPrefix { .. })
    }
}

pub trait DiagnosticReporter: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Writes diagnostics to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl DiagnosticReporter for TracingReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_failure() {
            error!(kind = diagnostic_kind(diagnostic), "{}", diagnostic);
        } else {
            warn!(kind = diagnostic_kind(diagnostic), "{}", diagnostic);
        }
    }
}

fn diagnostic_kind(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic {
        Diagnostic::MissingCredential => "missing_credential",
        Diagnostic::CredentialPrefix { .. } => "credential_prefix",
        Diagnostic::ProbeFailed { .. } => "probe_failed",
        Diagnostic::SummarizationFailed { .. } => "summarization_failed",
        Diagnostic::ImageGenerationFailed { .. } => "image_generation_failed",
    }
}

/// Keeps every reported diagnostic in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn failures(&self) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(Diagnostic::is_failure)
            .collect()
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        if let Ok(mut guard) = self.diagnostics.lock() {
            guard.push(diagnostic.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collecting_reporter_records_in_order() {
        let reporter = CollectingReporter::new();
        reporter.report(&Diagnostic::MissingCredential);
        reporter.report(&Diagnostic::ProbeFailed {
            message: "401".to_string(),
        });

        assert_eq!(
            reporter.diagnostics(),
            vec![
                Diagnostic::MissingCredential,
                Diagnostic::ProbeFailed {
                    message: "401".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_clones_share_buffer() {
        let reporter = CollectingReporter::new();
        let probe = reporter.clone();
        reporter.report(&Diagnostic::MissingCredential);
        assert_eq!(probe.diagnostics().len(), 1);
    }

    #[test]
    fn test_failures_exclude_credential_prefix() {
        let reporter = CollectingReporter::new();
        reporter.report(&Diagnostic::CredentialPrefix {
            prefix: "sk-ab".to_string(),
        });
        reporter.report(&Diagnostic::ImageGenerationFailed {
            message: "rate limited".to_string(),
        });

        assert_eq!(reporter.diagnostics().len(), 2);
        assert_eq!(
            reporter.failures(),
            vec![Diagnostic::ImageGenerationFailed {
                message: "rate limited".to_string()
            }]
        );
    }

    #[test]
    fn test_display_includes_upstream_text() {
        let diagnostic = Diagnostic::ImageGenerationFailed {
            message: "OpenAI API error (status 429): slow down".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Error generating image: OpenAI API error (status 429): slow down"
        );
    }

    #[test]
    fn test_credential_prefix_display() {
        let diagnostic = Diagnostic::CredentialPrefix {
            prefix: "sk-pr".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "API Key (first 5 chars): sk-pr...");
    }
}
