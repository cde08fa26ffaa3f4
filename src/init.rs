//! One-time client setup
//!
//! [`ClientInitializer`] resolves the API key, builds a client and validates it
//! with a cheap probe. The outcome, a working client or nothing, is computed
//! once and shared by every later caller.

use crate::ai::AiService;
use crate::diagnostics::{Diagnostic, DiagnosticReporter};
use crate::models::{Credential, OPENAI_API_KEY};
use crate::secrets::{resolve_credential, SecretStore};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Builds a client for a resolved credential.
pub type ClientFactory = Box<dyn Fn(&Credential) -> Arc<dyn AiService> + Send + Sync>;

const KEY_PREFIX_LEN: usize = 5;

pub struct ClientInitializer {
    stores: Vec<Box<dyn SecretStore>>,
    factory: ClientFactory,
    reporter: Arc<dyn DiagnosticReporter>,
    disclose_key_prefix: bool,
    client: OnceCell<Option<Arc<dyn AiService>>>,
}

impl ClientInitializer {
    /// `stores` are consulted in order; the first non-empty key wins.
    pub fn new(
        stores: Vec<Box<dyn SecretStore>>,
        factory: ClientFactory,
        reporter: Arc<dyn DiagnosticReporter>,
    ) -> Self {
        Self {
            stores,
            factory,
            reporter,
            disclose_key_prefix: false,
            client: OnceCell::new(),
        }
    }

    /// Report the first characters of the resolved key as a diagnostic.
    pub fn with_key_prefix_disclosure(mut self, enabled: bool) -> Self {
        self.disclose_key_prefix = enabled;
        self
    }

    /// Returns the validated client, or `None` when no usable client exists.
    ///
    /// Only the first call does any work. Concurrent first calls wait for the
    /// same initialization.
    pub async fn initialize(&self) -> Option<Arc<dyn AiService>> {
        self.client.get_or_init(|| self.build_client()).await.clone()
    }

    /// Whether `initialize` has already settled.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn build_client(&self) -> Option<Arc<dyn AiService>> {
        let Some(credential) = resolve_credential(&self.stores, OPENAI_API_KEY) else {
            self.reporter.report(&Diagnostic::MissingCredential);
            return None;
        };

        if self.disclose_key_prefix {
            self.reporter.report(&Diagnostic::CredentialPrefix {
                prefix: credential.prefix(KEY_PREFIX_LEN),
            });
        }

        let client = (self.factory)(&credential);

        match client.list_models().await {
            Ok(models) => {
                info!("OpenAI client ready ({} models available)", models.len());
                Some(client)
            }
            Err(e) => {
                self.reporter.report(&Diagnostic::ProbeFailed {
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockAiClient;
    use crate::diagnostics::CollectingReporter;
    use crate::secrets::InMemorySecretStore;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn env_with_key(key: &str) -> Box<dyn SecretStore> {
        Box::new(InMemorySecretStore::new().with_secret(OPENAI_API_KEY, key))
    }

    fn empty_store() -> Box<dyn SecretStore> {
        Box::new(InMemorySecretStore::new())
    }

    fn mock_factory(mock: &MockAiClient, built: Arc<AtomicUsize>) -> ClientFactory {
        let mock = mock.clone();
        Box::new(move |_credential: &Credential| {
            built.fetch_add(1, Ordering::SeqCst);
            Arc::new(mock.clone()) as Arc<dyn AiService>
        })
    }

    #[tokio::test]
    async fn test_env_credential_yields_client_and_probes_once() {
        let mock = MockAiClient::new();
        let built = Arc::new(AtomicUsize::new(0));
        let reporter = CollectingReporter::new();

        let initializer = ClientInitializer::new(
            vec![env_with_key("sk-test-123"), empty_store()],
            mock_factory(&mock, built.clone()),
            Arc::new(reporter.clone()),
        );

        assert!(initializer.initialize().await.is_some());
        assert_eq!(mock.get_probe_count(), 1);
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(reporter.diagnostics().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_reports_and_returns_none() {
        let mock = MockAiClient::new();
        let built = Arc::new(AtomicUsize::new(0));
        let reporter = CollectingReporter::new();

        let initializer = ClientInitializer::new(
            vec![empty_store(), empty_store()],
            mock_factory(&mock, built.clone()),
            Arc::new(reporter.clone()),
        );

        assert!(initializer.initialize().await.is_none());
        assert_eq!(reporter.diagnostics(), vec![Diagnostic::MissingCredential]);
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_to_second_store() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_by_factory = seen.clone();
        let mock = MockAiClient::new();

        let initializer = ClientInitializer::new(
            vec![env_with_key(""), env_with_key("sk-from-secrets")],
            Box::new(move |credential: &Credential| {
                seen_by_factory
                    .lock()
                    .unwrap()
                    .push(credential.expose().to_string());
                Arc::new(mock.clone()) as Arc<dyn AiService>
            }),
            Arc::new(CollectingReporter::new()),
        );

        assert!(initializer.initialize().await.is_some());
        assert_eq!(*seen.lock().unwrap(), vec!["sk-from-secrets".to_string()]);
    }

    #[tokio::test]
    async fn test_probe_failure_reports_message() {
        let mock = MockAiClient::new().with_probe_error("OpenAI API error (status 401): bad key");
        let reporter = CollectingReporter::new();

        let initializer = ClientInitializer::new(
            vec![env_with_key("sk-bad")],
            mock_factory(&mock, Arc::new(AtomicUsize::new(0))),
            Arc::new(reporter.clone()),
        );

        assert!(initializer.initialize().await.is_none());
        match reporter.diagnostics().as_slice() {
            [Diagnostic::ProbeFailed { message }] => assert!(message.contains("401")),
            other => panic!("unexpected diagnostics: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_memoizes_client() {
        let mock = MockAiClient::new();
        let built = Arc::new(AtomicUsize::new(0));

        let initializer = ClientInitializer::new(
            vec![env_with_key("sk-test")],
            mock_factory(&mock, built.clone()),
            Arc::new(CollectingReporter::new()),
        );

        assert!(!initializer.is_initialized());
        let first = initializer.initialize().await.unwrap();
        let second = initializer.initialize().await.unwrap();

        assert!(initializer.is_initialized());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.get_probe_count(), 1);
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memoizes_absent_outcome() {
        let reporter = CollectingReporter::new();
        let initializer = ClientInitializer::new(
            vec![empty_store()],
            mock_factory(&MockAiClient::new(), Arc::new(AtomicUsize::new(0))),
            Arc::new(reporter.clone()),
        );

        assert!(initializer.initialize().await.is_none());
        assert!(initializer.initialize().await.is_none());
        assert_eq!(reporter.diagnostics().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_build_once() {
        let mock = MockAiClient::new();
        let built = Arc::new(AtomicUsize::new(0));

        let initializer = ClientInitializer::new(
            vec![env_with_key("sk-test")],
            mock_factory(&mock, built.clone()),
            Arc::new(CollectingReporter::new()),
        );

        let (a, b, c) = tokio::join!(
            initializer.initialize(),
            initializer.initialize(),
            initializer.initialize()
        );

        assert!(a.is_some() && b.is_some() && c.is_some());
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(mock.get_probe_count(), 1);
    }

    #[tokio::test]
    async fn test_key_prefix_disclosure_is_opt_in() {
        let reporter = CollectingReporter::new();
        let initializer = ClientInitializer::new(
            vec![env_with_key("sk-proj-abcdef")],
            mock_factory(&MockAiClient::new(), Arc::new(AtomicUsize::new(0))),
            Arc::new(reporter.clone()),
        )
        .with_key_prefix_disclosure(true);

        assert!(initializer.initialize().await.is_some());
        assert_eq!(
            reporter.diagnostics(),
            vec![Diagnostic::CredentialPrefix {
                prefix: "sk-pr".to_string()
            }]
        );
    }
}
