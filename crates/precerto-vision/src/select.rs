//! Provider credential discovery and the static selection rule.
//!
//! Selection runs exactly once per process: `main` discovers credentials,
//! calls [`select_extractor`], and clones the resulting `Arc` into every
//! component that needs the provider. There is no module-level singleton to
//! race on — "one active provider per process" holds by construction.

use std::sync::Arc;

use crate::extractor::LabelExtractor;
use crate::offline::OfflineExtractor;
use crate::openrouter::OpenRouterExtractor;

/// Sentinel value some deployment templates ship instead of a real key.
pub const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

/// Credentials discovered from the environment at selection time.
///
/// Read once; later changes to the environment are deliberately not seen.
/// The Groq token is discovered for the `providers` diagnostic surface even
/// though the static rule never routes to it.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    pub openrouter: Option<String>,
    pub google: Option<String>,
    pub groq: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("ProviderCredentials")
            .field("openrouter", &redact(&self.openrouter))
            .field("google", &redact(&self.google))
            .field("groq", &redact(&self.groq))
            .finish()
    }
}

impl ProviderCredentials {
    /// Discovers credentials from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Discovers credentials through an explicit lookup function (tests use
    /// a `HashMap` instead of the real environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let usable = |key: &str| -> Option<String> {
            lookup(key)
                .ok()
                .filter(|v| !v.is_empty() && v != PLACEHOLDER_API_KEY)
        };
        Self {
            openrouter: usable("OPENROUTER_TOKEN"),
            google: usable("GOOGLE_TOKEN"),
            groq: usable("GROQ_TOKEN"),
        }
    }

    /// The credential the static priority rule hands to the default online
    /// variant: the OpenRouter token, falling back to the Google token.
    #[must_use]
    pub fn discovered(&self) -> Option<&str> {
        self.openrouter.as_deref().or(self.google.as_deref())
    }
}

/// Returns the single active extraction provider for this process.
///
/// Static priority, intentionally not runtime-negotiated: no usable
/// credential means the offline stub; any usable credential means the
/// OpenRouter variant. The Gemini and Groq variants stay dormant until the
/// selection rule is widened. Selection always succeeds.
#[must_use]
pub fn select_extractor(credentials: &ProviderCredentials) -> Arc<dyn LabelExtractor> {
    match credentials.discovered() {
        Some(key) => {
            tracing::info!(provider = "openrouter", "extraction provider selected");
            Arc::new(OpenRouterExtractor::new(key))
        }
        None => {
            tracing::info!(
                provider = "offline",
                "no usable credential found, using offline stub"
            );
            Arc::new(OfflineExtractor::new())
        }
    }
}
