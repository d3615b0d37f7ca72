//! Failure taxonomy shared by all extraction providers.

use thiserror::Error;

/// Errors raised by a [`crate::LabelExtractor`] call.
///
/// Fatal when resolving by image (there is no fallback for that path);
/// absorbed by the caller when the call is a text-enrichment attempt.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The variant was constructed without a usable API credential.
    #[error("no API credential configured for {provider}")]
    MissingCredential { provider: &'static str },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} returned status {status}: {preview}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        preview: String,
    },

    /// The provider answered 2xx but the completion text was missing.
    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: &'static str },

    /// The completion text could not be parsed as a candidate, even after
    /// stripping code fences.
    #[error("unparsable candidate from {provider}: {reason} (got: {preview})")]
    Parse {
        provider: &'static str,
        reason: String,
        preview: String,
    },
}

/// Truncates a response body for diagnostics. Full bodies are never logged
/// and credentials never appear in response previews.
#[must_use]
pub(crate) fn preview(body: &str) -> String {
    const MAX_CHARS: usize = 120;
    if body.chars().count() <= MAX_CHARS {
        body.to_owned()
    } else {
        let mut cut: String = body.chars().take(MAX_CHARS).collect();
        cut.push('…');
        cut
    }
}
