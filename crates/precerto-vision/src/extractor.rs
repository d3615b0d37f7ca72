//! The label-extraction capability contract.

use async_trait::async_trait;
use serde::Deserialize;

use precerto_core::title_case;

use crate::error::ExtractionError;

/// Raw candidate attributes returned by a provider, before any caller-side
/// reconciliation. Never persisted and never exposed outside the pipeline.
///
/// Providers disagree on field names — some reply in English, some in
/// Portuguese — so both spellings deserialize into the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractedCandidate {
    #[serde(default, alias = "nome")]
    pub description: Option<String>,
    #[serde(default, alias = "marca")]
    pub brand: Option<String>,
    #[serde(default, alias = "tamanho")]
    pub size: Option<String>,
}

impl ExtractedCandidate {
    /// Applies Title Case to the free-text fields and collapses empty
    /// strings to `None`, so every provider hands back the same shape.
    #[must_use]
    pub fn into_title_cased(self) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        Self {
            description: self
                .description
                .map(|d| title_case(&d))
                .and_then(non_empty),
            brand: self.brand.map(|b| title_case(&b)).and_then(non_empty),
            size: self.size.and_then(non_empty),
        }
    }
}

/// A backend capable of turning a label image or a text description into
/// candidate product attributes.
///
/// Implementations never retry internally; retry policy, if any, belongs to
/// the caller. None of the methods enforces a timeout — a hung upstream
/// stalls the caller, which should wrap calls in its own timeout if that
/// matters.
#[async_trait]
pub trait LabelExtractor: Send + Sync {
    /// Provider identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Extracts candidate attributes from a base64-encoded JPEG.
    ///
    /// The input may be a bare base64 string or a full `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when no credential is configured, the
    /// upstream call fails, or the response cannot be parsed as a candidate.
    async fn extract_from_image(
        &self,
        image_base64: &str,
    ) -> Result<ExtractedCandidate, ExtractionError>;

    /// Infers candidate attributes (notably brand and size) from a product
    /// description.
    ///
    /// Used as a best-effort enrichment step: callers treat failure as "no
    /// enrichment available", never as a pipeline failure.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`LabelExtractor::extract_from_image`].
    async fn extract_from_text(
        &self,
        description: &str,
    ) -> Result<ExtractedCandidate, ExtractionError>;
}
