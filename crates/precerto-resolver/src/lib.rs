//! Top-level resolution orchestrator.
//!
//! Combines the catalog lookup with image-based extraction so every caller
//! receives the same canonical [`ProductRecord`] no matter which path
//! produced it. The barcode path degrades gracefully — "not in catalog" and
//! "catalog unreachable" are distinct, recoverable answers — while the image
//! path has no fallback and surfaces extraction failures directly.

use std::sync::Arc;

use thiserror::Error;

use precerto_core::ProductRecord;
use precerto_cosmos::{CosmosClient, LookupOutcome};
use precerto_vision::{ExtractionError, LabelExtractor};

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog could not be reached or answered with an error status.
    /// Recoverable: the caller may retry or route to manual entry.
    #[error("catalog transport failure: {0}")]
    Transport(String),

    /// Label extraction failed. Fatal to the image-resolution path — there
    /// is no further fallback.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Entry point combining catalog lookup with image/text extraction.
///
/// Holds the catalog client and a clone of the same provider `Arc` the
/// client enriches with, so exactly one extraction backend is active per
/// process.
pub struct Resolver {
    cosmos: CosmosClient,
    extractor: Arc<dyn LabelExtractor>,
}

impl Resolver {
    #[must_use]
    pub fn new(cosmos: CosmosClient, extractor: Arc<dyn LabelExtractor>) -> Self {
        Self { cosmos, extractor }
    }

    /// The active extraction provider (shared with the catalog client).
    #[must_use]
    pub fn extractor(&self) -> &Arc<dyn LabelExtractor> {
        &self.extractor
    }

    /// Resolves a scanned barcode into a product record.
    ///
    /// Returns `Ok(None)` when the catalog has no entry for the GTIN — the
    /// caller routes to manual entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`] when the catalog call failed in a
    /// recoverable way, so the caller can offer a retry instead of treating
    /// the product as unknown.
    pub async fn resolve_by_barcode(
        &self,
        gtin: &str,
    ) -> Result<Option<ProductRecord>, ResolveError> {
        match self.cosmos.lookup_by_gtin(gtin).await {
            LookupOutcome::Found(record) => Ok(Some(record)),
            LookupOutcome::NotFound => Ok(None),
            LookupOutcome::TransportError(reason) => Err(ResolveError::Transport(reason)),
        }
    }

    /// Resolves a photographed product label into a product record.
    ///
    /// The returned record has an empty `gtin`: the caller must assign one,
    /// typically by prompting for manual barcode entry. Description and
    /// brand arrive already title-cased from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Extraction`] when the provider call fails;
    /// image resolution has no graceful degradation.
    pub async fn resolve_by_image(&self, image_base64: &str) -> Result<ProductRecord, ResolveError> {
        let candidate = self.extractor.extract_from_image(image_base64).await?;
        tracing::info!(
            provider = self.extractor.name(),
            has_brand = candidate.brand.is_some(),
            has_size = candidate.size.is_some(),
            "label extraction succeeded"
        );

        Ok(ProductRecord {
            gtin: String::new(),
            description: candidate.description.unwrap_or_default(),
            brand: candidate.brand.unwrap_or_default(),
            size: candidate.size.unwrap_or_default(),
            price: 0.0,
            thumbnail: None,
        })
    }
}
