//! HTTP client for the Cosmos GTIN catalog.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

use precerto_core::{extract_size_token, title_case, ProductRecord};
use precerto_vision::LabelExtractor;

use crate::types::{CosmosProduct, LookupOutcome};

/// Errors raised while constructing the client. Lookups themselves never
/// fail — every runtime problem becomes a [`LookupOutcome`] variant.
#[derive(Debug, Error)]
pub enum CosmosError {
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the Cosmos catalog.
///
/// Holds a reused HTTP client, the catalog base URL (the real host in
/// production, the credential-injecting proxy otherwise), an optional token
/// for direct access, and the active extraction provider for brand
/// enrichment.
///
/// No request timeout is configured and in-flight lookups cannot be
/// cancelled; callers that care should wrap calls in their own
/// `tokio::time::timeout`.
pub struct CosmosClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    extractor: Arc<dyn LabelExtractor>,
}

impl CosmosClient {
    /// Creates a new client.
    ///
    /// When `token` is `None` the `X-Cosmos-Token` header is omitted
    /// entirely — the proxy deployment injects it server-side.
    ///
    /// # Errors
    ///
    /// Returns [`CosmosError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        extractor: Arc<dyn LabelExtractor>,
    ) -> Result<Self, CosmosError> {
        let client = reqwest::Client::builder()
            .user_agent("Cosmos-API-Request")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
            extractor,
        })
    }

    /// Looks a product up by its barcode.
    ///
    /// `gtin` is expected to be a non-empty digit string; no further format
    /// validation is performed. HTTP 404 maps to [`LookupOutcome::NotFound`],
    /// any other non-success status and every network failure map to
    /// [`LookupOutcome::TransportError`]. This method never panics and has no
    /// error return: the outcome is the whole story.
    pub async fn lookup_by_gtin(&self, gtin: &str) -> LookupOutcome {
        let url = format!("{}/gtins/{}.json", self.base_url, gtin);
        let mut request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("X-Cosmos-Token", token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(gtin, error = %e, "catalog request failed");
                return LookupOutcome::TransportError(format!("transport failure: {e}"));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(gtin, "gtin not in catalog");
            return LookupOutcome::NotFound;
        }
        if !status.is_success() {
            tracing::warn!(gtin, status = %status, "catalog returned an error status");
            return LookupOutcome::TransportError(format!("HTTP {status}"));
        }

        let raw: CosmosProduct = match response.json().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(gtin, error = %e, "catalog response did not match the expected shape");
                return LookupOutcome::TransportError(format!("unparsable catalog response: {e}"));
            }
        };

        LookupOutcome::Found(self.normalize(raw).await)
    }

    /// Maps the catalog's native fields into the canonical record and runs
    /// the brand-enrichment fallback.
    ///
    /// Enrichment fires only when the catalog brand is empty and the
    /// description is not; its failure is absorbed here and never surfaces
    /// to the caller. A record with a known brand but unknown size is
    /// deliberately never size-enriched.
    async fn normalize(&self, raw: CosmosProduct) -> ProductRecord {
        let description = title_case(&raw.description);
        let native_brand = raw.brand.and_then(|b| b.name).unwrap_or_default();
        let mut brand = title_case(&native_brand);
        let mut size = extract_size_token(&raw.description).unwrap_or_default();

        if brand.is_empty() && !description.is_empty() {
            tracing::info!(gtin = raw.gtin, "brand missing in catalog, trying text enrichment");
            match self.extractor.extract_from_text(&description).await {
                Ok(candidate) => {
                    if let Some(candidate_brand) = candidate.brand {
                        brand = candidate_brand;
                    }
                    if size.is_empty() {
                        if let Some(candidate_size) = candidate.size {
                            size = candidate_size;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        gtin = raw.gtin,
                        provider = self.extractor.name(),
                        error = %e,
                        "text enrichment failed, keeping catalog record as-is"
                    );
                }
            }
        }

        ProductRecord {
            gtin: raw.gtin.to_string(),
            description,
            brand,
            size,
            price: raw.avg_price.unwrap_or(0.0),
            thumbnail: raw.thumbnail.filter(|t| !t.is_empty()),
        }
    }
}
