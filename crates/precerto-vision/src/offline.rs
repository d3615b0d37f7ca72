//! Deterministic offline stub — the guaranteed fallback variant.
//!
//! Never touches the network. Responses are fixed, but the stub sleeps
//! before answering so callers observe the same latency contract as the
//! real providers and stay latency-agnostic in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExtractionError;
use crate::extractor::{ExtractedCandidate, LabelExtractor};

const PROVIDER: &str = "offline";

const IMAGE_DELAY: Duration = Duration::from_millis(1500);
const TEXT_DELAY: Duration = Duration::from_millis(500);

pub struct OfflineExtractor {
    image_delay: Duration,
    text_delay: Duration,
}

impl OfflineExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            image_delay: IMAGE_DELAY,
            text_delay: TEXT_DELAY,
        }
    }

    /// Overrides the simulated delays (for tests that run on real time).
    #[must_use]
    pub fn with_delays(image_delay: Duration, text_delay: Duration) -> Self {
        Self {
            image_delay,
            text_delay,
        }
    }
}

impl Default for OfflineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LabelExtractor for OfflineExtractor {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn extract_from_image(
        &self,
        _image_base64: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tokio::time::sleep(self.image_delay).await;
        tracing::info!("analyzing label image offline (simulated)");

        Ok(ExtractedCandidate {
            description: Some("Produto Teste Mockado".to_owned()),
            brand: Some("Marca Genérica".to_owned()),
            size: Some("1kg".to_owned()),
        }
        .into_title_cased())
    }

    async fn extract_from_text(
        &self,
        description: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tokio::time::sleep(self.text_delay).await;

        Ok(ExtractedCandidate {
            description: Some(description.to_owned()),
            brand: Some("Marca Mockada Texto".to_owned()),
            size: Some("500g".to_owned()),
        }
        .into_title_cased())
    }
}
