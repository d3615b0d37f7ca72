//! Gemini-backed extraction — a configured-but-dormant online variant.
//!
//! Kept fully functional so the selection rule can be widened later, but the
//! current static priority never picks it automatically.
//!
//! Differences from the OpenAI-compatible variants: the API key travels as a
//! URL query parameter (so request URLs must never be logged), the image is
//! sent as bare inline bytes rather than a data URI, and
//! `responseMimeType: "application/json"` makes fence-stripping a no-op in
//! practice.

use async_trait::async_trait;

use crate::error::{preview, ExtractionError};
use crate::extractor::{ExtractedCandidate, LabelExtractor};
use crate::parse::{parse_candidate, strip_data_uri};
use crate::select::PLACEHOLDER_API_KEY;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

const PROVIDER: &str = "gemini";

const IMAGE_PROMPT: &str =
    "Analise este rótulo de produto. Extraia Nome, Marca e Tamanho/Peso. Responda apenas JSON.";

pub struct GeminiExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiExtractor {
    /// Creates the extractor. An empty or placeholder key is accepted at
    /// construction time; calls then fail with
    /// [`ExtractionError::MissingCredential`].
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL)
    }

    /// Creates an extractor pointed at a custom base URL (for testing with
    /// wiremock).
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        let api_key = api_key.into();
        let api_key = (!api_key.is_empty() && api_key != PLACEHOLDER_API_KEY).then_some(api_key);
        if api_key.is_none() {
            tracing::warn!("Gemini extractor constructed without a usable API key");
        }
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    /// Sends one `generateContent` request and returns the reply text.
    async fn generate(&self, parts: serde_json::Value) -> Result<String, ExtractionError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(ExtractionError::MissingCredential { provider: PROVIDER })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "nome": { "type": "STRING", "description": "Nome principal do produto." },
                        "marca": { "type": "STRING", "description": "Marca do fabricante." },
                        "tamanho": { "type": "STRING", "description": "Peso líquido ou volume (ex: 1kg, 500ml)." }
                    },
                    "required": ["nome"]
                },
                "temperature": 0.1
            }
        });

        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                provider: PROVIDER,
                status,
                preview: preview(&body),
            });
        }

        let body: serde_json::Value = response.json().await?;
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_owned)
            .ok_or(ExtractionError::EmptyCompletion { provider: PROVIDER })
    }
}

#[async_trait]
impl LabelExtractor for GeminiExtractor {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn extract_from_image(
        &self,
        image_base64: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = GEMINI_MODEL, "sending label image to Gemini");

        let parts = serde_json::json!([
            { "inline_data": { "mime_type": "image/jpeg", "data": strip_data_uri(image_base64) } },
            { "text": IMAGE_PROMPT }
        ]);
        let text = self.generate(parts).await?;
        parse_candidate(PROVIDER, &text).map(ExtractedCandidate::into_title_cased)
    }

    async fn extract_from_text(
        &self,
        description: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = GEMINI_MODEL, "inferring brand from description");

        let prompt = format!(
            "Analise a descrição de produto: \"{description}\". \
             Extraia Marca (marca) e Tamanho (tamanho). Responda apenas JSON."
        );
        let parts = serde_json::json!([{ "text": prompt }]);
        let text = self.generate(parts).await?;
        parse_candidate(PROVIDER, &text).map(ExtractedCandidate::into_title_cased)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn reply_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let extractor = GeminiExtractor::new("");
        let err = extractor.extract_from_image("aGVsbG8=").await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn placeholder_credential_is_unusable() {
        let extractor = GeminiExtractor::new(PLACEHOLDER_API_KEY);
        let err = extractor.extract_from_text("Leite 1L").await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn image_is_sent_as_bare_inline_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{GEMINI_MODEL}:generateContent")))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "parts": [
                    { "inline_data": { "data": "aGVsbG8=" } }
                ]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
                "{\"nome\": \"leite uht\", \"marca\": \"piracanjuba\", \"tamanho\": \"1L\"}",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = GeminiExtractor::with_base_url("test-key", &server.uri());
        let candidate = extractor
            .extract_from_image("data:image/jpeg;base64,aGVsbG8=")
            .await
            .expect("reply should parse");

        assert_eq!(candidate.description.as_deref(), Some("Leite Uht"));
        assert_eq!(candidate.brand.as_deref(), Some("Piracanjuba"));
    }

    #[tokio::test]
    async fn upstream_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("key rejected"))
            .mount(&server)
            .await;

        let extractor = GeminiExtractor::with_base_url("test-key", &server.uri());
        let err = extractor.extract_from_text("Leite 1L").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Api { status, .. } if status.as_u16() == 403));
    }
}
