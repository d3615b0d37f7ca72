//! OpenRouter-backed extraction — the default online variant.
//!
//! Talks to the OpenAI-compatible chat-completions endpoint with an inline
//! base64 JPEG for the vision path. The model is asked for pure JSON but the
//! reply is fence-stripped before parsing anyway, since free-tier vision
//! models routinely wrap output in Markdown.

use async_trait::async_trait;

use crate::error::{preview, ExtractionError};
use crate::extractor::{ExtractedCandidate, LabelExtractor};
use crate::parse::{ensure_data_uri, parse_candidate};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-exp:free";

const PROVIDER: &str = "openrouter";

const IMAGE_PROMPT: &str = "Analise este rótulo de produto. Extraia Nome, Marca e Tamanho/Peso.\n\
Responda EXCLUSIVAMENTE um JSON puro, sem markdown, no formato:\n\
{ \"nome\": \"...\", \"marca\": \"...\", \"tamanho\": \"...\" }";

pub struct OpenRouterExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterExtractor {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OPENROUTER_BASE_URL)
    }

    /// Creates an extractor pointed at a custom base URL (for testing with
    /// wiremock).
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    /// Sends one chat-completion request and returns the completion text.
    async fn chat(&self, body: serde_json::Value) -> Result<String, ExtractionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://precerto.app")
            .header("X-Title", "Preco Certo")
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
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or(ExtractionError::EmptyCompletion { provider: PROVIDER })
    }
}

#[async_trait]
impl LabelExtractor for OpenRouterExtractor {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn extract_from_image(
        &self,
        image_base64: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = OPENROUTER_MODEL, "sending label image to OpenRouter");

        let body = serde_json::json!({
            "model": OPENROUTER_MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": IMAGE_PROMPT },
                    { "type": "image_url", "image_url": { "url": ensure_data_uri(image_base64) } }
                ]
            }]
        });

        let content = self.chat(body).await?;
        tracing::debug!(reply = %preview(&content), "OpenRouter completion received");
        parse_candidate(PROVIDER, &content).map(ExtractedCandidate::into_title_cased)
    }

    async fn extract_from_text(
        &self,
        description: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = OPENROUTER_MODEL, "inferring brand from description");

        let prompt = format!(
            "Analise a descrição: \"{description}\".\n\
             Extraia Marca (marca) e Tamanho (tamanho).\n\
             Responda APENAS JSON: {{ \"marca\": \"...\", \"tamanho\": \"...\" }}"
        );
        let body = serde_json::json!({
            "model": OPENROUTER_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.1
        });

        let content = self.chat(body).await?;
        parse_candidate(PROVIDER, &content).map(ExtractedCandidate::into_title_cased)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn image_extraction_parses_fenced_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "```json\n{\"nome\": \"leite integral\", \"marca\": \"italac\", \"tamanho\": \"1L\"}\n```",
            )))
            .mount(&server)
            .await;

        let extractor = OpenRouterExtractor::with_base_url("test-key", &server.uri());
        let candidate = extractor
            .extract_from_image("aGVsbG8=")
            .await
            .expect("fenced reply should parse");

        assert_eq!(candidate.description.as_deref(), Some("Leite Integral"));
        assert_eq!(candidate.brand.as_deref(), Some("Italac"));
        assert_eq!(candidate.size.as_deref(), Some("1L"));
    }

    #[tokio::test]
    async fn image_payload_is_sent_as_data_uri() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": OPENROUTER_MODEL,
                "messages": [{
                    "content": [
                        {},
                        { "image_url": { "url": "data:image/jpeg;base64,aGVsbG8=" } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = OpenRouterExtractor::with_base_url("test-key", &server.uri());
        extractor
            .extract_from_image("aGVsbG8=")
            .await
            .expect("empty candidate should parse");
    }

    #[tokio::test]
    async fn unparsable_reply_is_a_parse_error_not_a_panic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "```json\ndefinitely not json\n```",
            )))
            .mount(&server)
            .await;

        let extractor = OpenRouterExtractor::with_base_url("test-key", &server.uri());
        let err = extractor.extract_from_image("aGVsbG8=").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = OpenRouterExtractor::with_base_url("test-key", &server.uri());
        let err = extractor.extract_from_text("Leite Integral 1l").await.unwrap_err();
        match err {
            ExtractionError::Api { status, preview, .. } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(preview, "rate limited");
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn text_extraction_title_cases_the_brand() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "{\"marca\": \"NESTLÉ\", \"tamanho\": \"200g\"}",
            )))
            .mount(&server)
            .await;

        let extractor = OpenRouterExtractor::with_base_url("test-key", &server.uri());
        let candidate = extractor
            .extract_from_text("Chocolate Ao Leite 200g")
            .await
            .expect("reply should parse");
        assert_eq!(candidate.brand.as_deref(), Some("Nestlé"));
        assert_eq!(candidate.size.as_deref(), Some("200g"));
    }
}
