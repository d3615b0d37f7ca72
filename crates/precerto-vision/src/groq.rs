//! Groq-backed extraction — a configured-but-dormant online variant.
//!
//! OpenAI-compatible like OpenRouter, but with separate models per
//! capability: a multimodal model for label photos and a fast text model for
//! enrichment. The vision models on the free tier are chatty, so replies are
//! salvaged by extracting the outermost `{...}` block before parsing. Text
//! requests instead pin `response_format` to a JSON object.

use async_trait::async_trait;

use crate::error::{preview, ExtractionError};
use crate::extractor::{ExtractedCandidate, LabelExtractor};
use crate::parse::{ensure_data_uri, extract_json_block, parse_candidate};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const GROQ_TEXT_MODEL: &str = "llama-3.1-8b-instant";

const PROVIDER: &str = "groq";

const IMAGE_PROMPT: &str = "Analise este rótulo de produto. Extraia Nome, Marca e Tamanho/Peso.\n\
Responda EXCLUSIVAMENTE um JSON puro, sem markdown, no formato:\n\
{ \"description\": \"...\", \"brand\": \"...\", \"size\": \"...\" }\n\n\
Regras:\n\
1. description: Nome completo e claro do produto.\n\
2. brand: Marca do fabricante (ex: Coca-Cola, Nestlé).\n\
3. size: Peso/Volume com unidade (ex: 350ml, 1kg).";

pub struct GroqExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GroqExtractor {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GROQ_BASE_URL)
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
impl LabelExtractor for GroqExtractor {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn extract_from_image(
        &self,
        image_base64: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = GROQ_VISION_MODEL, "sending label image to Groq");

        let body = serde_json::json!({
            "model": GROQ_VISION_MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": IMAGE_PROMPT },
                    { "type": "image_url", "image_url": { "url": ensure_data_uri(image_base64) } }
                ]
            }],
            "temperature": 0.1,
            "max_tokens": 1024
        });

        let content = self.chat(body).await?;
        let salvaged = extract_json_block(&content).unwrap_or(&content);
        parse_candidate(PROVIDER, salvaged).map(ExtractedCandidate::into_title_cased)
    }

    async fn extract_from_text(
        &self,
        description: &str,
    ) -> Result<ExtractedCandidate, ExtractionError> {
        tracing::info!(model = GROQ_TEXT_MODEL, "inferring brand from description");

        let prompt = format!(
            "Analise a descrição: \"{description}\".\n\
             Extraia Marca (brand) e Tamanho (size).\n\
             Responda APENAS JSON: {{ \"brand\": \"...\", \"size\": \"...\" }}"
        );
        let body = serde_json::json!({
            "model": GROQ_TEXT_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.1,
            "response_format": { "type": "json_object" }
        });

        let content = self.chat(body).await?;
        parse_candidate(PROVIDER, &content).map(ExtractedCandidate::into_title_cased)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn vision_reply_with_prose_is_salvaged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "Aqui está o resultado: {\"description\": \"café torrado\", \"brand\": \"pilão\", \"size\": \"500g\"} como pedido.",
            )))
            .mount(&server)
            .await;

        let extractor = GroqExtractor::with_base_url("test-key", &server.uri());
        let candidate = extractor
            .extract_from_image("aGVsbG8=")
            .await
            .expect("prose-wrapped reply should salvage");

        assert_eq!(candidate.description.as_deref(), Some("Café Torrado"));
        assert_eq!(candidate.brand.as_deref(), Some("Pilão"));
        assert_eq!(candidate.size.as_deref(), Some("500g"));
    }

    #[tokio::test]
    async fn text_request_pins_json_object_response_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": GROQ_TEXT_MODEL,
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "{\"brand\": \"Pilão\", \"size\": \"500g\"}",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = GroqExtractor::with_base_url("test-key", &server.uri());
        let candidate = extractor
            .extract_from_text("Café Torrado E Moído 500g")
            .await
            .expect("reply should parse");
        assert_eq!(candidate.brand.as_deref(), Some("Pilão"));
    }

    #[tokio::test]
    async fn reply_without_any_braces_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "não consegui ler o rótulo",
            )))
            .mount(&server)
            .await;

        let extractor = GroqExtractor::with_base_url("test-key", &server.uri());
        let err = extractor.extract_from_image("aGVsbG8=").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }
}
