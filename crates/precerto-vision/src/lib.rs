//! Label-extraction providers for the Preço Certo pipeline.
//!
//! Defines the [`LabelExtractor`] capability — turn a product-label photo or
//! a free-text description into a candidate `{description, brand, size}` —
//! and its interchangeable backends: OpenRouter (the default online choice),
//! Gemini and Groq (configured-but-dormant alternatives), and a
//! deterministic offline stub. [`select_extractor`] picks the active backend
//! once per process from the discovered credentials.

pub mod error;
pub mod extractor;
pub mod gemini;
pub mod groq;
pub mod offline;
pub mod openrouter;
pub mod select;

mod parse;

pub use error::ExtractionError;
pub use extractor::{ExtractedCandidate, LabelExtractor};
pub use gemini::GeminiExtractor;
pub use groq::GroqExtractor;
pub use offline::OfflineExtractor;
pub use openrouter::OpenRouterExtractor;
pub use select::{select_extractor, ProviderCredentials};
