//! Shared domain types and helpers for the Preço Certo pipeline.
//!
//! Holds the canonical [`ProductRecord`] shape every resolution path funnels
//! into, the text normalization helpers that make catalog and AI-provider
//! output uniform, environment-driven configuration, and the bounded
//! in-memory diagnostics buffer.

pub mod config;
pub mod diag;
pub mod normalize;
pub mod types;

pub use config::{load_config, load_config_from_env, AppConfig, ConfigError};
pub use diag::{DiagnosticEntry, DiagnosticsBuffer, DiagnosticsLayer};
pub use normalize::{extract_size_token, title_case};
pub use types::ProductRecord;
