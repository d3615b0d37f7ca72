//! Completion-text salvage and candidate parsing.
//!
//! Vision models are asked for pure JSON but routinely wrap it in Markdown
//! code fences or surround it with prose. These helpers strip that noise
//! before handing the text to serde.

use crate::error::{preview, ExtractionError};
use crate::extractor::ExtractedCandidate;

/// Removes Markdown code-fence markers (```` ```json ```` and ```` ``` ````)
/// and surrounding whitespace.
#[must_use]
pub(crate) fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_owned()
}

/// Salvages the outermost `{...}` block from a completion that mixes JSON
/// with prose. Returns `None` when no braces are present.
#[must_use]
pub(crate) fn extract_json_block(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end >= start).then(|| &content[start..=end])
}

/// Wraps a bare base64 payload in a `data:image/jpeg;base64,` URI. Payloads
/// that already are data URIs pass through untouched.
#[must_use]
pub(crate) fn ensure_data_uri(image_base64: &str) -> String {
    if image_base64.starts_with("data:") {
        image_base64.to_owned()
    } else {
        format!("data:image/jpeg;base64,{image_base64}")
    }
}

/// Strips a `data:` URI header, leaving the bare base64 payload expected by
/// APIs that take inline bytes instead of URIs.
#[must_use]
pub(crate) fn strip_data_uri(image_base64: &str) -> &str {
    match image_base64.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => payload,
        _ => image_base64,
    }
}

/// Parses a completion into an [`ExtractedCandidate`], stripping code fences
/// first. A completion that still fails to parse becomes
/// [`ExtractionError::Parse`] with a truncated preview, never a panic.
pub(crate) fn parse_candidate(
    provider: &'static str,
    content: &str,
) -> Result<ExtractedCandidate, ExtractionError> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned).map_err(|e| ExtractionError::Parse {
        provider,
        reason: e.to_string(),
        preview: preview(content),
    })
}
