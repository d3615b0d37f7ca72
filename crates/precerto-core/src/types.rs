//! Canonical product record returned by every resolution path.

use serde::{Deserialize, Serialize};

/// A normalized product, regardless of whether it came from the catalog or
/// from label extraction.
///
/// `gtin` is the numeric barcode rendered as a string (no check-digit
/// validation) and is assigned exactly once; the empty string means the
/// record came from an image and the caller still has to supply one.
/// `description`, `brand`, and `size` use the empty string as the "unknown"
/// sentinel — they are never absent. `price` falls back to `0.0` when the
/// catalog has no average price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub gtin: String,
    pub description: String,
    pub brand: String,
    pub size: String,
    pub price: f64,
    pub thumbnail: Option<String>,
}
