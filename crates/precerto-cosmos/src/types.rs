//! Cosmos API wire types and the lookup outcome.

use serde::Deserialize;

use precerto_core::ProductRecord;

/// Subset of the Cosmos `GET /gtins/{gtin}.json` response this pipeline
/// consumes. The catalog returns many more fields (NCM, GPC, physical
/// dimensions); they are ignored on deserialization.
#[derive(Debug, Deserialize)]
pub struct CosmosProduct {
    /// Numeric GTIN as the catalog stores it.
    pub gtin: u64,
    pub description: String,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// May be absent or an empty object for unbranded/unknown products.
    #[serde(default)]
    pub brand: Option<CosmosBrand>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CosmosBrand {
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of one catalog lookup. Exactly one variant applies; callers must
/// handle all three.
///
/// `NotFound` is expected data, not an error. `TransportError` is
/// recoverable — the caller may retry or fall back to manual entry — and
/// carries either the HTTP status or a generic transport reason.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(ProductRecord),
    NotFound,
    TransportError(String),
}
