//! Catalog lookup client for the Bluesoft Cosmos GTIN API.
//!
//! Maps HTTP outcomes into the exhaustive [`LookupOutcome`] shape — found,
//! not found, or transport failure — and enriches records whose brand the
//! catalog does not know through the active label-extraction provider.
//! Nothing in this crate throws past the lookup boundary: a network failure
//! is data, not an exception.

pub mod client;
pub mod types;

pub use client::{CosmosClient, CosmosError};
pub use types::{CosmosBrand, CosmosProduct, LookupOutcome};
