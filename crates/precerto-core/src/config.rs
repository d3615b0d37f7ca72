//! Environment-driven application configuration.
//!
//! The parsing core is decoupled from the real process environment through a
//! lookup function so tests can drive it with a plain `HashMap` instead of
//! mutating env vars.

use std::net::SocketAddr;

use thiserror::Error;

/// Default public host of the Cosmos GTIN catalog.
pub const DEFAULT_COSMOS_BASE_URL: &str = "https://api.cosmos.bluesoft.com.br";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Process-wide configuration for the resolution pipeline and its binaries.
///
/// The catalog token is optional: in non-production setups requests go
/// through the proxy, which injects the credential server-side, and the
/// client sends no token header at all.
#[derive(Clone)]
pub struct AppConfig {
    /// Base URL the lookup client talks to — the real catalog host in
    /// production, the local proxy otherwise.
    pub cosmos_base_url: String,
    pub cosmos_token: Option<String>,
    pub proxy_bind_addr: SocketAddr,
    /// Host the proxy forwards to; always the real catalog in practice.
    pub proxy_upstream_url: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("cosmos_base_url", &self.cosmos_base_url)
            .field(
                "cosmos_token",
                &self.cosmos_token.as_ref().map(|_| "[redacted]"),
            )
            .field("proxy_bind_addr", &self.proxy_bind_addr)
            .field("proxy_upstream_url", &self.proxy_upstream_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Load configuration from environment variables, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from variables already in the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_owned())
    };
    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let proxy_bind_addr = {
        let raw = or_default("PROXY_BIND_ADDR", "127.0.0.1:8787");
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "PROXY_BIND_ADDR".to_owned(),
                reason: e.to_string(),
            })?
    };

    Ok(AppConfig {
        cosmos_base_url: or_default("COSMOS_BASE_URL", DEFAULT_COSMOS_BASE_URL),
        cosmos_token: optional("COSMOS_TOKEN"),
        proxy_bind_addr,
        proxy_upstream_url: or_default("PROXY_UPSTREAM_URL", DEFAULT_COSMOS_BASE_URL),
        log_level: or_default("LOG_LEVEL", "info"),
    })
}
