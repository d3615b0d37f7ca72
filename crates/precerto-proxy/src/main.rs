//! Credential-injecting forwarder for the Cosmos catalog.
//!
//! Browsers cannot call the catalog directly because of cross-origin rules,
//! so non-production deployments point the lookup client at this endpoint
//! instead. It holds the catalog token server-side, injects it into each
//! forwarded request, and relays the upstream status verbatim. It is an
//! external collaborator of the resolution core, not part of it.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct ProxyState {
    client: reqwest::Client,
    upstream_url: String,
    token: Option<String>,
}

fn build_app(state: ProxyState) -> Router {
    Router::new()
        .route("/api/cosmos/{*path}", get(forward))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Forwards one catalog read, injecting the credential.
async fn forward(State(state): State<ProxyState>, Path(path): Path<String>) -> Response {
    let Some(token) = &state.token else {
        tracing::error!("catalog token not provisioned in the proxy environment");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "token not configured");
    };

    let url = format!("{}/{}", state.upstream_url, path);
    let upstream = state
        .client
        .get(&url)
        .header("Content-Type", "application/json")
        .header("X-Cosmos-Token", token)
        .send()
        .await;

    let response = match upstream {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "catalog request failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "lookup failed");
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(path = %path, status = %status, "relaying upstream error status");
        let relayed =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_response(relayed, &format!("catalog returned {}", status.as_u16()));
    }

    match response.json::<serde_json::Value>().await {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
            ],
            Json(body),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "catalog response was not valid JSON");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "lookup failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = precerto_core::load_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.cosmos_token.is_none() {
        tracing::warn!("COSMOS_TOKEN is not set — every request will answer 500");
    }

    let state = ProxyState {
        client: reqwest::Client::builder()
            .user_agent("Cosmos-API-Request")
            .build()?,
        upstream_url: config.proxy_upstream_url.trim_end_matches('/').to_owned(),
        token: config.cosmos_token.clone(),
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.proxy_bind_addr).await?;
    tracing::info!(addr = %config.proxy_bind_addr, "catalog proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl-c");
    tracing::info!("received shutdown signal, stopping proxy");
}
