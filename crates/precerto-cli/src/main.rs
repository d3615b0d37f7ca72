//! Command-line surface for the resolution pipeline.
//!
//! Wires the whole thing end to end: credential discovery, provider
//! selection, catalog client, resolver. Exit codes let scripts distinguish
//! "not in catalog" (manual entry) from "catalog unreachable" (retry).

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use precerto_core::diag::DEFAULT_CAPACITY;
use precerto_core::{DiagnosticsBuffer, DiagnosticsLayer};
use precerto_cosmos::CosmosClient;
use precerto_resolver::{ResolveError, Resolver};
use precerto_vision::{select_extractor, ProviderCredentials};

#[derive(Debug, Parser)]
#[command(name = "precerto")]
#[command(about = "Resolve barcodes and product labels into catalog records")]
struct Cli {
    /// Capture pipeline diagnostics in memory and dump them at the end.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a scanned barcode against the catalog.
    Lookup { gtin: String },
    /// Resolve a product-label photo through the active vision provider.
    Scan { image: PathBuf },
    /// Show which extraction backends are configured and which is active.
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = precerto_core::load_config_from_env()?;

    let buffer = DiagnosticsBuffer::new(DEFAULT_CAPACITY);
    init_tracing(&config.log_level, cli.debug.then(|| Arc::clone(&buffer)))?;

    let credentials = ProviderCredentials::from_env();
    let extractor = select_extractor(&credentials);
    let cosmos = CosmosClient::new(
        &config.cosmos_base_url,
        config.cosmos_token.clone(),
        Arc::clone(&extractor),
    )?;
    let resolver = Resolver::new(cosmos, extractor);

    let exit = match cli.command {
        Commands::Lookup { gtin } => lookup(&resolver, &gtin).await?,
        Commands::Scan { image } => scan(&resolver, &image).await?,
        Commands::Providers => {
            providers(&credentials, resolver.extractor().name());
            ExitCode::SUCCESS
        }
    };

    if cli.debug {
        dump_diagnostics(&buffer);
    }
    Ok(exit)
}

async fn lookup(resolver: &Resolver, gtin: &str) -> anyhow::Result<ExitCode> {
    match resolver.resolve_by_barcode(gtin).await {
        Ok(Some(record)) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            eprintln!("gtin {gtin} is not in the catalog — enter the product manually");
            Ok(ExitCode::from(2))
        }
        Err(ResolveError::Transport(reason)) => {
            eprintln!("catalog unreachable ({reason}) — try again in a moment");
            Ok(ExitCode::from(3))
        }
        Err(e) => Err(e.into()),
    }
}

async fn scan(resolver: &Resolver, image: &Path) -> anyhow::Result<ExitCode> {
    let bytes = tokio::fs::read(image).await?;
    let encoded = BASE64_STANDARD.encode(&bytes);

    let record = resolver.resolve_by_image(&encoded).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    eprintln!("no barcode on a label scan — assign a gtin before adding to the cart");
    Ok(ExitCode::SUCCESS)
}

fn providers(credentials: &ProviderCredentials, active: &str) {
    let configured = |token: &Option<String>| {
        if token.is_some() {
            "configured"
        } else {
            "not configured"
        }
    };
    println!("openrouter  {}", configured(&credentials.openrouter));
    println!("gemini      {}", configured(&credentials.google));
    println!("groq        {}", configured(&credentials.groq));
    println!("active      {active}");
}

fn init_tracing(
    log_level: &str,
    buffer: Option<Arc<DiagnosticsBuffer>>,
) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);
    match buffer {
        Some(buffer) => registry.with(DiagnosticsLayer::new(buffer)).init(),
        None => registry.init(),
    }
    Ok(())
}

fn dump_diagnostics(buffer: &DiagnosticsBuffer) {
    let entries = buffer.snapshot();
    if entries.is_empty() {
        return;
    }
    eprintln!("--- diagnostics ({} entries, newest first) ---", entries.len());
    for entry in entries {
        eprintln!("{:>5} {} {}", entry.level, entry.target, entry.message);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_takes_a_gtin() {
        let cli = Cli::try_parse_from(["precerto", "lookup", "7891910000197"])
            .expect("lookup should parse");
        assert!(matches!(cli.command, Commands::Lookup { gtin } if gtin == "7891910000197"));
        assert!(!cli.debug);
    }

    #[test]
    fn scan_takes_an_image_path() {
        let cli = Cli::try_parse_from(["precerto", "scan", "rotulo.jpg"])
            .expect("scan should parse");
        assert!(matches!(cli.command, Commands::Scan { image } if image == PathBuf::from("rotulo.jpg")));
    }

    #[test]
    fn debug_flag_is_global() {
        let cli = Cli::try_parse_from(["precerto", "providers", "--debug"])
            .expect("global flag should parse after the subcommand");
        assert!(cli.debug);
    }
}
