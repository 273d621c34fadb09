//! brandhub-web - BrandHub HTTP service
//!
//! Serves the brand, asset, launch and style-check API on top of a SQLite
//! database and a filesystem object store under the root folder.

use anyhow::{Context, Result};
use brandhub_common::config::{default_config_path, load_toml_config, BrandHubConfig, Overrides};
use brandhub_common::db::init_database;
use brandhub_web::api::BuildInfo;
use brandhub_web::services::style_check::GeminiAnalyzer;
use brandhub_web::storage::LocalObjectStore;
use brandhub_web::{build_router, AppState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments for brandhub-web
#[derive(Parser, Debug)]
#[command(name = "brandhub-web")]
#[command(about = "BrandHub brand management service")]
#[command(version)]
struct Args {
    /// Root folder holding the database and object storage
    #[arg(short, long, env = "BRANDHUB_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(short, long, env = "BRANDHUB_BIND_ADDRESS")]
    bind: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => Default::default(),
    };

    let overrides = Overrides {
        root_folder: args.root_folder,
        bind_address: args.bind,
        log_level: args.log_level,
    };
    let config = BrandHubConfig::resolve(&overrides, toml_config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!("Starting {} built {}", BuildInfo::banner(), env!("BUILD_TIMESTAMP"));

    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }
    info!("Root folder: {}", config.root_folder.display());
    config.ensure_root_folder()?;

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());
    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let store = LocalObjectStore::new(config.storage_root(), config.public_base_url.clone());
    store
        .ensure_buckets()
        .await
        .context("Failed to create storage buckets")?;
    info!("Object storage: {}", config.storage_root().display());

    if config.gemini.api_key.is_none() {
        warn!("No Gemini API key configured; style checks will fail until one is set");
    }
    let analyzer = GeminiAnalyzer::new(&config.gemini)?;

    let state = AppState::new(pool, Arc::new(store), Arc::new(analyzer), &config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("brandhub-web listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
