//! Configuration loading and root folder resolution
//!
//! Resolution priority for every key:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error; a malformed one is.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Default listen address for brandhub-web
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";
/// Default Gemini model used by the style checker
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default request body limit for uploads (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
/// Billing variant ids of the paid tiers
pub const DEFAULT_PRO_VARIANT_ID: &str = "441000";
pub const DEFAULT_AGENCY_VARIANT_ID: &str = "441001";

pub const ENV_ROOT_FOLDER: &str = "BRANDHUB_ROOT_FOLDER";
pub const ENV_BIND_ADDRESS: &str = "BRANDHUB_BIND_ADDRESS";
pub const ENV_PUBLIC_BASE_URL: &str = "BRANDHUB_PUBLIC_BASE_URL";
pub const ENV_GEMINI_API_KEY: &str = "BRANDHUB_GEMINI_API_KEY";
/// Fallback name kept for deployments that already export it
pub const ENV_GEMINI_API_KEY_FALLBACK: &str = "GEMINI_API_KEY";
pub const ENV_BILLING_STORE_ID: &str = "BRANDHUB_BILLING_STORE_ID";

/// Database file name inside the root folder
const DATABASE_FILE: &str = "brandhub.db";
/// Object storage directory inside the root folder
const STORAGE_DIR: &str = "storage";

/// Raw contents of the TOML config file; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub public_base_url: Option<String>,
    pub log_level: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub utc_offset_minutes: Option<i32>,
    pub gemini: GeminiToml,
    pub billing: BillingToml,
}

/// `[gemini]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiToml {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

/// `[billing]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BillingToml {
    pub store_id: Option<String>,
    pub pro_variant_id: Option<String>,
    pub agency_variant_id: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

/// Remote AI settings after resolution
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// None when no credential is configured; the style checker then reports
    /// a configuration error instead of calling out
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

/// Billing/checkout settings after resolution
#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub store_id: Option<String>,
    pub pro_variant_id: String,
    pub agency_variant_id: String,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct BrandHubConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub public_base_url: String,
    pub log_level: String,
    pub max_upload_bytes: usize,
    /// Default offset used for calendar day boundaries when the client does
    /// not send its own
    pub utc_offset_minutes: i32,
    pub gemini: GeminiConfig,
    pub billing: BillingConfig,
}

impl BrandHubConfig {
    /// Merge CLI overrides, environment and TOML into the final config
    pub fn resolve(overrides: &Overrides, toml: TomlConfig) -> Result<Self> {
        let root_folder = overrides
            .root_folder
            .clone()
            .or_else(|| env_non_empty(ENV_ROOT_FOLDER).map(PathBuf::from))
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);

        let bind_address = overrides
            .bind_address
            .clone()
            .or_else(|| env_non_empty(ENV_BIND_ADDRESS))
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let public_base_url = env_non_empty(ENV_PUBLIC_BASE_URL)
            .or(toml.public_base_url)
            .unwrap_or_else(|| format!("http://{}", bind_address));

        let log_level = overrides
            .log_level
            .clone()
            .or(toml.log_level)
            .unwrap_or_else(|| "info".to_string());

        let utc_offset_minutes = toml.utc_offset_minutes.unwrap_or(0);
        crate::time::offset_from_minutes(utc_offset_minutes)
            .map_err(|e| Error::Config(format!("utc_offset_minutes: {}", e)))?;

        let max_upload_bytes = toml.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than zero".to_string()));
        }

        let api_key = resolve_gemini_api_key(toml.gemini.api_key);

        Ok(Self {
            root_folder,
            bind_address,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            log_level,
            max_upload_bytes,
            utc_offset_minutes,
            gemini: GeminiConfig {
                api_key,
                model: toml
                    .gemini
                    .model
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                endpoint: toml
                    .gemini
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            },
            billing: BillingConfig {
                store_id: env_non_empty(ENV_BILLING_STORE_ID).or(toml.billing.store_id),
                pro_variant_id: toml
                    .billing
                    .pro_variant_id
                    .unwrap_or_else(|| DEFAULT_PRO_VARIANT_ID.to_string()),
                agency_variant_id: toml
                    .billing
                    .agency_variant_id
                    .unwrap_or_else(|| DEFAULT_AGENCY_VARIANT_ID.to_string()),
            },
        })
    }

    /// Path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Root directory of the filesystem object store
    pub fn storage_root(&self) -> PathBuf {
        self.root_folder.join(STORAGE_DIR)
    }

    /// Create the root folder if missing
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

/// Resolve the Gemini API key: ENV (two names) → TOML
///
/// Whitespace-only values count as absent.
fn resolve_gemini_api_key(toml_key: Option<String>) -> Option<String> {
    let mut sources = Vec::new();

    let env_key = env_non_empty(ENV_GEMINI_API_KEY)
        .or_else(|| env_non_empty(ENV_GEMINI_API_KEY_FALLBACK));
    if env_key.is_some() {
        sources.push("environment");
    }

    let toml_key = toml_key.filter(|k| !k.trim().is_empty());
    if toml_key.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    env_key.or(toml_key)
}

/// Default location of the TOML config file for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("brandhub").join("config.toml"))
}

/// Load the TOML config file
///
/// A missing file yields defaults; unreadable or malformed files are errors.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        info!("Config file not found at {} (using defaults)", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(config)
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("brandhub"))
        .unwrap_or_else(|| PathBuf::from("./brandhub_data"))
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
