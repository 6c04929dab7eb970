//! Runtime configuration
//!
//! Values are read from the process environment after loading `.env` once.
//! Nothing here fails at startup: a missing upstream key only disables the
//! catalog fetches, which then report "not found" to the caller.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;

// =============================================================================
// Defaults
// =============================================================================

/// Upstream shopping-search endpoint
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";
/// Storage key holding the serialized cart record
pub const DEFAULT_CART_STORAGE_KEY: &str = "walmart-cart";
/// Address the HTTP server listens on
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

static INIT: Once = Once::new();

/// Loads `.env` exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Optional env var (None if unset or blank).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Parsed env var with default fallback.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// Config
// =============================================================================

/// Settings for the upstream catalog API
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Credential for the search provider; `None` disables fetching
    pub api_key: Option<String>,

    /// Search endpoint (overridable for tests and proxies)
    pub base_url: String,

    /// Country parameter passed upstream
    pub gl: String,

    /// Language parameter passed upstream
    pub hl: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            gl: "us".to_string(),
            hl: "en".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Settings for cart persistence
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Fixed key the whole cart record is stored under
    pub storage_key: String,

    /// Directory for the file-backed store; in-memory when `None`
    pub store_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_STORAGE_KEY.to_string(),
            store_dir: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub cart: CartConfig,
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            cart: CartConfig::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

impl Config {
    /// Builds the configuration from the environment
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let catalog = CatalogConfig {
            api_key: env_opt("SERPAPI_API_KEY"),
            base_url: env_opt("SERPAPI_BASE_URL").unwrap_or(defaults.catalog.base_url),
            gl: env_opt("SEARCH_GL").unwrap_or(defaults.catalog.gl),
            hl: env_opt("SEARCH_HL").unwrap_or(defaults.catalog.hl),
            timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS", defaults.catalog.timeout_secs),
        };

        let cart = CartConfig {
            storage_key: env_opt("CART_STORAGE_KEY").unwrap_or(defaults.cart.storage_key),
            store_dir: env_opt("CART_STORE_DIR").map(PathBuf::from),
        };

        Self {
            catalog,
            cart,
            bind_addr: env_parse("BIND_ADDR", defaults.bind_addr),
        }
    }
}
