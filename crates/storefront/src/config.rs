//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MK_STORE_DATA_DIR` - Directory holding the local storage file (default: `.mk-store`)
//! - `MK_STORE_CART_KEY` - Local storage key the cart is saved under (default: `cart`)
//! - `MK_STORE_SHIPPING_FILE` - JSON file listing shipping zones
//! - `MK_STORE_CURRENCY` - ISO 4217 code used for display (default: `EGP`)

use std::path::PathBuf;

use thiserror::Error;

use mk_store_core::CurrencyCode;

/// File name of the local storage emulation inside the data directory.
const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory for local state
    pub data_dir: PathBuf,
    /// Key the cart is stored under
    pub cart_key: String,
    /// Shipping zones file, if any
    pub shipping_file: Option<PathBuf>,
    /// Currency for displayed prices
    pub currency: CurrencyCode,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".mk-store"),
            cart_key: "cart".to_string(),
            shipping_file: None,
            currency: CurrencyCode::EGP,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("MK_STORE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let cart_key = lookup("MK_STORE_CART_KEY").unwrap_or(defaults.cart_key);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "MK_STORE_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let shipping_file = lookup("MK_STORE_SHIPPING_FILE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let currency = match lookup("MK_STORE_CURRENCY") {
            Some(value) => value.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("MK_STORE_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.currency,
        };

        Ok(Self {
            data_dir,
            cart_key,
            shipping_file,
            currency,
        })
    }

    /// Path of the local storage file.
    #[must_use]
    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STORAGE_FILE)
    }
}
