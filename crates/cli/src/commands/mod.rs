//! Command implementations.
//!
//! Every command works against the file-backed cart under the configured
//! data directory, so consecutive invocations see the same cart.

pub mod cart;
pub mod checkout;
pub mod shipping;

use std::path::PathBuf;

use rust_decimal::Decimal;

use mk_store_core::Price;
use mk_store_storefront::StorefrontConfig;
use mk_store_storefront::cart::{CartStore, FileStorage};
use mk_store_storefront::checkout::{CheckoutError, ShippingTable};
use mk_store_storefront::config::ConfigError;

/// Shared state for a single CLI invocation.
pub struct Context {
    config: StorefrontConfig,
}

impl Context {
    /// Load configuration from the environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = StorefrontConfig::from_env()?;
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            key = %config.cart_key,
            "Loaded configuration"
        );
        Ok(Self { config })
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> CartStore<FileStorage> {
        CartStore::open(FileStorage::new(
            self.config.local_storage_path(),
            self.config.cart_key.clone(),
        ))
    }

    /// Shipping zones from `MK_STORE_SHIPPING_FILE`, or none.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the configured file cannot be read or parsed.
    pub fn shipping(&self) -> Result<ShippingTable, CheckoutError> {
        self.config
            .shipping_file
            .as_deref()
            .map_or_else(|| Ok(ShippingTable::default()), ShippingTable::load)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.config.data_dir.join("orders.jsonl")
    }

    /// Format an amount in the configured currency.
    pub fn money(&self, amount: Decimal) -> String {
        Price::new(amount, self.config.currency).display()
    }
}
