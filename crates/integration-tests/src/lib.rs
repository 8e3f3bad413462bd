//! Integration tests for MK Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mk-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - File-backed cart surviving reloads
//! - `checkout_flow` - From an empty cart to a logged order
//!
//! Every test runs in its own temporary data directory; nothing touches
//! the real `.mk-store` directory.

use std::path::PathBuf;

use rust_decimal::Decimal;
use tempfile::TempDir;

use mk_store_core::{PaymentMethod, ShippingZoneId};
use mk_store_storefront::StorefrontConfig;
use mk_store_storefront::cart::{CartStore, FileStorage};
use mk_store_storefront::checkout::{CheckoutForm, ShippingTable, ShippingZone};

/// A throwaway data directory plus the configuration pointing at it.
pub struct TestContext {
    pub config: StorefrontConfig,
    _dir: TempDir,
}

impl TestContext {
    /// Create a fresh data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        Self { config, _dir: dir }
    }

    /// Open the cart the way a fresh page load would.
    #[must_use]
    pub fn open_cart(&self) -> CartStore<FileStorage> {
        CartStore::open(self.storage())
    }

    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(
            self.config.local_storage_path(),
            self.config.cart_key.clone(),
        )
    }

    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.config.data_dir.join("orders.jsonl")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Two active zones and one disabled one.
#[must_use]
pub fn shipping_table() -> ShippingTable {
    ShippingTable::new(vec![
        ShippingZone {
            id: ShippingZoneId::new("cairo"),
            city: "القاهرة".to_string(),
            cost: Decimal::from(50),
            estimated_days: 2,
            is_active: true,
        },
        ShippingZone {
            id: ShippingZoneId::new("alex"),
            city: "الإسكندرية".to_string(),
            cost: Decimal::new(655, 1),
            estimated_days: 3,
            is_active: true,
        },
        ShippingZone {
            id: ShippingZoneId::new("aswan"),
            city: "أسوان".to_string(),
            cost: Decimal::from(120),
            estimated_days: 7,
            is_active: false,
        },
    ])
}

/// A complete checkout form for `city`.
#[must_use]
pub fn checkout_form(city: &str) -> CheckoutForm {
    CheckoutForm {
        name: "سارة أحمد".to_string(),
        email: "sara@example.com".to_string(),
        phone: "01000000000".to_string(),
        address: "12 شارع التحرير".to_string(),
        city: city.to_string(),
        notes: "الدور الثالث".to_string(),
        payment_method: PaymentMethod::CashOnDelivery,
    }
}
