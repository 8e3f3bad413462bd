//! Shipping zones.
//!
//! Staff maintain one zone per city with a flat cost and a delivery
//! estimate. Only active zones are offered at checkout.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mk_store_core::ShippingZoneId;

use super::CheckoutError;

/// Delivery estimate used when no zone matches, or a zone has none.
pub const DEFAULT_ESTIMATED_DAYS: u32 = 5;

const fn default_active() -> bool {
    true
}

/// Flat-rate shipping to one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub city: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub cost: Decimal,
    pub estimated_days: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// The set of shipping zones checkout chooses from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingTable {
    zones: Vec<ShippingZone>,
}

impl ShippingTable {
    #[must_use]
    pub const fn new(zones: Vec<ShippingZone>) -> Self {
        Self { zones }
    }

    /// Parse a JSON array of zones.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Parse` if the document is not a list of zones.
    pub fn from_json(raw: &str) -> Result<Self, CheckoutError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Read zones from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Io` if the file cannot be read, or
    /// `CheckoutError::Parse` if it is not a list of zones.
    pub fn load(path: &Path) -> Result<Self, CheckoutError> {
        let raw = std::fs::read_to_string(path)?;
        let table = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            zones = table.zones.len(),
            "Loaded shipping zones"
        );
        Ok(table)
    }

    /// Zones offered to customers, in configured order.
    pub fn active_zones(&self) -> impl Iterator<Item = &ShippingZone> {
        self.zones.iter().filter(|zone| zone.is_active)
    }

    /// Active city names for a picker.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.active_zones().map(|zone| zone.city.as_str())
    }

    /// The active zone for exactly `city`, if any.
    #[must_use]
    pub fn zone_for(&self, city: &str) -> Option<&ShippingZone> {
        self.active_zones().find(|zone| zone.city == city)
    }
}
