//! Shopping cart.
//!
//! A cart is an ordered list of line items keyed by product id. Name, price
//! and image are snapshots taken when the product was first added; they do
//! not follow later catalog changes.
//!
//! The cart lives entirely on the client. Nothing server-side learns about
//! it until checkout submits an order (see [`crate::checkout`]).

mod storage;
mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mk_store_core::ProductId;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError, decode_items};
pub use store::CartStore;

/// What a product surface hands to [`CartStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

impl ProductSnapshot {
    /// Build a snapshot. An empty image falls back to the placeholder asset.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        let image = image.into();
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: if image.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                image
            },
        }
    }
}

/// Image used when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// One product in the cart.
///
/// Serialized with exactly the field names `id`, `name`, `price`, `image`,
/// `quantity`; `price` is a JSON number written with every decimal digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub image: String,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    fn from_snapshot(product: ProductSnapshot) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// `price * quantity`, saturating at the `Decimal` range.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Sum of quantities.
#[must_use]
pub fn total_items(items: &[CartLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of `price * quantity`, saturating at the `Decimal` range.
#[must_use]
pub fn total_price(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(CartLineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Cart contents plus aggregates, as published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl CartSnapshot {
    pub(crate) fn of(items: &[CartLineItem]) -> Self {
        Self {
            items: items.to_vec(),
            total_items: total_items(items),
            total_price: total_price(items),
        }
    }
}
