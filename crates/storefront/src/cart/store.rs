//! The cart store.

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, warn};

use mk_store_core::ProductId;

use super::storage::CartStorage;
use super::{CartLineItem, CartSnapshot, ProductSnapshot, total_items, total_price};

/// Authoritative cart state for one browsing session.
///
/// Mutations are synchronous: by the time a method returns, reads see the
/// new state, storage has been written (best effort) and subscribers have
/// been sent a fresh [`CartSnapshot`]. No method returns an error. An
/// unknown id is a no-op, and a failed write is logged and otherwise
/// ignored so the in-memory cart keeps working for the rest of the session.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
    changes: watch::Sender<CartSnapshot>,
    count: watch::Sender<u64>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, hydrating from `storage`.
    ///
    /// Unreadable storage is treated as an empty cart.
    pub fn open(storage: S) -> Self {
        let items = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load saved cart, starting empty");
            Vec::new()
        });
        debug!(lines = items.len(), "Cart hydrated");

        let (changes, _) = watch::channel(CartSnapshot::of(&items));
        let (count, _) = watch::channel(total_items(&items));

        Self {
            items,
            storage,
            changes,
            count,
        }
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart keeps its original name, price and
    /// image; only its quantity grows. New products go to the end.
    pub fn add(&mut self, product: ProductSnapshot) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            debug!(product_id = %existing.id, quantity = existing.quantity, "Incremented cart line");
        } else {
            debug!(product_id = %product.id, "Added cart line");
            self.items.push(CartLineItem::from_snapshot(product));
        }
        self.commit();
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Zero or negative removes the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let Some(index) = self.position(id) else {
            debug!(product_id = %id, "Ignoring quantity update for product not in cart");
            return;
        };

        if quantity <= 0 {
            self.items.remove(index);
            debug!(product_id = %id, "Removed cart line via quantity update");
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            debug!(product_id = %id, quantity = item.quantity, "Updated cart line quantity");
        }
        self.commit();
    }

    /// Remove the line for `id`, keeping the order of the others.
    pub fn remove_item(&mut self, id: &ProductId) {
        let Some(index) = self.position(id) else {
            debug!(product_id = %id, "Ignoring removal of product not in cart");
            return;
        };
        self.items.remove(index);
        debug!(product_id = %id, "Removed cart line");
        self.commit();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("Cleared cart");
        self.commit();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        total_items(&self.items)
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        total_price(&self.items)
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.items)
    }

    /// Receive a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.changes.subscribe()
    }

    /// Receive the item count, only when it changes. Meant for badges.
    #[must_use]
    pub fn subscribe_count(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn commit(&self) {
        if let Err(e) = self.storage.save(&self.items) {
            warn!(error = %e, "Failed to persist cart, continuing in memory");
        }

        self.changes.send_replace(CartSnapshot::of(&self.items));

        let count = total_items(&self.items);
        self.count.send_if_modified(|current| {
            if *current == count {
                false
            } else {
                *current = count;
                true
            }
        });
    }
}
