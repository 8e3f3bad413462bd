//! Checkout: turn the cart into an order.
//!
//! The cart store knows nothing about orders. Checkout reads the cart,
//! prices shipping, submits an [`OrderDraft`] through an [`OrderGateway`],
//! asks an [`OrderNotifier`] to send the confirmation, and finally clears
//! the cart.

mod order;
mod quote;
mod shipping;

use thiserror::Error;
use tracing::{info, instrument, warn};

use mk_store_core::{EmailError, OrderId, UserId};

use crate::cart::{CartStorage, CartStore};

pub use order::{
    CheckoutForm, CustomerDetails, InMemoryOrders, LogNotifier, OrderDraft, OrderGateway,
    OrderLine, OrderLog, OrderNotifier,
};
pub use quote::CheckoutQuote;
pub use shipping::{DEFAULT_ESTIMATED_DAYS, ShippingTable, ShippingZone};

/// Errors that stop an order from being placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required form field was left blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The email field is not an address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No active shipping zone for the chosen city.
    #[error("No shipping available to {0}")]
    UnknownCity(String),

    /// The backend refused or failed to create the order.
    #[error("Order submission failed: {0}")]
    Gateway(String),

    /// The confirmation could not be sent.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Reading or writing local files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A successfully submitted order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub draft: OrderDraft,
}

/// Place an order for everything in `store`.
///
/// On success the cart is cleared. If anything fails before the gateway
/// accepts the order, the cart is left untouched so the customer can retry.
/// A failed confirmation does not fail the order.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart`, a form validation error,
/// `CheckoutError::UnknownCity`, or whatever the gateway reports.
#[instrument(skip_all, fields(city = %form.city, lines = store.items().len()))]
pub fn place_order<S, G, N>(
    store: &mut CartStore<S>,
    shipping: &ShippingTable,
    form: &CheckoutForm,
    user_id: Option<UserId>,
    gateway: &mut G,
    notifier: &N,
) -> Result<PlacedOrder, CheckoutError>
where
    S: CartStorage,
    G: OrderGateway + ?Sized,
    N: OrderNotifier + ?Sized,
{
    if store.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer = form.validate()?;
    let quote = CheckoutQuote::compute(store.items(), shipping, &customer.city);
    if !quote.zone_matched {
        return Err(CheckoutError::UnknownCity(customer.city));
    }

    let draft = OrderDraft::new(store.items(), customer, &quote, user_id);
    let id = gateway.submit(&draft)?;
    info!(order_id = %id, total = %draft.total, "Order placed");

    if let Err(e) = notifier.order_placed(&id, &draft) {
        warn!(order_id = %id, error = %e, "Failed to send order confirmation");
    }

    store.clear();
    Ok(PlacedOrder { id, draft })
}
