//! Order drafts and the backend boundary.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use mk_store_core::{Email, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use crate::cart::CartLineItem;

use super::CheckoutError;
use super::quote::CheckoutQuote;

/// Checkout form fields exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub notes: String,
    pub payment_method: PaymentMethod,
}

/// Validated customer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(value.to_string())
}

impl CheckoutForm {
    /// Trim every field and check the required ones.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` for the first empty required
    /// field, or `CheckoutError::InvalidEmail` for a malformed address.
    pub fn validate(&self) -> Result<CustomerDetails, CheckoutError> {
        let name = required(&self.name, "name")?;
        let email = Email::parse(&required(&self.email, "email")?)?;
        let phone = required(&self.phone, "phone")?;
        let address = required(&self.address, "address")?;
        let city = required(&self.city, "city")?;
        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(CustomerDetails {
            name,
            email,
            phone,
            address,
            city,
            notes,
            payment_method: self.payment_method,
        })
    }
}

/// One row of `order_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub product_price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            product_name: item.name.clone(),
            product_price: item.price,
            quantity: item.quantity,
            total: item.line_total(),
        }
    }
}

/// Everything submitted to the backend for a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub customer: CustomerDetails,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
    pub estimated_delivery: String,
    pub items: Vec<OrderLine>,
}

impl OrderDraft {
    /// Build a pending order from the cart contents and a quote.
    #[must_use]
    pub fn new(
        items: &[CartLineItem],
        customer: CustomerDetails,
        quote: &CheckoutQuote,
        user_id: Option<UserId>,
    ) -> Self {
        Self {
            user_id,
            status: OrderStatus::Pending,
            customer,
            subtotal: quote.subtotal,
            shipping_cost: quote.shipping_cost,
            total: quote.grand_total,
            estimated_delivery: quote.estimated_delivery(),
            items: items.iter().map(OrderLine::from).collect(),
        }
    }
}

/// Where orders are created.
pub trait OrderGateway {
    /// Persist `draft` and return the new order's id.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Gateway` if the order could not be created.
    fn submit(&mut self, draft: &OrderDraft) -> Result<OrderId, CheckoutError>;
}

/// Who hears about a placed order (the confirmation email function).
pub trait OrderNotifier {
    /// Announce a created order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Notification` if delivery failed. Callers
    /// log this and carry on; the order already exists.
    fn order_placed(&self, order_id: &OrderId, draft: &OrderDraft) -> Result<(), CheckoutError>;
}

// =============================================================================
// Gateways
// =============================================================================

/// Keeps submitted orders in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: Vec<(OrderId, OrderDraft)>,
    reject_with: Option<String>,
}

impl InMemoryOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every submission with `reason`, like a backend outage.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            orders: Vec::new(),
            reject_with: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[(OrderId, OrderDraft)] {
        &self.orders
    }
}

impl OrderGateway for InMemoryOrders {
    fn submit(&mut self, draft: &OrderDraft) -> Result<OrderId, CheckoutError> {
        if let Some(reason) = &self.reject_with {
            return Err(CheckoutError::Gateway(reason.clone()));
        }
        let id = OrderId::new(uuid::Uuid::new_v4().to_string());
        self.orders.push((id.clone(), draft.clone()));
        Ok(id)
    }
}

#[derive(Serialize)]
struct LoggedOrder<'a> {
    id: &'a OrderId,
    #[serde(flatten)]
    draft: &'a OrderDraft,
}

/// Appends each order as one JSON line to a file.
#[derive(Debug, Clone)]
pub struct OrderLog {
    path: PathBuf,
}

impl OrderLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderGateway for OrderLog {
    fn submit(&mut self, draft: &OrderDraft) -> Result<OrderId, CheckoutError> {
        let id = OrderId::new(uuid::Uuid::new_v4().to_string());
        let mut line = serde_json::to_vec(&LoggedOrder { id: &id, draft })?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?
            .write_all(&line)?;

        Ok(id)
    }
}

/// Notifier that only records the confirmation in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl OrderNotifier for LogNotifier {
    fn order_placed(&self, order_id: &OrderId, draft: &OrderDraft) -> Result<(), CheckoutError> {
        info!(
            order_id = %order_id,
            customer_email = %draft.customer.email,
            total = %draft.total,
            payment_method = %draft.customer.payment_method,
            "Order confirmation queued"
        );
        Ok(())
    }
}
