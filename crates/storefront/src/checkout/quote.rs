//! Order totals shown before the customer confirms.

use rust_decimal::Decimal;

use crate::cart::{CartLineItem, total_price};

use super::shipping::{DEFAULT_ESTIMATED_DAYS, ShippingTable};

/// Subtotal, shipping and grand total for a cart shipped to one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutQuote {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub grand_total: Decimal,
    pub estimated_days: u32,
    /// Whether an active zone matched the city.
    pub zone_matched: bool,
}

impl CheckoutQuote {
    /// Price `items` for delivery to `city`.
    ///
    /// A city without an active zone ships for free with the default
    /// estimate; checkout refuses to submit such an order, but the summary
    /// can still be shown while the customer is picking a city.
    #[must_use]
    pub fn compute(items: &[CartLineItem], shipping: &ShippingTable, city: &str) -> Self {
        let subtotal = total_price(items);
        let zone = shipping.zone_for(city);

        let shipping_cost = zone.map_or(Decimal::ZERO, |z| z.cost);
        let estimated_days = zone
            .map(|z| z.estimated_days)
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_ESTIMATED_DAYS);

        Self {
            subtotal,
            shipping_cost,
            grand_total: subtotal.saturating_add(shipping_cost),
            estimated_days,
            zone_matched: zone.is_some(),
        }
    }

    /// Delivery estimate as shown to the customer, e.g. `"3 أيام عمل"`.
    #[must_use]
    pub fn estimated_delivery(&self) -> String {
        format!("{} أيام عمل", self.estimated_days)
    }
}
