//! Checkout commands.

use tracing::info;

use mk_store_storefront::checkout::{
    CheckoutForm, CheckoutQuote, LogNotifier, OrderLog, place_order,
};

use super::Context;

/// Print the order summary for delivery to `city`.
///
/// # Errors
///
/// Returns an error if the configured shipping file cannot be read.
pub fn quote(ctx: &Context, city: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cart = ctx.open_cart();
    if cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    let table = ctx.shipping()?;
    let quote = CheckoutQuote::compute(cart.items(), &table, city);
    if !quote.zone_matched {
        let cities: Vec<&str> = table.cities().collect();
        info!(city, available = ?cities, "No shipping zone for city");
    }

    info!("Subtotal:  {}", ctx.money(quote.subtotal));
    info!("Shipping:  {}", ctx.money(quote.shipping_cost));
    info!("Total:     {}", ctx.money(quote.grand_total));
    info!("Delivery:  {}", quote.estimated_delivery());
    Ok(())
}

/// Place an order for the saved cart and empty it.
///
/// # Errors
///
/// Returns an error if the cart is empty, the form is incomplete, the city
/// has no shipping zone, or the order file cannot be written.
pub fn place(ctx: &Context, form: &CheckoutForm) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = ctx.open_cart();
    let table = ctx.shipping()?;
    let mut orders = OrderLog::new(ctx.orders_path());

    let placed = place_order(&mut cart, &table, form, None, &mut orders, &LogNotifier)?;

    info!(
        order_id = %placed.id,
        path = %orders.path().display(),
        "Order saved"
    );
    info!("Status:    {}", placed.draft.status.label_ar());
    info!("Payment:   {}", placed.draft.customer.payment_method.label_ar());
    info!("Total:     {}", ctx.money(placed.draft.total));
    info!("Delivery:  {}", placed.draft.estimated_delivery);
    Ok(())
}
