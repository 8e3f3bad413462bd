//! Cart commands.
//!
//! Cart operations never fail: unknown ids are ignored and write errors are
//! logged by the store. Each command ends by printing the cart so the
//! effect is visible.

use rust_decimal::Decimal;
use tracing::info;

use mk_store_core::ProductId;
use mk_store_storefront::ProductSnapshot;
use mk_store_storefront::cart::{CartStorage, CartStore};

use super::Context;

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if `price` is negative; such a line would be dropped
/// the next time the cart is loaded.
pub fn add(
    ctx: &Context,
    id: &str,
    name: &str,
    price: Decimal,
    image: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if price < Decimal::ZERO {
        return Err(format!("Price must not be negative: {price}").into());
    }

    let mut cart = ctx.open_cart();
    cart.add(ProductSnapshot::new(id, name, price, image));
    print_cart(ctx, &cart);
    Ok(())
}

pub fn update(ctx: &Context, id: &str, quantity: i64) {
    let mut cart = ctx.open_cart();
    cart.update_quantity(&ProductId::new(id), quantity);
    print_cart(ctx, &cart);
}

pub fn remove(ctx: &Context, id: &str) {
    let mut cart = ctx.open_cart();
    cart.remove_item(&ProductId::new(id));
    print_cart(ctx, &cart);
}

pub fn clear(ctx: &Context) {
    let mut cart = ctx.open_cart();
    cart.clear();
    info!("Cart cleared");
}

pub fn show(ctx: &Context) {
    print_cart(ctx, &ctx.open_cart());
}

fn print_cart<S: CartStorage>(ctx: &Context, cart: &CartStore<S>) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in cart.items() {
        info!(
            "  {} x{}  {}  ({} each)  [{}]",
            item.name,
            item.quantity,
            ctx.money(item.line_total()),
            ctx.money(item.price),
            item.id
        );
    }
    info!(
        "{} items, total {}",
        cart.total_items(),
        ctx.money(cart.total_price())
    );
}
