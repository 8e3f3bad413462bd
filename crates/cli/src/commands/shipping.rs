//! Shipping zone listing.

use tracing::{info, warn};

use super::Context;

/// Print every active zone with its cost and delivery estimate.
///
/// # Errors
///
/// Returns an error if the configured shipping file cannot be read.
pub fn list(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let table = ctx.shipping()?;

    let mut count = 0_usize;
    for zone in table.active_zones() {
        count += 1;
        info!(
            "  {}  {}  {} days  [{}]",
            zone.city,
            ctx.money(zone.cost),
            zone.estimated_days,
            zone.id
        );
    }

    if count == 0 {
        warn!("No active shipping zones; set MK_STORE_SHIPPING_FILE");
    } else {
        info!(zones = count, "Active shipping zones");
    }
    Ok(())
}
