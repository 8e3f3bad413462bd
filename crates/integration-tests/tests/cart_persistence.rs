//! Integration tests for the file-backed cart.
//!
//! Each test opens the cart, mutates it, then opens it again from the same
//! file the way a page reload would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use serde_json::Value;

use mk_store_core::ProductId;
use mk_store_integration_tests::TestContext;
use mk_store_storefront::ProductSnapshot;

fn widget() -> ProductSnapshot {
    ProductSnapshot::new("p1", "Widget", Decimal::from(10), "x.png")
}

fn gadget() -> ProductSnapshot {
    ProductSnapshot::new("p2", "Gadget", Decimal::new(450, 2), "")
}

fn read_file(ctx: &TestContext) -> serde_json::Map<String, Value> {
    let raw = std::fs::read_to_string(ctx.config.local_storage_path()).unwrap();
    match serde_json::from_str(&raw).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ============================================================================
// Reload
// ============================================================================

#[test]
fn test_cart_survives_reload() {
    let ctx = TestContext::new();

    let mut cart = ctx.open_cart();
    cart.add(widget());
    cart.add(widget());
    cart.add(gadget());
    let before = cart.snapshot();
    drop(cart);

    let reloaded = ctx.open_cart();
    assert_eq!(reloaded.snapshot(), before);
    assert_eq!(reloaded.total_items(), 3);
    assert_eq!(reloaded.total_price(), Decimal::new(2450, 2));
    assert_eq!(reloaded.items()[1].image, "/placeholder.svg");
}

#[test]
fn test_reload_keeps_exact_prices() {
    let ctx = TestContext::new();

    let mut cart = ctx.open_cart();
    cart.add(ProductSnapshot::new(
        "fine",
        "Saffron",
        Decimal::new(1_234_567_890_123_456_789, 19),
        "s.png",
    ));
    cart.add(ProductSnapshot::new(
        "wide",
        "Land",
        Decimal::new(12_345_678_901_234_567, 3),
        "l.png",
    ));
    cart.add(ProductSnapshot::new("max", "Everything", Decimal::MAX, "e.png"));
    let before = cart.items().to_vec();
    drop(cart);

    let raw = read_file(&ctx)["cart"].as_str().unwrap().to_string();
    assert!(raw.contains(r#""price":0.1234567890123456789"#));
    assert!(raw.contains(r#""price":12345678901234.567"#));

    let reloaded = ctx.open_cart();
    assert_eq!(reloaded.items(), before.as_slice());
    assert_eq!(reloaded.total_price(), Decimal::MAX);
}

#[test]
fn test_missing_file_opens_empty() {
    let ctx = TestContext::new();
    let cart = ctx.open_cart();

    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Decimal::ZERO);
    assert!(!ctx.config.local_storage_path().exists());
}

#[test]
fn test_cleared_cart_reloads_empty() {
    let ctx = TestContext::new();

    let mut cart = ctx.open_cart();
    cart.add(widget());
    cart.clear();
    drop(cart);

    assert!(ctx.open_cart().is_empty());
    assert_eq!(read_file(&ctx)["cart"], "[]");
}

// ============================================================================
// Stored format
// ============================================================================

#[test]
fn test_cart_stored_as_json_string_under_key() {
    let ctx = TestContext::new();

    let mut cart = ctx.open_cart();
    cart.add(widget());
    cart.update_quantity(&ProductId::new("p1"), 4);

    let entries = read_file(&ctx);
    let raw = entries["cart"].as_str().unwrap();
    let items: Value = serde_json::from_str(raw).unwrap();

    assert_eq!(items[0]["id"], "p1");
    assert_eq!(items[0]["name"], "Widget");
    assert!(items[0]["price"].is_number());
    assert_eq!(items[0]["image"], "x.png");
    assert_eq!(items[0]["quantity"], 4);
}

#[test]
fn test_other_keys_preserved() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.config.local_storage_path(),
        r#"{"theme":"dark","lang":"ar"}"#,
    )
    .unwrap();

    let mut cart = ctx.open_cart();
    cart.add(widget());

    let entries = read_file(&ctx);
    assert_eq!(entries["theme"], "dark");
    assert_eq!(entries["lang"], "ar");
    assert!(entries.contains_key("cart"));
}

#[test]
fn test_unknown_id_does_not_touch_file() {
    let ctx = TestContext::new();

    let mut cart = ctx.open_cart();
    cart.add(widget());
    let before = std::fs::read(ctx.config.local_storage_path()).unwrap();

    cart.update_quantity(&ProductId::new("missing"), 3);
    cart.remove_item(&ProductId::new("missing"));

    let after = std::fs::read(ctx.config.local_storage_path()).unwrap();
    assert_eq!(before, after);
}

// ============================================================================
// Lenient loading
// ============================================================================

#[test]
fn test_corrupt_cart_value_opens_empty() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.config.local_storage_path(),
        r#"{"cart":"{not json"}"#,
    )
    .unwrap();

    let mut cart = ctx.open_cart();
    assert!(cart.is_empty());

    // The next mutation replaces the bad value.
    cart.add(widget());
    drop(cart);
    assert_eq!(ctx.open_cart().total_items(), 1);
}

#[test]
fn test_invalid_entries_dropped_on_load() {
    let ctx = TestContext::new();
    let stored = serde_json::json!([
        {"id": "p1", "name": "Widget", "price": 10, "image": "x.png", "quantity": 2},
        {"id": "p2", "name": "Broken", "price": "10", "image": "y.png", "quantity": 1},
        {"id": "p3", "name": "Zero", "price": 5, "image": "z.png", "quantity": 0},
        {"id": "p4", "name": "NoImage", "price": 5, "quantity": 1},
    ]);
    let file = serde_json::json!({ "cart": stored.to_string() });
    std::fs::write(ctx.config.local_storage_path(), file.to_string()).unwrap();

    let cart = ctx.open_cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].id.as_str(), "p1");
    assert_eq!(cart.total_price(), Decimal::from(20));
}

// ============================================================================
// Notification
// ============================================================================

#[tokio::test]
async fn test_subscriber_sees_changes() {
    let ctx = TestContext::new();
    let mut cart = ctx.open_cart();
    let mut changes = cart.subscribe();
    let mut count = cart.subscribe_count();

    cart.add(widget());
    changes.changed().await.unwrap();
    count.changed().await.unwrap();
    assert_eq!(changes.borrow_and_update().total_items, 1);
    assert_eq!(*count.borrow_and_update(), 1);

    cart.update_quantity(&ProductId::new("p1"), 0);
    changes.changed().await.unwrap();
    assert!(changes.borrow_and_update().items.is_empty());
    assert_eq!(*count.borrow(), 0);
}
