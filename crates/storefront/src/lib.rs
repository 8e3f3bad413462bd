//! MK Store Storefront library.
//!
//! Client-side state for the storefront: the shopping cart, how it survives
//! a reload, and the checkout flow that turns it into an order.
//!
//! # Architecture
//!
//! - [`cart`] - The cart store. Owned explicitly and passed by reference to
//!   whatever needs it; persistence is injected through [`cart::CartStorage`]
//!   and changes are published over `tokio::sync::watch` channels.
//! - [`checkout`] - Shipping zones, order quotes and order placement. Talks
//!   to the hosted backend only through the [`checkout::OrderGateway`] and
//!   [`checkout::OrderNotifier`] traits.
//! - [`config`] - Environment-driven configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;

pub use cart::{CartLineItem, CartSnapshot, CartStore, ProductSnapshot};
pub use config::StorefrontConfig;
