//! Emporium Core - catalog, cart and order types.
//!
//! This crate holds the domain model of the storefront:
//! - [`catalog`] - products as served by the remote catalog API
//! - [`cart`] - the page-session shopping cart (line items, totals)
//! - [`order`] - checkout form validation and the order snapshot
//! - [`types`] - newtypes for product ids, prices and email addresses
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no templates. The storefront binary owns all side effects.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{Product, Rating};
pub use order::{CheckoutError, CheckoutForm, Order};
pub use types::*;
