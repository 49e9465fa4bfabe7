//! Market Eaze Core - marketplace domain library.
//!
//! This crate holds everything the storefront does to its data:
//! - [`catalog`] - The product catalog store (create/update, delete, search, stock)
//! - [`cart`] - Cart lines, totals and checkout receipts
//! - [`session`] - Per-visitor login state and cart
//! - [`market`] - Command handlers the web layer calls for each user action
//!
//! # Architecture
//!
//! The core crate does no I/O: no HTTP, no storage, no clock. The catalog
//! and session are plain values passed into each command, so every rule can
//! be exercised directly in unit tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and roles
//! - [`error`] - Validation, catalog and command errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod error;
pub mod market;
pub mod session;
pub mod types;

pub use cart::{Cart, CartItem, Receipt};
pub use catalog::{Catalog, NewProduct, Product, SaveOutcome};
pub use error::{CartError, CatalogError, MarketError, ValidationError};
pub use session::{CurrentUser, Session};
pub use types::*;
