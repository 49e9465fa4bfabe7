//! Core types for Market Eaze.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod role;

pub use id::*;
pub use price::{Price, PriceError, format_money, round_cents};
pub use role::Role;
