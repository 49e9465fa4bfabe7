//! Storefront models.
//!
//! The domain types live in `market-eaze-core`; this module only holds what
//! the web layer adds on top, such as session storage keys.

pub mod session;

pub use session::keys as session_keys;
