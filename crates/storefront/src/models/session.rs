//! Session-related types.
//!
//! Everything a visitor carries between requests lives in one
//! [`market_eaze_core::Session`] value stored under a single key.

/// Session keys.
pub mod keys {
    /// Key for the visitor's market session (login state and cart).
    pub const MARKET_SESSION: &str = "market_session";
}
