//! Domain errors.
//!
//! Every error here is recoverable: the failed operation leaves the catalog
//! and the session exactly as they were.

use thiserror::Error;

use crate::types::{PriceError, ProductId, Role};

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product name was empty or whitespace.
    #[error("Please provide a product name.")]
    EmptyName,

    /// Image URL was empty or whitespace.
    #[error("Please provide an image URL.")]
    EmptyImageUrl,

    /// A vendor tried to log in without a username.
    #[error("Vendor must provide a username.")]
    MissingVendorUsername,

    /// Price input was not a valid amount.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Quantity input was not a non-negative whole number.
    #[error("Quantity must be a whole number of at least 0, got {0:?}")]
    InvalidQuantity(String),

    /// Role input did not name a known role.
    #[error("Unknown role: {0:?}")]
    InvalidRole(String),
}

/// Catalog lookup and stock failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No product with this id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Not enough stock left to take the requested units.
    #[error("Not enough stock for {id}: {available} left, {requested} requested")]
    OutOfStock {
        /// Product that ran out.
        id: ProductId,
        /// Units currently in stock.
        available: u32,
        /// Units the caller tried to take.
        requested: u32,
    },
}

/// Cart arithmetic failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A line subtotal or the cart total does not fit in a `Decimal`.
    #[error("Cart total is too large to compute.")]
    TotalOverflow,
}

/// Error returned by a market command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart total could not be computed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The command needs a logged-in session.
    #[error("Please log in first.")]
    NotLoggedIn,

    /// The session belongs to the wrong role for this command.
    #[error("This action is only available to a {required}.")]
    WrongRole {
        /// Role the command requires.
        required: Role,
    },

    /// A second login was attempted without logging out.
    #[error("Already logged in; log out to switch roles.")]
    AlreadyLoggedIn,
}

/// Result type alias for market commands.
pub type Result<T> = std::result::Result<T, MarketError>;
