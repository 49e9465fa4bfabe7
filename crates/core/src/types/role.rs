//! Marketplace roles.

use serde::{Deserialize, Serialize};

/// The role a visitor picks on the login screen.
///
/// The role is fixed for the lifetime of a session; switching requires a
/// logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Browses the catalog and buys through a cart.
    #[default]
    Buyer,
    /// Lists, updates and removes its own products.
    Vendor,
}

impl Role {
    /// All roles, in the order the login screen offers them.
    pub const ALL: [Self; 2] = [Self::Buyer, Self::Vendor];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Vendor => "Vendor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "vendor" => Ok(Self::Vendor),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
