//! Per-visitor session state.
//!
//! A [`Session`] is an ordinary value. The web layer loads it for each
//! request, passes it by `&mut` into a market command and stores it back.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::MarketError;
use crate::types::{Role, VendorId};

/// Username recorded for every buyer.
pub const BUYER_USERNAME: &str = "Buyer";

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub role: Role,
    pub username: String,
}

impl CurrentUser {
    /// The vendor id this user lists products under.
    ///
    /// Vendors are identified by their username.
    #[must_use]
    pub fn vendor_id(&self) -> VendorId {
        VendorId::new(self.username.as_str())
    }
}

/// Login state plus the buyer's cart.
///
/// The cart is read-only from outside this crate; it only changes through
/// the [`crate::market`] commands, which check the role first.
///
/// ```compile_fail
/// let mut session = market_eaze_core::Session::new();
/// session.cart_mut().clear();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<CurrentUser>,
    cart: Cart,
}

impl Session {
    /// A logged-out session with an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user: None,
            cart: Cart::new(),
        }
    }

    #[must_use]
    pub const fn logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Role of the logged-in user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// The logged-in user, provided they hold `required`.
    ///
    /// # Errors
    ///
    /// [`MarketError::NotLoggedIn`] when logged out and
    /// [`MarketError::WrongRole`] when logged in under the other role.
    pub fn require(&self, required: Role) -> Result<&CurrentUser, MarketError> {
        let user = self.user.as_ref().ok_or(MarketError::NotLoggedIn)?;
        if user.role != required {
            return Err(MarketError::WrongRole { required });
        }
        Ok(user)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub(crate) const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub(crate) fn sign_in(&mut self, user: CurrentUser) -> &CurrentUser {
        self.user.insert(user)
    }

    /// Forget the user and drop the cart.
    ///
    /// Units in the cart are not returned to stock.
    pub fn reset(&mut self) {
        self.user = None;
        self.cart.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_logged_out() {
        let session = Session::new();
        assert!(!session.logged_in());
        assert!(session.role().is_none());
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_reset_clears_user_and_cart() {
        let mut session = Session::new();
        session.sign_in(CurrentUser {
            role: Role::Vendor,
            username: "VendorA".to_string(),
        });
        assert_eq!(session.role(), Some(Role::Vendor));

        session.reset();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_require_checks_role() {
        let mut session = Session::new();
        assert_eq!(
            session.require(Role::Buyer).err(),
            Some(MarketError::NotLoggedIn)
        );

        session.sign_in(CurrentUser {
            role: Role::Buyer,
            username: BUYER_USERNAME.to_string(),
        });
        assert!(session.require(Role::Buyer).is_ok());
        assert_eq!(
            session.require(Role::Vendor).err(),
            Some(MarketError::WrongRole {
                required: Role::Vendor
            })
        );
    }

    #[test]
    fn test_vendor_id_is_username() {
        let user = CurrentUser {
            role: Role::Vendor,
            username: "VendorB".to_string(),
        };
        assert_eq!(user.vendor_id(), VendorId::new("VendorB"));
    }
}
