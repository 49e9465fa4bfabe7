//! Market commands.
//!
//! One function per user action. Each takes the catalog and/or the visitor's
//! session explicitly, runs to completion, and either applies its whole
//! effect or returns an error with nothing changed.

use tracing::{debug, info};

use crate::cart::{CartItem, Receipt};
use crate::catalog::{Catalog, NewProduct, Product, SaveOutcome};
use crate::error::{MarketError, Result, ValidationError};
use crate::session::{BUYER_USERNAME, CurrentUser, Session};
use crate::types::{Price, ProductId, Role};

/// Raw vendor form input, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub image_url: String,
}

impl ProductInput {
    /// Parse the form into a [`NewProduct`] owned by `user`.
    ///
    /// Name and image URL are checked first, then price and quantity.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn parse(&self, user: &CurrentUser) -> std::result::Result<NewProduct, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.image_url.trim().is_empty() {
            return Err(ValidationError::EmptyImageUrl);
        }
        let price = Price::parse(&self.price)?;
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidQuantity(self.quantity.clone()))?;

        Ok(NewProduct {
            name: self.name.clone(),
            price,
            quantity,
            vendor_id: user.vendor_id(),
            image_url: self.image_url.clone(),
        })
    }
}

/// Log in as `role`.
///
/// Vendors must give a username, which becomes their vendor id. Buyers are
/// all recorded as [`BUYER_USERNAME`].
///
/// # Errors
///
/// - [`MarketError::AlreadyLoggedIn`] if the session already has a user
/// - [`ValidationError::MissingVendorUsername`] for a vendor with a blank name
///
/// The session stays logged out on error.
pub fn login<'s>(session: &'s mut Session, role: Role, username: &str) -> Result<&'s CurrentUser> {
    if session.logged_in() {
        return Err(MarketError::AlreadyLoggedIn);
    }

    let username = match role {
        Role::Vendor => {
            let trimmed = username.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::MissingVendorUsername.into());
            }
            trimmed.to_owned()
        }
        Role::Buyer => BUYER_USERNAME.to_owned(),
    };

    info!(%role, %username, "login");
    Ok(session.sign_in(CurrentUser { role, username }))
}

/// Log out, discarding the cart.
///
/// Units in the cart stay taken out of stock.
pub fn logout(session: &mut Session) {
    if let Some(user) = session.user() {
        info!(
            role = %user.role,
            username = %user.username,
            abandoned_items = session.cart().item_count(),
            "logout"
        );
    }
    session.reset();
}

/// Products matching `search_term`, or the whole catalog for a blank term.
#[must_use]
pub fn browse(catalog: &Catalog, search_term: &str) -> Vec<Product> {
    catalog.search(search_term)
}

/// Put one unit of a product into the buyer's cart.
///
/// # Errors
///
/// Requires a buyer session. Fails with a catalog error if the product is
/// unknown or out of stock.
pub fn buyer_add_to_cart<'s>(
    catalog: &mut Catalog,
    session: &'s mut Session,
    product_id: &ProductId,
) -> Result<&'s CartItem> {
    session.require(Role::Buyer)?;
    let item = session.cart_mut().add(catalog, product_id)?;
    debug!(product_id = %item.id, cart_quantity = item.quantity, "added to cart");
    Ok(item)
}

/// Buy one unit straight away, without the cart.
///
/// # Errors
///
/// Requires a buyer session. Fails with a catalog error if the product is
/// unknown or out of stock.
pub fn buy_now(catalog: &mut Catalog, session: &Session, product_id: &ProductId) -> Result<Product> {
    session.require(Role::Buyer)?;
    let product = catalog.decrement_stock(product_id, 1)?;
    info!(product_id = %product.id, remaining = product.quantity, "bought one unit");
    Ok(product.clone())
}

/// Check out the buyer's cart.
///
/// Returns `Ok(None)` when the cart was already empty.
///
/// # Errors
///
/// Requires a buyer session. Fails with [`MarketError::Cart`] if the total
/// cannot be computed, leaving the cart as it was.
pub fn checkout(session: &mut Session) -> Result<Option<Receipt>> {
    session.require(Role::Buyer)?;
    let receipt = session.cart_mut().checkout()?;
    if let Some(receipt) = &receipt {
        info!(
            lines = receipt.items.len(),
            units = receipt.item_count(),
            total = %receipt.total,
            "checkout"
        );
    }
    Ok(receipt)
}

/// Create or update one of the vendor's own products.
///
/// # Errors
///
/// Requires a vendor session. Returns a validation error for bad input, in
/// which case the catalog is untouched.
pub fn vendor_save_product(
    catalog: &mut Catalog,
    session: &Session,
    input: &ProductInput,
) -> Result<SaveOutcome> {
    let user = session.require(Role::Vendor)?;
    let new = input.parse(user)?;
    let outcome = catalog.create_or_update(new)?;
    match &outcome {
        SaveOutcome::Created(p) => info!(product_id = %p.id, "product created"),
        SaveOutcome::Updated(p) => info!(product_id = %p.id, "product updated"),
    }
    Ok(outcome)
}

/// Delete one of the vendor's own products.
///
/// Unknown ids, and ids belonging to another vendor, are ignored.
///
/// # Errors
///
/// Requires a vendor session.
pub fn vendor_delete_product(
    catalog: &mut Catalog,
    session: &Session,
    product_id: &ProductId,
) -> Result<Option<Product>> {
    let user = session.require(Role::Vendor)?;
    let owned = catalog
        .find(product_id)
        .is_some_and(|p| p.vendor_id == user.vendor_id());
    if !owned {
        debug!(%product_id, "delete ignored: not one of this vendor's products");
        return Ok(None);
    }
    let removed = catalog.delete(product_id);
    info!(%product_id, "product deleted");
    Ok(removed)
}

/// The vendor's own listings, in catalog order.
///
/// # Errors
///
/// Requires a vendor session.
pub fn vendor_listings(catalog: &Catalog, session: &Session) -> Result<Vec<Product>> {
    let user = session.require(Role::Vendor)?;
    Ok(catalog.list_by_vendor(&user.vendor_id()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::CatalogError;

    fn buyer() -> Session {
        let mut session = Session::new();
        login(&mut session, Role::Buyer, "").unwrap();
        session
    }

    fn vendor(name: &str) -> Session {
        let mut session = Session::new();
        login(&mut session, Role::Vendor, name).unwrap();
        session
    }

    fn input(name: &str, price: &str, quantity: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: price.to_string(),
            quantity: quantity.to_string(),
            image_url: "https://example.com/item.jpg".to_string(),
        }
    }

    fn stock(catalog: &Catalog, id: &str) -> u32 {
        catalog.find(&ProductId::new(id)).map_or(0, |p| p.quantity)
    }

    #[test]
    fn test_vendor_login_requires_username() {
        let mut session = Session::new();
        let err = login(&mut session, Role::Vendor, "   ").unwrap_err();
        assert_eq!(
            err,
            MarketError::Validation(ValidationError::MissingVendorUsername)
        );
        assert!(!session.logged_in());
    }

    #[test]
    fn test_buyer_login_ignores_username() {
        let mut session = Session::new();
        let user = login(&mut session, Role::Buyer, "someone").unwrap();
        assert_eq!(user.username, BUYER_USERNAME);
        assert_eq!(session.role(), Some(Role::Buyer));
    }

    #[test]
    fn test_second_login_is_rejected() {
        let mut session = vendor("VendorA");
        assert_eq!(
            login(&mut session, Role::Buyer, "").unwrap_err(),
            MarketError::AlreadyLoggedIn
        );
        assert_eq!(session.role(), Some(Role::Vendor));
    }

    #[test]
    fn test_browse_empty_term_returns_seed_in_order() {
        let catalog = Catalog::seeded();
        let names: Vec<String> = browse(&catalog, "").into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "Fresh Tomatoes",
                "Organic Carrots",
                "Crisp Lettuce",
                "Green Broccoli",
                "Red Onions",
                "Russet Potatoes",
            ]
        );
    }

    #[test]
    fn test_add_tomatoes_twice() {
        let mut catalog = Catalog::seeded();
        let mut session = buyer();
        let tomato = ProductId::new("tomato-vendora");

        buyer_add_to_cart(&mut catalog, &mut session, &tomato).unwrap();
        buyer_add_to_cart(&mut catalog, &mut session, &tomato).unwrap();

        assert_eq!(stock(&catalog, "tomato-vendora"), 48);
        assert_eq!(session.cart().items().len(), 1);
        assert_eq!(session.cart().items().first().map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_add_unknown_product_is_visible_error() {
        let mut catalog = Catalog::seeded();
        let mut session = buyer();
        let missing = ProductId::new("kiwi-vendorz");
        assert_eq!(
            buyer_add_to_cart(&mut catalog, &mut session, &missing).unwrap_err(),
            MarketError::Catalog(CatalogError::NotFound(missing))
        );
    }

    #[test]
    fn test_vendor_cannot_use_cart() {
        let mut catalog = Catalog::seeded();
        let mut session = vendor("VendorA");
        let err =
            buyer_add_to_cart(&mut catalog, &mut session, &ProductId::new("tomato-vendora"))
                .unwrap_err();
        assert_eq!(
            err,
            MarketError::WrongRole {
                required: Role::Buyer
            }
        );
        assert_eq!(stock(&catalog, "tomato-vendora"), 50);
    }

    #[test]
    fn test_logged_out_commands_fail() {
        let mut catalog = Catalog::seeded();
        let mut session = Session::new();
        assert_eq!(checkout(&mut session).unwrap_err(), MarketError::NotLoggedIn);
        assert_eq!(
            vendor_listings(&catalog, &session).unwrap_err(),
            MarketError::NotLoggedIn
        );
        assert_eq!(
            buy_now(&mut catalog, &session, &ProductId::new("tomato-vendora")).unwrap_err(),
            MarketError::NotLoggedIn
        );
    }

    #[test]
    fn test_checkout_two_items() {
        let mut catalog = Catalog::seeded();
        let mut session = buyer();
        buyer_add_to_cart(&mut catalog, &mut session, &ProductId::new("tomato-vendora")).unwrap();
        buyer_add_to_cart(&mut catalog, &mut session, &ProductId::new("broccoli-vendorb")).unwrap();

        let receipt = checkout(&mut session).unwrap().unwrap();
        assert_eq!(receipt.total, Decimal::new(700, 2));
        assert!(session.cart().is_empty());
        assert_eq!(stock(&catalog, "tomato-vendora"), 49);
        assert_eq!(stock(&catalog, "broccoli-vendorb"), 24);

        assert!(checkout(&mut session).unwrap().is_none());
    }

    #[test]
    fn test_buy_now_takes_one_unit() {
        let mut catalog = Catalog::seeded();
        let session = buyer();
        let bought = buy_now(&mut catalog, &session, &ProductId::new("potato-vendorb")).unwrap();
        assert_eq!(bought.quantity, 99);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_logout_discards_cart_without_restocking() {
        let mut catalog = Catalog::seeded();
        let mut session = buyer();
        buyer_add_to_cart(&mut catalog, &mut session, &ProductId::new("onion-vendora")).unwrap();

        logout(&mut session);
        assert!(!session.logged_in());
        assert!(session.cart().is_empty());
        assert_eq!(stock(&catalog, "onion-vendora"), 59);
    }

    #[test]
    fn test_vendor_save_creates_then_updates() {
        let mut catalog = Catalog::seeded();
        let session = vendor("VendorC");

        let created =
            vendor_save_product(&mut catalog, &session, &input("Curly Kale", "3.99", "12"))
                .unwrap();
        assert!(matches!(created, SaveOutcome::Created(_)));

        let updated =
            vendor_save_product(&mut catalog, &session, &input("Curly Kale", "2.49", "0"))
                .unwrap();
        assert!(matches!(updated, SaveOutcome::Updated(_)));
        assert_eq!(updated.product().quantity, 0);

        let listings = vendor_listings(&catalog, &session).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_vendor_save_validation() {
        let mut catalog = Catalog::seeded();
        let session = vendor("VendorC");

        let cases = [
            (input("", "1.00", "1"), ValidationError::EmptyName),
            (
                ProductInput {
                    image_url: " ".to_string(),
                    ..input("Kale", "1.00", "1")
                },
                ValidationError::EmptyImageUrl,
            ),
            (
                input("Kale", "1.00", "-3"),
                ValidationError::InvalidQuantity("-3".to_string()),
            ),
            (
                input("Kale", "1.5x", "1"),
                ValidationError::Price(crate::types::PriceError::Invalid("1.5x".to_string())),
            ),
            (
                input("Kale", "0.00", "1"),
                ValidationError::Price(crate::types::PriceError::TooLow { min: Price::MIN }),
            ),
            (
                input("Gold", "50000000000000000000000000000", "5"),
                ValidationError::Price(crate::types::PriceError::TooHigh { max: Price::MAX }),
            ),
        ];

        for (form, expected) in cases {
            assert_eq!(
                vendor_save_product(&mut catalog, &session, &form).unwrap_err(),
                MarketError::Validation(expected)
            );
        }
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_vendor_delete_rules() {
        let mut catalog = Catalog::seeded();
        let session = vendor("VendorA");

        // Missing id: silent.
        assert!(
            vendor_delete_product(&mut catalog, &session, &ProductId::new("nope"))
                .unwrap()
                .is_none()
        );
        // Another vendor's product: left alone.
        assert!(
            vendor_delete_product(&mut catalog, &session, &ProductId::new("carrot-vendorb"))
                .unwrap()
                .is_none()
        );
        assert_eq!(catalog.len(), 6);

        let removed =
            vendor_delete_product(&mut catalog, &session, &ProductId::new("tomato-vendora"))
                .unwrap();
        assert_eq!(removed.map(|p| p.name), Some("Fresh Tomatoes".to_string()));
        assert_eq!(catalog.len(), 5);
    }
}
