//! Shopping cart and checkout.
//!
//! Stock is taken from the catalog when an item is added, not at checkout.
//! Checkout only clears the cart and reports what was bought.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::error::{CartError, CatalogError};
use crate::types::{Price, ProductId, VendorId, round_cents};

/// A product snapshot in the cart with its own quantity.
///
/// `quantity` counts units in the cart and is unrelated to the product's
/// remaining stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub vendor_id: VendorId,
    pub image_url: String,
    pub quantity: u32,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            vendor_id: product.vendor_id.clone(),
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// `price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the product does not fit in a
    /// `Decimal`.
    pub fn subtotal(&self) -> Result<Decimal, CartError> {
        self.price
            .amount()
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(CartError::TotalOverflow)
    }
}

/// Items a buyer has taken off the shelf, in the order first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Take one unit of `product_id` from the catalog and put it in the cart.
    ///
    /// A product already in the cart has its quantity bumped; otherwise a new
    /// line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown product and
    /// [`CatalogError::OutOfStock`] when no units are left. Neither the cart
    /// nor the catalog changes on error.
    pub fn add(
        &mut self,
        catalog: &mut Catalog,
        product_id: &ProductId,
    ) -> Result<&CartItem, CatalogError> {
        let product = catalog.decrement_stock(product_id, 1)?;

        match self.items.iter_mut().find(|item| &item.id == product_id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem::from_product(product)),
        }

        self.items
            .iter()
            .find(|item| &item.id == product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }

    /// Sum of `price × quantity` over every line, rounded to cents.
    ///
    /// Computed from the current lines on every call.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if a subtotal or the running sum
    /// overflows.
    pub fn compute_total(&self) -> Result<Decimal, CartError> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                total
                    .checked_add(item.subtotal()?)
                    .ok_or(CartError::TotalOverflow)
            })
            .map(round_cents)
    }

    /// Empty the cart and return a receipt for what it held.
    ///
    /// Returns `Ok(None)` when the cart is already empty. Stock stays
    /// decremented: the units left the catalog when they were added.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the total cannot be computed,
    /// in which case the cart is left as it was.
    pub fn checkout(&mut self) -> Result<Option<Receipt>, CartError> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let total = self.compute_total()?;
        Ok(Some(Receipt {
            items: std::mem::take(&mut self.items),
            total,
        }))
    }

    /// Drop every line without touching the catalog.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// What a checkout bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub items: Vec<CartItem>,
    /// Cart total at the moment of checkout.
    pub total: Decimal,
}

impl Receipt {
    /// Total units purchased.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn stock(catalog: &Catalog, s: &str) -> u32 {
        catalog.find(&id(s)).map_or(0, |p| p.quantity)
    }

    #[test]
    fn test_add_twice_merges_line_and_takes_stock() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();

        cart.add(&mut catalog, &id("tomato-vendora")).unwrap();
        let item = cart.add(&mut catalog, &id("tomato-vendora")).unwrap();
        assert_eq!(item.quantity, 2);

        assert_eq!(stock(&catalog, "tomato-vendora"), 48);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_keeps_first_added_order() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(&mut catalog, &id("potato-vendorb")).unwrap();
        cart.add(&mut catalog, &id("tomato-vendora")).unwrap();
        cart.add(&mut catalog, &id("potato-vendorb")).unwrap();

        let order: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["potato-vendorb", "tomato-vendora"]);
    }

    #[test]
    fn test_add_unknown_product_fails() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let err = cart.add(&mut catalog, &id("kiwi-vendorz")).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(id("kiwi-vendorz")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_at_zero_stock_fails_without_changes() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        catalog.decrement_stock(&id("carrot-vendorb"), 30).unwrap();

        let err = cart.add(&mut catalog, &id("carrot-vendorb")).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfStock { available: 0, .. }));
        assert!(cart.is_empty());
        assert_eq!(stock(&catalog, "carrot-vendorb"), 0);
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        assert_eq!(cart.compute_total().unwrap(), Decimal::ZERO);

        for _ in 0..3 {
            cart.add(&mut catalog, &id("lettuce-vendora")).unwrap();
        }
        cart.add(&mut catalog, &id("broccoli-vendorb")).unwrap();

        // 3 × 1.75 + 1 × 4.50
        assert_eq!(cart.compute_total().unwrap(), Decimal::new(975, 2));
        let summed: Decimal = cart.items().iter().map(|i| i.subtotal().unwrap()).sum();
        assert_eq!(cart.compute_total().unwrap(), summed);
    }

    #[test]
    fn test_snapshot_price_is_kept_after_catalog_update() {
        let mut catalog = Catalog::new();
        let kale = |cents| crate::catalog::NewProduct {
            name: "Curly Kale".to_string(),
            price: Price::from_cents(cents).unwrap(),
            quantity: 10,
            vendor_id: VendorId::new("VendorC"),
            image_url: "https://example.com/kale.jpg".to_string(),
        };
        catalog.create_or_update(kale(150)).unwrap();

        let mut cart = Cart::new();
        cart.add(&mut catalog, &id("curly-kale-vendorc")).unwrap();
        catalog.create_or_update(kale(999)).unwrap();

        assert_eq!(cart.compute_total().unwrap(), Decimal::new(150, 2));
    }

    #[test]
    fn test_checkout_clears_and_reports_total() {
        let mut catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(&mut catalog, &id("tomato-vendora")).unwrap();
        cart.add(&mut catalog, &id("carrot-vendorb")).unwrap();

        let receipt = cart.checkout().unwrap().unwrap();
        assert_eq!(receipt.total, Decimal::new(550, 2));
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.item_count(), 2);
        assert!(cart.is_empty());

        // Stock is not restored.
        assert_eq!(stock(&catalog, "tomato-vendora"), 49);
        assert_eq!(stock(&catalog, "carrot-vendorb"), 29);
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        // Session payloads skip `Price::new`.
        let mut cart: Cart = serde_json::from_str(
            r#"{"items": [{
                "id": "gold-vendorc",
                "name": "Gold",
                "price": "50000000000000000000000000000",
                "vendor_id": "VendorC",
                "image_url": "https://example.com/gold.jpg",
                "quantity": 2
            }]}"#,
        )
        .unwrap();

        assert_eq!(cart.items()[0].subtotal(), Err(CartError::TotalOverflow));
        assert_eq!(cart.compute_total(), Err(CartError::TotalOverflow));
        assert_eq!(cart.checkout(), Err(CartError::TotalOverflow));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_total_at_max_price_does_not_overflow() {
        let mut catalog = Catalog::new();
        catalog
            .create_or_update(crate::catalog::NewProduct {
                name: "Gold".to_string(),
                price: Price::new(Price::MAX).unwrap(),
                quantity: 5,
                vendor_id: VendorId::new("VendorC"),
                image_url: "https://example.com/gold.jpg".to_string(),
            })
            .unwrap();

        let mut cart = Cart::new();
        cart.add(&mut catalog, &id("gold-vendorc")).unwrap();
        cart.add(&mut catalog, &id("gold-vendorc")).unwrap();
        assert_eq!(cart.compute_total().unwrap(), Price::MAX * Decimal::TWO);
    }

    #[test]
    fn test_checkout_empty_cart_is_noop() {
        let mut cart = Cart::new();
        assert!(cart.checkout().unwrap().is_none());
    }
}
