//! The catalog store.
//!
//! An ordered, in-memory list of products keyed by their derived
//! [`ProductId`]. Store order is insertion order and is what every listing
//! returns; updates happen in place and never move a record.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ValidationError};
use crate::types::{Price, ProductId, VendorId};

/// A product listed by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Units in stock.
    pub quantity: u32,
    pub vendor_id: VendorId,
    pub image_url: String,
}

impl Product {
    /// Whether at least one unit can be bought.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Input for [`Catalog::create_or_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub vendor_id: VendorId,
    pub image_url: String,
}

/// What a save did to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was appended.
    Created(Product),
    /// An existing record had its price, stock and image replaced.
    Updated(Product),
}

impl SaveOutcome {
    /// The product as stored after the save.
    #[must_use]
    pub const fn product(&self) -> &Product {
        match self {
            Self::Created(product) | Self::Updated(product) => product,
        }
    }
}

/// The process-wide product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Create a catalog holding the six starter products.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: seed_products(),
        }
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over products in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Create a product, or update the one with the same name and vendor.
    ///
    /// On update only `price`, `quantity` and `image_url` change.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or image URL is blank. The
    /// catalog is unchanged in that case.
    pub fn create_or_update(&mut self, new: NewProduct) -> Result<SaveOutcome, ValidationError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let image_url = new.image_url.trim();
        if image_url.is_empty() {
            return Err(ValidationError::EmptyImageUrl);
        }

        let id = ProductId::derive(name, &new.vendor_id);
        if let Some(existing) = self.products.iter_mut().find(|p| p.id == id) {
            existing.price = new.price;
            existing.quantity = new.quantity;
            existing.image_url = image_url.to_owned();
            return Ok(SaveOutcome::Updated(existing.clone()));
        }

        let product = Product {
            id,
            name: name.to_owned(),
            price: new.price,
            quantity: new.quantity,
            vendor_id: new.vendor_id,
            image_url: image_url.to_owned(),
        };
        self.products.push(product.clone());
        Ok(SaveOutcome::Created(product))
    }

    /// Remove a product. Returns the removed record, or `None` if the id was
    /// unknown.
    pub fn delete(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products listed by `vendor_id`, in store order.
    #[must_use]
    pub fn list_by_vendor(&self, vendor_id: &VendorId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| &p.vendor_id == vendor_id)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search on product names.
    ///
    /// A blank term returns the whole catalog.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Product> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.clone();
        }
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Take `by` units out of stock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id and
    /// [`CatalogError::OutOfStock`] if fewer than `by` units remain. Stock is
    /// unchanged on error.
    pub fn decrement_stock(&mut self, id: &ProductId, by: u32) -> Result<&Product, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let available = product.quantity;
        product.quantity = available
            .checked_sub(by)
            .ok_or_else(|| CatalogError::OutOfStock {
                id: id.clone(),
                available,
                requested: by,
            })?;
        Ok(product)
    }

    /// Put `by` units back into stock, undoing a [`Catalog::decrement_stock`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product is gone.
    pub fn restock(&mut self, id: &ProductId, by: u32) -> Result<&Product, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        product.quantity = product.quantity.saturating_add(by);
        Ok(product)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// (id, name, price in cents, stock, vendor, image)
const SEED: [(&str, &str, u32, u32, &str, &str); 6] = [
    (
        "tomato-vendora",
        "Fresh Tomatoes",
        250,
        50,
        "VendorA",
        "https://images.unsplash.com/photo-1561155653-295af1c2a6c6?w=400",
    ),
    (
        "carrot-vendorb",
        "Organic Carrots",
        300,
        30,
        "VendorB",
        "https://images.unsplash.com/photo-1590868309235-ea34bed7bd7f?w=400",
    ),
    (
        "lettuce-vendora",
        "Crisp Lettuce",
        175,
        40,
        "VendorA",
        "https://images.unsplash.com/photo-1556801712-9c1d5e419e34?w=400",
    ),
    (
        "broccoli-vendorb",
        "Green Broccoli",
        450,
        25,
        "VendorB",
        "https://images.unsplash.com/photo-1587351177733-a03efcae3ebc?w=400",
    ),
    (
        "onion-vendora",
        "Red Onions",
        150,
        60,
        "VendorA",
        "https://images.unsplash.com/photo-1587374290079-69274851532d?w=400",
    ),
    (
        "potato-vendorb",
        "Russet Potatoes",
        200,
        100,
        "VendorB",
        "https://images.unsplash.com/photo-1518977676601-b53f82aba655?w=400",
    ),
];

// Seed ids are literal, not derived from the display names.
fn seed_products() -> Vec<Product> {
    SEED.iter()
        .filter_map(|&(id, name, cents, quantity, vendor, image_url)| {
            Some(Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                price: Price::from_cents(cents).ok()?,
                quantity,
                vendor_id: VendorId::new(vendor),
                image_url: image_url.to_owned(),
            })
        })
        .collect()
}
