//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create string-backed ID wrappers that prevent
//! accidentally mixing a product id with a vendor id.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use market_eaze_core::define_id;
/// define_id!(StallId);
///
/// let stall = StallId::new("north-row");
/// assert_eq!(stall.as_str(), "north-row");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VendorId);

impl ProductId {
    /// Derive the natural key of a product from its name and vendor.
    ///
    /// Both parts are lowercased and spaces become hyphens, joined as
    /// `"{name}-{vendor}"`. Saving the same name for the same vendor
    /// therefore always lands on the same record.
    ///
    /// ```rust
    /// use market_eaze_core::{ProductId, VendorId};
    ///
    /// let id = ProductId::derive("Fresh Tomatoes", &VendorId::new("VendorA"));
    /// assert_eq!(id.as_str(), "fresh-tomatoes-vendora");
    /// ```
    #[must_use]
    pub fn derive(name: &str, vendor_id: &VendorId) -> Self {
        Self(format!("{}-{}", slug(name), slug(vendor_id.as_str())))
    }
}

fn slug(value: &str) -> String {
    value.to_lowercase().replace(' ', "-")
}
