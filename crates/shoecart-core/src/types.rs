//! # Domain Types
//!
//! Core domain types used throughout ShoeCart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    StockInfo    │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  attributes     │   │  amount (>= 0)  │   │  amount (>= 1)  │       │
//! │  │  (title, price, │   │                 │   │  attributes     │       │
//! │  │   image, ...)   │   │                 │   │  (from Product) │       │
//! │  └────────┬────────┘   └─────────────────┘   └────────▲────────┘       │
//! │           │                                           │                │
//! │           └────────── CartItem::from_product ─────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Passthrough Attributes
//! The cart does not interpret product fields. Whatever the catalog returns
//! besides `id` is kept in `attributes` and written back out unchanged, so
//! the presentation layer can render `title`, `price` and `image` straight
//! from the snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form product fields carried through from the catalog.
pub type Attributes = Map<String, Value>;

// =============================================================================
// Product Id
// =============================================================================

/// Catalog identifier of a product.
///
/// Serialized as a bare integer (`1`, not `{"0": 1}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Every other field of the catalog payload.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Product {
    /// Returns a string attribute such as `title` or `image`.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Remote available quantity for one product.
///
/// `amount` is unsigned, so a negative stock value never deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u64,
}

impl StockInfo {
    /// Returns the stock level as a signed quantity, saturating at `i64::MAX`.
    pub fn available(&self) -> i64 {
        i64::try_from(self.amount).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One product entry in the cart.
///
/// ## Snapshot Shape
/// ```json
/// { "id": 1, "amount": 2, "title": "Tênis", "price": 179.9, "image": "https://..." }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,

    /// Quantity in cart. Always >= 1 for items held by a valid `Cart`.
    pub amount: i64,

    /// Product fields frozen at the time the item was first added.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl CartItem {
    /// Creates a cart item from a catalog product.
    ///
    /// Any `amount` field the catalog sent is dropped; the cart owns that key.
    pub fn from_product(product: &Product, amount: i64) -> Self {
        let mut attributes = product.attributes.clone();
        attributes.remove("amount");

        CartItem {
            id: product.id,
            amount,
            attributes,
        }
    }

    /// Returns a copy of this item with a different amount.
    pub fn with_amount(&self, amount: i64) -> Self {
        CartItem {
            amount,
            ..self.clone()
        }
    }
}

// =============================================================================
// Update Request
// =============================================================================

/// Request to set the quantity of an item already in the cart.
///
/// `amount` is caller-supplied and may be zero or negative; such requests are
/// ignored by the store rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        UpdateProductAmount {
            product_id: product_id.into(),
            amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "title": "Tênis Adidas Duramo Lite 2.0",
            "price": 219.9,
            "image": "https://example.com/3.jpg"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId(3));
        assert_eq!(product.attribute_str("title"), Some("Tênis Adidas Duramo Lite 2.0"));
        assert_eq!(product.attributes.get("price"), Some(&json!(219.9)));
    }

    #[test]
    fn test_cart_item_serializes_flat() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "title": "Tênis", "price": 179.9})).unwrap();
        let item = CartItem::from_product(&product, 2);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "amount": 2, "title": "Tênis", "price": 179.9})
        );
    }

    #[test]
    fn test_catalog_amount_is_dropped() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "amount": 40, "title": "Tênis"})).unwrap();
        let item = CartItem::from_product(&product, 1);

        assert_eq!(item.amount, 1);
        assert!(!item.attributes.contains_key("amount"));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_value::<StockInfo>(json!({"id": 1, "amount": -1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_uses_camel_case() {
        let request: UpdateProductAmount =
            serde_json::from_value(json!({"productId": 7, "amount": 3})).unwrap();
        assert_eq!(request, UpdateProductAmount::new(ProductId(7), 3));
    }
}
