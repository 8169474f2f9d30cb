//! # Cart
//!
//! The cart value and its transitions.
//!
//! ## Replace-Whole-List Semantics
//! A `Cart` is never edited in place. Each transition borrows the current
//! cart and returns the next one, so anything still holding the old value
//! (a subscriber, a render in progress) never observes a half-applied change.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Command               Transition                Result                 │
//! │  ───────               ──────────                ──────                 │
//! │                                                                         │
//! │  add_product ─────────► with_added(p, stock) ──► Ok(next) | OutOfStock  │
//! │                                                                         │
//! │  remove_product ──────► without(id) ───────────► Ok(next) | NotFound    │
//! │                                                                         │
//! │  update_product_amount► with_amount(id, n, s) ─► Ok(Some(next))        │
//! │                                                  Ok(None)  (no-op)      │
//! │                                                  OutOfStock             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one item per product id
//! - Every amount is >= 1
//! - New items are appended; existing items keep their position

use serde::Serialize;

use crate::error::{CartError, CartResult};
use crate::types::{CartItem, Product, ProductId, StockInfo};
use crate::validation::validate_amount;

/// The shopping cart: an ordered list of items, unique by product id.
///
/// Serializes as a bare JSON array, which is the storage snapshot format.
/// Decoding goes through [`crate::snapshot::decode`] so invariants are checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from items that are already known to be valid.
    ///
    /// Callers holding untrusted items go through `snapshot::decode`, which
    /// validates before calling this.
    pub(crate) fn from_items_unchecked(items: Vec<CartItem>) -> Self {
        Cart { items }
    }

    /// Adds one unit of `product`, or the product itself with amount 1.
    ///
    /// ## Behavior
    /// - Product already in cart: amount + 1, same position. Rejected when
    ///   the current amount already meets or exceeds `stock`.
    /// - Product not in cart: appended with amount 1. Rejected when
    ///   `stock` is zero.
    pub fn with_added(&self, product: &Product, stock: &StockInfo) -> CartResult<Cart> {
        let available = stock.available();

        match self.position(product.id) {
            Some(index) => {
                let current = &self.items[index];
                if current.amount >= available {
                    return Err(CartError::OutOfStock {
                        product_id: product.id,
                        requested: current.amount.saturating_add(1),
                        available,
                    });
                }

                let mut items = self.items.clone();
                items[index] = current.with_amount(current.amount + 1);
                Ok(Cart { items })
            }
            None => {
                let item = CartItem::from_product(product, 1);
                if available < item.amount {
                    return Err(CartError::OutOfStock {
                        product_id: product.id,
                        requested: item.amount,
                        available,
                    });
                }

                let mut items = Vec::with_capacity(self.items.len() + 1);
                items.extend(self.items.iter().cloned());
                items.push(item);
                Ok(Cart { items })
            }
        }
    }

    /// Removes the item for `product_id`.
    pub fn without(&self, product_id: ProductId) -> CartResult<Cart> {
        if !self.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();

        Ok(Cart { items })
    }

    /// Sets the amount of an existing item.
    ///
    /// ## Behavior
    /// - `amount <= 0`: `Ok(None)`, nothing to do
    /// - Product not in cart: `Ok(None)`, nothing to do
    /// - `amount > stock`: `OutOfStock`
    /// - Otherwise: `Ok(Some(next))` with only that item's amount changed
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: i64,
        stock: &StockInfo,
    ) -> CartResult<Option<Cart>> {
        if validate_amount(amount).is_err() {
            return Ok(None);
        }

        let Some(index) = self.position(product_id) else {
            return Ok(None);
        };

        let available = stock.available();
        if amount > available {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available,
            });
        }

        let mut items = self.items.clone();
        items[index] = items[index].with_amount(amount);
        Ok(Some(Cart { items }))
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Items in cart order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the item for `product_id`.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Returns true if the cart holds `product_id`.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all amounts (the badge count in the header).
    ///
    /// Saturates at `i64::MAX`; a restored snapshot may hold amounts whose
    /// sum does not fit.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, item| total.saturating_add(item.amount))
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == product_id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn product(id: u64) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Tênis {}", id),
            "price": 139.9,
            "image": format!("https://example.com/{}.jpg", id)
        }))
        .unwrap()
    }

    fn stock(id: u64, amount: u64) -> StockInfo {
        StockInfo {
            id: ProductId(id),
            amount,
        }
    }

    #[test]
    fn test_add_new_product() {
        let cart = Cart::new().with_added(&product(1), &stock(1, 5)).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get(ProductId(1)).unwrap();
        assert_eq!(item.amount, 1);
        assert_eq!(item.attributes.get("title"), Some(&json!("Tênis 1")));
    }

    #[test]
    fn test_add_existing_increments_in_place() {
        let cart = Cart::new()
            .with_added(&product(1), &stock(1, 5))
            .and_then(|c| c.with_added(&product(2), &stock(2, 5)))
            .and_then(|c| c.with_added(&product(1), &stock(1, 5)))
            .unwrap();

        let ids: Vec<_> = cart.items().iter().map(|i| (i.id.0, i.amount)).collect();
        assert_eq!(ids, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_add_existing_at_stock_is_rejected() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(1), 2)]);

        let err = cart.with_added(&product(1), &stock(1, 2)).unwrap_err();
        assert!(err.is_out_of_stock());
        assert_eq!(cart.get(ProductId(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_add_existing_above_stock_is_rejected() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(1), 4)]);
        assert!(cart.with_added(&product(1), &stock(1, 2)).is_err());
    }

    #[test]
    fn test_add_new_without_stock_is_rejected() {
        let err = Cart::new().with_added(&product(1), &stock(1, 0)).unwrap_err();
        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 1,
                available: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_without_removes_item() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(2), 1)]);
        let next = cart.without(ProductId(2)).unwrap();

        assert!(next.is_empty());
        // Previous value is untouched
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_without_missing_is_not_found() {
        let cart = Cart::new();
        assert!(matches!(
            cart.without(ProductId(99)),
            Err(CartError::NotFound(ProductId(99)))
        ));
        // Same answer the second time
        assert!(matches!(
            cart.without(ProductId(99)),
            Err(CartError::NotFound(ProductId(99)))
        ));
    }

    #[test]
    fn test_with_amount_sets_value() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(3), 1)]);
        let next = cart.with_amount(ProductId(3), 4, &stock(3, 10)).unwrap().unwrap();

        assert_eq!(next.get(ProductId(3)).unwrap().amount, 4);
        assert_eq!(
            next.get(ProductId(3)).unwrap().attributes,
            cart.get(ProductId(3)).unwrap().attributes
        );
    }

    #[test]
    fn test_with_amount_above_stock_is_rejected() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(3), 1)]);
        let err = cart.with_amount(ProductId(3), 5, &stock(3, 2)).unwrap_err();
        assert!(err.is_out_of_stock());
    }

    #[test]
    fn test_with_amount_equal_to_stock_is_allowed() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(3), 1)]);
        let next = cart.with_amount(ProductId(3), 2, &stock(3, 2)).unwrap();
        assert_eq!(next.unwrap().total_quantity(), 2);
    }

    #[test]
    fn test_with_amount_noops() {
        let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(3), 1)]);

        assert_eq!(cart.with_amount(ProductId(3), 0, &stock(3, 10)).unwrap(), None);
        assert_eq!(cart.with_amount(ProductId(3), -2, &stock(3, 10)).unwrap(), None);
        assert_eq!(cart.with_amount(ProductId(8), 2, &stock(8, 10)).unwrap(), None);
    }

    #[test]
    fn test_total_quantity_saturates() {
        let cart = Cart::from_items_unchecked(vec![
            CartItem::from_product(&product(1), i64::MAX),
            CartItem::from_product(&product(2), 1),
        ]);
        assert_eq!(cart.total_quantity(), i64::MAX);
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let cart = Cart::new().with_added(&product(1), &stock(1, 5)).unwrap();
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], json!(1));
        assert_eq!(value[0]["amount"], json!(1));
    }

    proptest! {
        #[test]
        fn prop_adds_keep_ids_unique(ids in proptest::collection::vec(1u64..6, 0..40), level in 0u64..4) {
            let mut cart = Cart::new();
            for id in ids {
                if let Ok(next) = cart.with_added(&product(id), &stock(id, level)) {
                    cart = next;
                }
            }

            let mut seen = std::collections::HashSet::new();
            for item in cart.items() {
                prop_assert!(seen.insert(item.id));
                prop_assert!(item.amount >= 1);
                prop_assert!(item.amount <= level as i64);
            }
        }

        #[test]
        fn prop_update_respects_stock(amount in -5i64..20, level in 0u64..10) {
            let cart = Cart::from_items_unchecked(vec![CartItem::from_product(&product(1), 1)]);

            match cart.with_amount(ProductId(1), amount, &stock(1, level)) {
                Ok(Some(next)) => prop_assert!(next.get(ProductId(1)).unwrap().amount <= level as i64),
                Ok(None) => prop_assert!(amount <= 0),
                Err(err) => prop_assert!(err.is_out_of_stock() && amount > level as i64),
            }
        }
    }
}
