//! # Validation Module
//!
//! Checks applied at the two places untrusted data enters the cart: the
//! catalog boundary (product and stock payloads) and the storage boundary
//! (snapshots written by an earlier session, or by another client).
//!
//! ## Validation Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Catalog API ──► validate_product / validate_stock ──► CartStore        │
//! │                  (id must match the requested id)                       │
//! │                                                                         │
//! │  Storage ──────► validate_cart_items ─────────────────► Cart            │
//! │                  (amount >= 1, ids unique)                              │
//! │                                                                         │
//! │  Caller ───────► validate_amount ─────────────────────► update guard    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{CartItem, Product, ProductId, StockInfo};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a cart quantity.
///
/// ## Example
/// ```rust
/// use shoecart_core::validation::validate_amount;
///
/// assert!(validate_amount(1).is_ok());
/// assert!(validate_amount(0).is_err());
/// assert!(validate_amount(-3).is_err());
/// ```
pub fn validate_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
            value: amount,
        });
    }

    Ok(())
}

/// Validates the items of a decoded snapshot.
///
/// ## Rules
/// - Every amount is positive
/// - No two items share an id
pub fn validate_cart_items(items: &[CartItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_amount(item.amount)?;

        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }
    }

    Ok(())
}

/// Checks that a product payload describes the product that was asked for.
pub fn validate_product(product: &Product, requested: ProductId) -> ValidationResult<()> {
    ensure_same_id("product.id", requested, product.id)
}

/// Checks that a stock payload describes the product that was asked for.
pub fn validate_stock(stock: &StockInfo, requested: ProductId) -> ValidationResult<()> {
    ensure_same_id("stock.id", requested, stock.id)
}

fn ensure_same_id(field: &str, expected: ProductId, actual: ProductId) -> ValidationResult<()> {
    if expected != actual {
        return Err(ValidationError::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn item(id: u64, amount: i64) -> CartItem {
        CartItem {
            id: ProductId(id),
            amount,
            attributes: Map::new(),
        }
    }

    #[test]
    fn test_validate_cart_items_accepts_valid() {
        assert!(validate_cart_items(&[]).is_ok());
        assert!(validate_cart_items(&[item(1, 1), item(2, 5)]).is_ok());
    }

    #[test]
    fn test_validate_cart_items_rejects_zero_amount() {
        let err = validate_cart_items(&[item(1, 0)]).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { value: 0, .. }));
    }

    #[test]
    fn test_validate_cart_items_rejects_duplicates() {
        let err = validate_cart_items(&[item(1, 1), item(1, 2)]).unwrap_err();
        assert_eq!(err.to_string(), "id '1' appears more than once");
    }

    #[test]
    fn test_validate_stock_id_mismatch() {
        let stock = StockInfo {
            id: ProductId(2),
            amount: 4,
        };
        assert!(validate_stock(&stock, ProductId(2)).is_ok());

        let err = validate_stock(&stock, ProductId(1)).unwrap_err();
        assert_eq!(err.to_string(), "stock.id mismatch: expected 1, got 2");
    }
}
