//! # Cart Snapshot
//!
//! The string form of a cart as written to storage: a JSON array of flat
//! cart items.
//!
//! ```json
//! [
//!   { "id": 1, "amount": 2, "title": "Tênis de Caminhada", "price": 179.9, "image": "..." },
//!   { "id": 3, "amount": 1, "title": "Tênis Adidas Duramo", "price": 219.9, "image": "..." }
//! ]
//! ```

use crate::cart::Cart;
use crate::error::CartResult;
use crate::types::CartItem;
use crate::validation::validate_cart_items;

/// Serializes a cart to its snapshot string.
pub fn encode(cart: &Cart) -> CartResult<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Parses and validates a snapshot string.
///
/// Fails on invalid JSON, on a non-array root, on items without an integer
/// `id`/`amount`, on non-positive amounts and on duplicate ids.
pub fn decode(raw: &str) -> CartResult<Cart> {
    let items: Vec<CartItem> = serde_json::from_str(raw)?;
    validate_cart_items(&items)?;
    Ok(Cart::from_items_unchecked(items))
}

/// Decodes a stored snapshot, falling back to an empty cart.
///
/// Absent and malformed snapshots both give an empty cart; the caller is
/// expected to log the distinction.
pub fn decode_or_empty(raw: Option<&str>) -> Cart {
    raw.and_then(|raw| decode(raw).ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;
    use crate::CartError;

    #[test]
    fn test_decode_valid_snapshot() {
        let cart = decode(r#"[{"id":1,"amount":2,"title":"Tênis","price":179.9}]"#).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_encode_decode_preserves_order_and_fields() {
        let raw = r#"[{"id":5,"amount":1,"image":"a.jpg"},{"id":2,"amount":3,"image":"b.jpg"}]"#;
        let cart = decode(raw).unwrap();
        let again = decode(&encode(&cart).unwrap()).unwrap();

        assert_eq!(again, cart);
        assert_eq!(again.items()[0].id, ProductId(5));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(decode("not json"), Err(CartError::Snapshot(_))));
        assert!(matches!(decode(r#"{"id":1}"#), Err(CartError::Snapshot(_))));
        assert!(matches!(decode(r#"[{"id":1}]"#), Err(CartError::Snapshot(_))));
        assert!(matches!(
            decode(r#"[{"id":1,"amount":0}]"#),
            Err(CartError::Validation(_))
        ));
        assert!(matches!(
            decode(r#"[{"id":1,"amount":1},{"id":1,"amount":2}]"#),
            Err(CartError::Validation(_))
        ));
    }

    #[test]
    fn test_decode_or_empty() {
        assert!(decode_or_empty(None).is_empty());
        assert!(decode_or_empty(Some("[broken")).is_empty());
        assert_eq!(decode_or_empty(Some(r#"[{"id":4,"amount":1}]"#)).len(), 1);
    }
}
