//! # shoecart-core: Pure Cart Logic for ShoeCart
//!
//! This crate holds the cart data model and every cart transition as pure
//! functions. It never touches storage, the network or the notifier; those
//! live in `shoecart-store`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShoeCart Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Presentation (product list, cart page)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ add / remove / update / subscribe      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shoecart-store (CartStore)                      │   │
//! │  │     Catalog Gateway • Notifier • Storage • Config • Tracing     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shoecart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │ snapshot  │  │ validation│  │   │
//! │  │   │ CartItem  │  │ with_added│  │  encode   │  │  amounts  │  │   │
//! │  │   │ StockInfo │  │ without   │  │  decode   │  │  payloads │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductId, Product, StockInfo, CartItem)
//! - [`cart`] - The `Cart` value and its pure transitions
//! - [`error`] - Cart error taxonomy and user-facing messages
//! - [`validation`] - Amount and payload checks
//! - [`snapshot`] - JSON snapshot format used by storage
//!
//! ## Example Usage
//!
//! ```rust
//! use shoecart_core::{Cart, Product, ProductId, StockInfo};
//!
//! let product: Product = serde_json::from_str(
//!     r#"{"id": 1, "title": "Tênis de Caminhada", "price": 179.9}"#,
//! ).unwrap();
//! let stock = StockInfo { id: ProductId(1), amount: 5 };
//!
//! let cart = Cart::new().with_added(&product, &stock).unwrap();
//! assert_eq!(cart.get(ProductId(1)).unwrap().amount, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{CartError, CartResult, Command, GatewayError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot is written under unless configured otherwise.
///
/// Kept identical to the key existing browser builds of the shop use, so a
/// snapshot written by either side is picked up by the other.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
