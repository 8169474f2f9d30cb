//! # Catalog Gateway
//!
//! The store's view of the remote catalog: product details and stock level
//! by product id.
//!
//! ```text
//! ┌──────────────┐   get_product(id)   ┌──────────────────────────────────┐
//! │              │ ──────────────────► │                                  │
//! │  CartStore   │                     │  CatalogGateway                  │
//! │              │   get_stock(id)     │  (HttpCatalogGateway in prod,    │
//! │              │ ──────────────────► │   in-memory fakes in tests)      │
//! └──────────────┘                     └──────────────────────────────────┘
//! ```
//!
//! Implementations must return payloads that describe the requested id;
//! anything else is a `GatewayError::MalformedResponse`.

use async_trait::async_trait;
use shoecart_core::{GatewayError, Product, ProductId, StockInfo};

/// Remote source of product details and stock levels.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetches product details. Unknown ids fail.
    async fn get_product(&self, id: ProductId) -> Result<Product, GatewayError>;

    /// Fetches the available quantity. Unknown ids fail.
    async fn get_stock(&self, id: ProductId) -> Result<StockInfo, GatewayError>;
}
