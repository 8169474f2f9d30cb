//! # Error Types
//!
//! Domain-specific error types for shoecart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CartError            - Why a cart command did not apply               │
//! │  ├── OutOfStock       - Requested quantity exceeds remote stock        │
//! │  ├── NotFound         - Target item is not in the cart                 │
//! │  ├── Gateway          - Catalog fetch failed (GatewayError)            │
//! │  ├── Storage          - Snapshot could not be written                  │
//! │  ├── Snapshot         - Snapshot could not be encoded/decoded          │
//! │  └── Validation       - Value failed a validation rule                 │
//! │                                                                         │
//! │  GatewayError         - Catalog boundary failures                      │
//! │  ├── Request          - Network / transport                            │
//! │  ├── Status           - Non-success HTTP status (404 = unknown id)     │
//! │  └── MalformedResponse- Payload failed schema checks                   │
//! │                                                                         │
//! │  Flow: CartError ──user_message(Command)──► Notifier ──► toast         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## User-Facing Messages
//! The storefront is Brazilian, so notifications are in Portuguese. Every
//! failure collapses to one message per command except `OutOfStock`, which
//! has its own message regardless of the command.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Notification Messages
// =============================================================================

/// Shown when a requested quantity is not available.
pub const MSG_OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";

/// Shown when adding a product fails for any other reason.
pub const MSG_ADD_FAILED: &str = "Erro na adição do produto";

/// Shown when removing a product fails.
pub const MSG_REMOVE_FAILED: &str = "Erro na remoção do produto";

/// Shown when changing a quantity fails for any other reason.
pub const MSG_UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";

// =============================================================================
// Commands
// =============================================================================

/// The three mutating cart commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl Command {
    /// Generic failure message for this command.
    pub fn failure_message(self) -> &'static str {
        match self {
            Command::AddProduct => MSG_ADD_FAILED,
            Command::RemoveProduct => MSG_REMOVE_FAILED,
            Command::UpdateProductAmount => MSG_UPDATE_FAILED,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::AddProduct => write!(f, "add_product"),
            Command::RemoveProduct => write!(f, "remove_product"),
            Command::UpdateProductAmount => write!(f, "update_product_amount"),
        }
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Why a cart command was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity is not available.
    ///
    /// ## When This Occurs
    /// ```text
    /// add_product(1)          cart: {id 1, amount 2}   stock: 2
    ///      │
    ///      ▼
    /// 2 + 1 > 2 ──► OutOfStock { product_id: 1, requested: 3, available: 2 }
    ///      │
    ///      ▼
    /// toast: "Quantidade solicitada fora de estoque"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Product is not in the cart.
    #[error("Product {0} not in cart")]
    NotFound(ProductId),

    /// Catalog gateway call failed.
    #[error("Catalog request failed: {0}")]
    Gateway(#[from] GatewayError),

    /// Snapshot could not be written to storage.
    #[error("Storage write failed: {0}")]
    Storage(String),

    /// Snapshot could not be encoded or decoded.
    #[error("Invalid cart snapshot: {0}")]
    Snapshot(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CartError {
    /// Message shown to the user when `command` fails with this error.
    pub fn user_message(&self, command: Command) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => MSG_OUT_OF_STOCK,
            _ => command.failure_message(),
        }
    }

    /// Returns true for stock rejections.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Snapshot(err.to_string())
    }
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Failures at the catalog boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Request never produced a response (DNS, connect, reset...).
    #[error("Request failed: {0}")]
    Request(String),

    /// Server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Returns true when the catalog does not know the requested id.
    pub fn is_unknown_id(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input and payload validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: i64 },

    /// Duplicate value (e.g., duplicate product id in a snapshot).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Payload refers to a different entity than requested.
    #[error("{field} mismatch: expected {expected}, got {actual}")]
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
