//! # Cart Store
//!
//! Owns the cart, runs the three cart commands, writes every committed cart
//! to storage and publishes it to subscribers.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Commands                                  │
//! │                                                                         │
//! │  add_product(id)              update_product_amount({id, n})            │
//! │       │                              │                                  │
//! │       │                              ├── n <= 0 ──────────► Ignored     │
//! │       ▼                              ▼                                  │
//! │  product + stock ◄─ try_join    get_stock(id)                           │
//! │       │                              │                                  │
//! │       ├── gateway error ─────────────┴──────► notify ─► Rejected        │
//! │       ▼                              ▼                                  │
//! │  ┌──────────────────── cart lock ─────────────────────────────────┐    │
//! │  │  transition(current) ──► OutOfStock / NotFound ──► notify      │    │
//! │  │        │             ──► nothing to do ──────────► Ignored     │    │
//! │  │        ▼                                                        │    │
//! │  │  encode ──► storage.write ──► swap cart ──► publish ─► Applied  │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  remove_product(id) goes straight to the locked section (no fetch).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Catalog calls run without the lock. The stock check and the commit run
//! together under it, against whatever cart is current at that moment, so
//! two overlapping `add_product(1)` calls both land (amount + 2) instead of
//! the second overwriting the first. The stock value itself is only as fresh
//! as the fetch; nothing is reserved remotely.
//!
//! ## Failure Handling
//! Commands never return errors. Every rejection is converted into exactly
//! one notification and reported back as `CommandOutcome::Rejected`, with the
//! cart and the stored snapshot left as they were.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shoecart_core::validation::validate_amount;
use shoecart_core::{
    snapshot, Cart, CartError, CartResult, Command, ProductId, UpdateProductAmount,
};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::config::CartConfig;
use crate::error::StoreError;
use crate::gateway::CatalogGateway;
use crate::http::HttpCatalogGateway;
use crate::notifier::Notifier;
use crate::storage::{FileStorage, Storage};

// =============================================================================
// Command Outcome
// =============================================================================

/// What a cart command did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Cart changed, was persisted and published.
    Applied,

    /// Request was a no-op (non-positive amount, or item not in cart for an
    /// update). Nothing was notified.
    Ignored,

    /// Request failed. The user has already been notified.
    Rejected(CartError),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, CommandOutcome::Ignored)
    }

    /// Returns the rejection reason, if any.
    pub fn error(&self) -> Option<&CartError> {
        match self {
            CommandOutcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The cart state manager handed to presentation components.
pub struct CartStore {
    gateway: Arc<dyn CatalogGateway>,
    notifier: Arc<dyn Notifier>,
    storage: Arc<dyn Storage>,
    storage_key: String,
    cart: Mutex<Cart>,
    published: watch::Sender<Cart>,
}

impl CartStore {
    /// Creates the store and restores the cart from storage.
    ///
    /// A missing snapshot, a storage read error and an unparseable snapshot
    /// all start the store with an empty cart.
    pub fn new(
        gateway: Arc<dyn CatalogGateway>,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn Storage>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = restore(storage.as_ref(), &storage_key);
        let (published, _) = watch::channel(cart.clone());

        CartStore {
            gateway,
            notifier,
            storage,
            storage_key,
            cart: Mutex::new(cart),
            published,
        }
    }

    /// Builds a store from configuration: HTTP catalog and file storage.
    pub fn open(config: &CartConfig, notifier: Arc<dyn Notifier>) -> Result<Self, StoreError> {
        config.validate()?;

        let gateway = HttpCatalogGateway::new(config.catalog.url()?)?;
        let storage = match &config.storage.data_dir {
            Some(dir) => FileStorage::new(dir)?,
            None => FileStorage::in_default_location()?,
        };

        info!(
            catalog = %gateway.base_url(),
            data_dir = ?storage.dir(),
            "Opening cart store"
        );

        Ok(Self::new(
            Arc::new(gateway),
            notifier,
            Arc::new(storage),
            config.storage.key.clone(),
        ))
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Returns the current cart.
    pub fn cart(&self) -> Cart {
        self.lock_cart().clone()
    }

    /// Subscribes to cart replacements.
    ///
    /// The receiver starts at the current cart and sees every committed
    /// cart after that.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.published.subscribe()
    }

    /// Storage key the snapshot is written under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Adds one unit of a product, or the product itself with amount 1.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> CommandOutcome {
        debug!("add_product command");
        let result = self.try_add(product_id).await;
        self.finish(Command::AddProduct, result)
    }

    /// Removes a product from the cart.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&self, product_id: ProductId) -> CommandOutcome {
        debug!("remove_product command");
        let result = self.commit(|cart| cart.without(product_id).map(Some));
        self.finish(Command::RemoveProduct, result)
    }

    /// Sets the quantity of a product already in the cart.
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CommandOutcome {
        debug!("update_product_amount command");

        if validate_amount(request.amount).is_err() {
            debug!("Non-positive amount, ignoring");
            return CommandOutcome::Ignored;
        }

        let result = self.try_update(request).await;
        self.finish(Command::UpdateProductAmount, result)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn try_add(&self, product_id: ProductId) -> CartResult<Option<Cart>> {
        let (product, stock) = tokio::try_join!(
            self.gateway.get_product(product_id),
            self.gateway.get_stock(product_id),
        )?;

        debug!(
            title = product.attribute_str("title").unwrap_or_default(),
            stock = stock.amount,
            "Catalog data fetched"
        );

        self.commit(|cart| cart.with_added(&product, &stock).map(Some))
    }

    async fn try_update(&self, request: UpdateProductAmount) -> CartResult<Option<Cart>> {
        let UpdateProductAmount { product_id, amount } = request;
        let stock = self.gateway.get_stock(product_id).await?;

        self.commit(|cart| cart.with_amount(product_id, amount, &stock))
    }

    /// Applies a transition to the current cart and commits the result.
    ///
    /// The snapshot is written before the in-memory cart is replaced; if the
    /// write fails, neither changes.
    fn commit<F>(&self, transition: F) -> CartResult<Option<Cart>>
    where
        F: FnOnce(&Cart) -> CartResult<Option<Cart>>,
    {
        let mut current = self.lock_cart();

        let Some(next) = transition(&current)? else {
            return Ok(None);
        };

        let encoded = snapshot::encode(&next)?;
        self.storage
            .write(&self.storage_key, &encoded)
            .map_err(|e| CartError::Storage(e.to_string()))?;

        *current = next.clone();
        self.published.send_replace(next.clone());

        Ok(Some(next))
    }

    /// Turns a command result into an outcome, notifying on failure.
    fn finish(&self, command: Command, result: CartResult<Option<Cart>>) -> CommandOutcome {
        match result {
            Ok(Some(cart)) => {
                info!(
                    %command,
                    items = cart.len(),
                    quantity = cart.total_quantity(),
                    "Cart updated"
                );
                CommandOutcome::Applied
            }
            Ok(None) => {
                debug!(%command, "Nothing to change");
                CommandOutcome::Ignored
            }
            Err(err) => {
                match &err {
                    CartError::OutOfStock { .. } | CartError::NotFound(_) => {
                        warn!(%command, error = %err, "Cart command rejected");
                    }
                    CartError::Gateway(gateway) if gateway.is_unknown_id() => {
                        warn!(%command, error = %err, "Product unknown to catalog");
                    }
                    _ => {
                        error!(%command, error = %err, "Cart command failed");
                    }
                }

                self.notifier.notify(err.user_message(command));
                CommandOutcome::Rejected(err)
            }
        }
    }

    fn lock_cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("cart", &*self.lock_cart())
            .finish_non_exhaustive()
    }
}

/// Reads the snapshot under `key`, falling back to an empty cart.
fn restore(storage: &dyn Storage, key: &str) -> Cart {
    let raw = match storage.read(key) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "Could not read cart snapshot, starting empty");
            return Cart::new();
        }
    };

    let Some(raw) = raw else {
        debug!(key, "No cart snapshot, starting empty");
        return Cart::new();
    };

    match snapshot::decode(&raw) {
        Ok(cart) => {
            info!(key, items = cart.len(), "Cart restored from storage");
            cart
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding invalid cart snapshot");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use shoecart_core::{GatewayError, Product, StockInfo};

    struct UnreachableCatalog;

    #[async_trait]
    impl CatalogGateway for UnreachableCatalog {
        async fn get_product(&self, _id: ProductId) -> Result<Product, GatewayError> {
            Err(GatewayError::Request("connection refused".into()))
        }

        async fn get_stock(&self, _id: ProductId) -> Result<StockInfo, GatewayError> {
            Err(GatewayError::Request("connection refused".into()))
        }
    }

    struct Silent;

    impl Notifier for Silent {
        fn notify(&self, _message: &str) {}
    }

    fn store_with(storage: MemoryStorage) -> CartStore {
        CartStore::new(
            Arc::new(UnreachableCatalog),
            Arc::new(Silent),
            Arc::new(storage),
            "cart",
        )
    }

    #[test]
    fn test_restore_valid_snapshot() {
        let storage = MemoryStorage::with_entry("cart", r#"[{"id":2,"amount":1,"title":"Tênis"}]"#);
        let store = store_with(storage);

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.subscribe().borrow().len(), 1);
    }

    #[test]
    fn test_restore_missing_or_malformed_is_empty() {
        assert!(store_with(MemoryStorage::new()).cart().is_empty());
        assert!(store_with(MemoryStorage::with_entry("cart", "{oops")).cart().is_empty());
        assert!(store_with(MemoryStorage::with_entry("cart", r#"[{"id":1,"amount":-1}]"#))
            .cart()
            .is_empty());
    }

    #[test]
    fn test_remove_does_not_touch_catalog() {
        let storage = MemoryStorage::with_entry("cart", r#"[{"id":2,"amount":1}]"#);
        let store = store_with(storage.clone());

        assert!(store.remove_product(ProductId(2)).is_applied());
        assert!(store.cart().is_empty());
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_update_guard_skips_catalog() {
        let storage = MemoryStorage::with_entry("cart", r#"[{"id":3,"amount":1}]"#);
        let store = store_with(storage);

        // Catalog is unreachable, so reaching it would be a rejection
        let outcome = store.update_product_amount(UpdateProductAmount::new(ProductId(3), 0)).await;
        assert!(outcome.is_ignored());
    }
}
