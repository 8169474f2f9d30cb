//! # shoecart-store: Cart State Manager
//!
//! Holds the in-memory cart, validates every change against remote stock,
//! writes each committed cart through to local storage and publishes it to
//! subscribers.
//!
//! ## Module Organization
//! ```text
//! shoecart_store/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── store.rs        ◄─── CartStore: add / remove / update / subscribe
//! ├── gateway.rs      ◄─── CatalogGateway trait
//! ├── http.rs         ◄─── HttpCatalogGateway (reqwest)
//! ├── notifier.rs     ◄─── Notifier trait + tracing/channel notifiers
//! ├── storage.rs      ◄─── Storage trait + memory/file storage
//! ├── config.rs       ◄─── CartConfig (TOML + env)
//! ├── telemetry.rs    ◄─── tracing-subscriber setup
//! └── error.rs        ◄─── StorageError, ConfigError, StoreError
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CartConfig::load ──► CartStore::open(config, notifier)               │
//! │                              │                                          │
//! │            ┌─────────────────┼──────────────────┐                       │
//! │            ▼                 ▼                  ▼                       │
//! │   HttpCatalogGateway    FileStorage       Arc<dyn Notifier>             │
//! │   (products, stock)     (snapshot)        (toasts)                      │
//! │                                                                         │
//! │   Tests inject their own gateway/storage/notifier via CartStore::new.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use shoecart_store::{CartConfig, CartStore, TracingNotifier};
//! use shoecart_core::ProductId;
//!
//! # async fn run() -> Result<(), shoecart_store::StoreError> {
//! let config = CartConfig::load_or_default(None);
//! let store = CartStore::open(&config, Arc::new(TracingNotifier))?;
//!
//! let mut updates = store.subscribe();
//! store.add_product(ProductId(1)).await;
//! updates.changed().await.ok();
//! println!("{} items", updates.borrow().len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod notifier;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use config::CartConfig;
pub use error::{ConfigError, StorageError, StoreError};
pub use gateway::CatalogGateway;
pub use http::HttpCatalogGateway;
pub use notifier::{ChannelNotifier, Notifier, TracingNotifier};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CartStore, CommandOutcome};
pub use telemetry::init_tracing;
