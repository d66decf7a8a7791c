//! # tiresaas-data: Repository Layer for TireSaaS
//!
//! In-memory implementations of the collaborators the Sale Builder talks to,
//! plus the store and user records behind the management screens.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tiresaas-app (SalesScreen, App)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  tiresaas-data (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  DataStore    │    │ Repositories  │    │    seed      │  │   │
//! │  │   │  (lib.rs)     │───►│ Product, Sale │◄───│ sample tires │  │   │
//! │  │   │               │    │ Store, User   │    │ stores, staff│  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tiresaas-core traits: ProductCatalog, SaleSink                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tiresaas_core::ProductCatalog;
//! use tiresaas_data::DataStore;
//!
//! let store = DataStore::seeded();
//! let tire = store.products().find_by_code("7891234567890").unwrap();
//! assert_eq!(tire.brand, "Michelin");
//! assert!(store.sales().is_available());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DataError, DataResult};
pub use repository::product::ProductRepository;
pub use repository::sale::{LedgerEntry, SaleLedger};
pub use repository::store::{NewStore, StoreRepository};
pub use repository::user::UserRepository;

use tiresaas_core::ranking::StoreMetrics;
use tracing::info;

/// Entry point to every repository.
///
/// Repositories are handed out as clones that share state, the way a
/// connection pool hands out connections.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    products: ProductRepository,
    sales: SaleLedger,
    stores: StoreRepository,
    users: UserRepository,
    metrics: Vec<StoreMetrics>,
}

impl DataStore {
    /// Empty repositories and an available ledger.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Repositories filled with the [`seed`] records.
    pub fn seeded() -> Self {
        let store = DataStore {
            products: ProductRepository::with_products(seed::sample_products()),
            sales: SaleLedger::new(),
            stores: StoreRepository::with_stores(seed::sample_stores()),
            users: UserRepository::with_users(seed::sample_users()),
            metrics: seed::sample_store_metrics(),
        };

        info!(
            products = store.products.count(),
            stores = store.stores.list().len(),
            users = store.users.list().len(),
            "Seeded in-memory data store"
        );
        store
    }

    pub fn products(&self) -> ProductRepository {
        self.products.clone()
    }

    pub fn sales(&self) -> SaleLedger {
        self.sales.clone()
    }

    pub fn stores(&self) -> StoreRepository {
        self.stores.clone()
    }

    pub fn users(&self) -> UserRepository {
        self.users.clone()
    }

    /// Period figures for the store leaderboard.
    pub fn store_metrics(&self) -> &[StoreMetrics] {
        &self.metrics
    }
}
