//! # Repository Module
//!
//! In-memory repository implementations for TireSaaS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SalesScreen                                                           │
//! │       │                                                                 │
//! │       │  store.products().lookup("7891234567890")                      │
//! │       ▼                                                                 │
//! │  ProductRepository ──── implements ProductCatalog                      │
//! │  SaleLedger ─────────── implements SaleSink                            │
//! │  StoreRepository, UserRepository                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<RwLock<Vec<T>>> ── shared by every clone of the repository        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog lookups and edits
//! - [`SaleLedger`](sale::SaleLedger) - Finalized sales as JSON payloads
//! - [`StoreRepository`](store::StoreRepository) - Store records
//! - [`UserRepository`](user::UserRepository) - Staff records and points

pub mod product;
pub mod sale;
pub mod store;
pub mod user;
