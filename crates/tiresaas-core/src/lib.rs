//! # tiresaas-core: Pure Business Logic for TireSaaS
//!
//! Everything the sales screen computes lives here as pure functions over
//! plain data. Storage, devices and logging belong to the outer crates.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TireSaaS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tiresaas-app                                 │   │
//! │  │    AppState ──► SalesScreen ──► Notifier ──► Devices            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tiresaas-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   sale    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │SaleBuilder│  │   rules   │  │   │
//! │  │   │   Store   │  │  Margin   │  │ LineItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │  ranking  │  │   scan    │  │   ports   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO LOGGING • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ implements ports                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tiresaas-data                                │   │
//! │  │          in-memory catalog, sale ledger, stores, users          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Store, User, PaymentMethod, Margin)
//! - [`money`] - Money type with integer arithmetic
//! - [`sale`] - Sale Builder: line items, totals, finalize
//! - [`ports`] - Catalog and sale sink traits
//! - [`ranking`] - Store and seller leaderboards
//! - [`scan`] - Scan history
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tiresaas_core::money::Money;
//! use tiresaas_core::types::Margin;
//!
//! let total = Money::from_cents(75000);
//! let cost = Money::from_cents(54000);
//!
//! let margin = Margin::of(total - cost, total);
//! assert_eq!(margin.bps(), 2800);
//! assert_eq!(total.to_string(), "R$ 750.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod ports;
pub mod ranking;
pub mod sale;
pub mod scan;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, RecordError, ValidationError};
pub use money::Money;
pub use ports::{ProductCatalog, SaleSink};
pub use sale::{
    compute_totals, CompletedSale, DraftSale, DraftState, FinalizedSale, LineItem,
    LineSelection, LotPolicy, SaleBuilder, SaleTotals,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines in a single draft sale.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity on a single line, merges included.
///
/// Catches typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price or unit cost accepted, in centavos (R$ 1,000,000.00).
///
/// Keeps every line and sale total well inside `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Highest amount a whole sale can reach, in centavos.
pub const MAX_SALE_AMOUNT_CENTS: i64 =
    MAX_UNIT_PRICE_CENTS * MAX_ITEM_QUANTITY * MAX_SALE_LINES as i64;
