//! # Collaborator Traits
//!
//! The two boundaries the sale builder talks through. Implementations live
//! outside this crate (`tiresaas-data` provides in-memory ones).
//!
//! ```text
//! ┌──────────────────┐  find_by_code / find_by_name   ┌──────────────────┐
//! │   SaleBuilder    │ ─────────────────────────────► │  ProductCatalog  │
//! │                  │                                 └──────────────────┘
//! │                  │  record(&CompletedSale)        ┌──────────────────┐
//! │                  │ ─────────────────────────────► │    SaleSink      │
//! └──────────────────┘   exactly once per finalize    └──────────────────┘
//! ```

use crate::error::RecordError;
use crate::sale::CompletedSale;
use crate::types::Product;

/// Read-only product lookup.
pub trait ProductCatalog: Send + Sync {
    /// Exact match on the product code. A miss is `None`, not an error.
    fn find_by_code(&self, code: &str) -> Option<Product>;

    /// Case-insensitive substring match on the product name, in catalog order.
    fn find_by_name(&self, fragment: &str) -> Vec<Product>;

    /// Resolves scanner or keyboard input: code first, then the first name
    /// containing the input.
    fn lookup(&self, input: &str) -> Option<Product> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.find_by_code(input)
            .or_else(|| self.find_by_name(input).into_iter().next())
    }
}

/// Receives finalized sales.
pub trait SaleSink: Send + Sync {
    /// Stores one finalized sale.
    fn record(&self, sale: &CompletedSale) -> Result<(), RecordError>;
}
