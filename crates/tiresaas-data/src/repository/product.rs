//! # Product Repository
//!
//! The tire catalog, held in memory.
//!
//! ## Lookup Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Scan Becomes a Product                         │
//! │                                                                         │
//! │  Scanner reads: "7891234567890"                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_by_code ── exact match on the barcode                            │
//! │       │ miss                                                            │
//! │       ▼                                                                 │
//! │  find_by_name ── case-insensitive substring, catalog order             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(Product) / None                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};
use uuid::Uuid;

use tiresaas_core::validation::{validate_product_code, validate_required_text, validate_unit_amount};
use tiresaas_core::{Product, ProductCatalog};

use crate::error::{DataError, DataResult};

/// Repository for catalog products.
///
/// Clones share the same underlying catalog.
///
/// ## Usage
/// ```rust
/// use tiresaas_core::ProductCatalog;
/// use tiresaas_data::seed::sample_products;
/// use tiresaas_data::ProductRepository;
///
/// let repo = ProductRepository::with_products(sample_products());
/// assert!(repo.find_by_code("7891234567890").is_some());
/// assert_eq!(repo.find_by_name("continental").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl ProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        ProductRepository {
            products: Arc::new(RwLock::new(products)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<Product> {
        self.read().clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.read().iter().find(|p| p.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Adds a product. A blank id is replaced with a fresh UUID.
    ///
    /// ## Errors
    /// - `Validation` - bad code, blank name, negative price or cost
    /// - `Duplicate` - another product has the same code
    pub fn insert(&self, mut product: Product) -> DataResult<Product> {
        validate(&product)?;
        product.code = product.code.trim().to_string();
        if product.id.trim().is_empty() {
            product.id = Uuid::new_v4().to_string();
        }

        let mut products = self.write();
        if products.iter().any(|p| p.code == product.code) {
            return Err(DataError::duplicate("code", &product.code));
        }

        debug!(id = %product.id, code = %product.code, "Inserting product");
        products.push(product.clone());
        Ok(product)
    }

    pub fn update(&self, product: Product) -> DataResult<()> {
        validate(&product)?;

        let mut products = self.write();
        if products
            .iter()
            .any(|p| p.code == product.code.trim() && p.id != product.id)
        {
            return Err(DataError::duplicate("code", product.code.trim()));
        }

        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| DataError::not_found("Product", &product.id))?;

        debug!(id = %product.id, "Updating product");
        *slot = product;
        Ok(())
    }

    /// Adjusts stock by `delta` (negative when tires leave the store).
    ///
    /// ## Returns
    /// The new stock level.
    pub fn adjust_stock(&self, code: &str, delta: i64) -> DataResult<i64> {
        let mut products = self.write();
        let product = products
            .iter_mut()
            .find(|p| p.code == code)
            .ok_or_else(|| DataError::not_found("Product", code))?;

        product.stock += delta;
        if product.stock < 0 {
            warn!(code = %code, delta, stock = product.stock, "Stock went negative");
        } else {
            debug!(code = %code, delta, stock = product.stock, "Adjusted stock");
        }
        Ok(product.stock)
    }
}

fn validate(product: &Product) -> DataResult<()> {
    validate_product_code(&product.code)?;
    validate_required_text("name", &product.name, 200)?;
    validate_unit_amount("price", product.price())?;
    validate_unit_amount("cost", product.cost())?;
    Ok(())
}

impl ProductCatalog for ProductRepository {
    fn find_by_code(&self, code: &str) -> Option<Product> {
        let code = code.trim();
        let found = self.read().iter().find(|p| p.code == code).cloned();
        debug!(code = %code, found = found.is_some(), "Product lookup by code");
        found
    }

    fn find_by_name(&self, fragment: &str) -> Vec<Product> {
        let fragment = fragment.trim().to_lowercase();
        if fragment.is_empty() {
            return Vec::new();
        }

        let matches: Vec<Product> = self
            .read()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&fragment))
            .cloned()
            .collect();
        debug!(query = %fragment, count = matches.len(), "Product search by name");
        matches
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
