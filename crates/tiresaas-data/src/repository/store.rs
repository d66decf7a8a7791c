//! # Store Repository
//!
//! Store records for the store management screen.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use tiresaas_core::validation::{validate_email, validate_required_text};
use tiresaas_core::{Store, StoreStatus};

use crate::error::{DataError, DataResult};

/// Fields the "new store" form collects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub manager: String,
}

/// In-memory store records. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct StoreRepository {
    stores: Arc<RwLock<Vec<Store>>>,
}

impl StoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(stores: Vec<Store>) -> Self {
        StoreRepository {
            stores: Arc::new(RwLock::new(stores)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Store>> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Store>> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<Store> {
        self.read().clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Store> {
        self.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn active(&self) -> Vec<Store> {
        self.read()
            .iter()
            .filter(|s| s.status == StoreStatus::Active)
            .cloned()
            .collect()
    }

    /// Creates an active store opened today.
    ///
    /// ## Errors
    /// - `Validation` - blank name, address or manager, or a bad email
    /// - `Duplicate` - a store with the same name exists
    pub fn create(&self, form: NewStore) -> DataResult<Store> {
        let name = validate_required_text("name", &form.name, 100)?;
        let address = validate_required_text("address", &form.address, 200)?;
        let manager = validate_required_text("manager", &form.manager, 100)?;
        validate_email(&form.email)?;

        let mut stores = self.write();
        if stores.iter().any(|s| s.name.eq_ignore_ascii_case(&name)) {
            return Err(DataError::duplicate("name", name));
        }

        let store = Store {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            manager,
            employees: 0,
            stock_units: 0,
            monthly_sales_cents: 0,
            status: StoreStatus::Active,
            opened_on: Utc::now().date_naive(),
        };

        debug!(id = %store.id, name = %store.name, "Creating store");
        stores.push(store.clone());
        Ok(store)
    }

    /// Replaces the editable fields of an existing store.
    pub fn update(&self, id: &str, form: NewStore) -> DataResult<Store> {
        let name = validate_required_text("name", &form.name, 100)?;
        let address = validate_required_text("address", &form.address, 200)?;
        let manager = validate_required_text("manager", &form.manager, 100)?;
        validate_email(&form.email)?;

        let mut stores = self.write();
        if stores
            .iter()
            .any(|s| s.id != id && s.name.eq_ignore_ascii_case(&name))
        {
            return Err(DataError::duplicate("name", name));
        }

        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DataError::not_found("Store", id))?;

        store.name = name;
        store.address = address;
        store.phone = form.phone.trim().to_string();
        store.email = form.email.trim().to_string();
        store.manager = manager;

        debug!(id = %id, "Updated store");
        Ok(store.clone())
    }

    pub fn set_status(&self, id: &str, status: StoreStatus) -> DataResult<()> {
        let mut stores = self.write();
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DataError::not_found("Store", id))?;

        debug!(id = %id, ?status, "Store status changed");
        store.status = status;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> DataResult<()> {
        let mut stores = self.write();
        let before = stores.len();
        stores.retain(|s| s.id != id);

        if stores.len() == before {
            return Err(DataError::not_found("Store", id));
        }

        debug!(id = %id, "Deleted store");
        Ok(())
    }
}
