//! # Sale Ledger
//!
//! Where finalized sales end up. Each sale is stored as a JSON payload next
//! to the fields the reports screen filters on.
//!
//! ## Offline Mode
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SaleBuilder::finalize ──► SaleLedger::record(&CompletedSale)           │
//! │                                 │                                       │
//! │                 available? ─────┼──── no ──► Err(RecordError)           │
//! │                                 │             (sale finalized anyway,   │
//! │                                 │              seller is notified)      │
//! │                                yes                                      │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                    serde_json::to_string(sale)                          │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                    LedgerEntry pushed (receipt number unique)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use tiresaas_core::{CompletedSale, Money, RecordError, SaleSink};

use crate::error::{DataError, DataResult};

/// One recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub sale_id: String,
    pub receipt_number: String,
    pub seller: String,
    pub total: Money,
    pub profit: Money,
    /// Full `CompletedSale` as JSON.
    pub payload: String,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Decodes the stored payload.
    pub fn sale(&self) -> DataResult<CompletedSale> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// In-memory sale ledger. Clones share the same entries and switch.
#[derive(Debug, Clone)]
pub struct SaleLedger {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
    available: Arc<AtomicBool>,
}

impl Default for SaleLedger {
    fn default() -> Self {
        SaleLedger {
            entries: Arc::default(),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl SaleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<LedgerEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches the ledger on or off. While off, every `record` fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        info!(available, "Sale ledger availability changed");
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Stores a sale.
    ///
    /// ## Errors
    /// - `Unavailable` - the ledger is switched off
    /// - `Duplicate` - the receipt number is already recorded
    /// - `Serialization` - the sale could not be encoded
    pub fn insert(&self, sale: &CompletedSale) -> DataResult<LedgerEntry> {
        if !self.is_available() {
            return Err(DataError::Unavailable("Sale ledger".to_string()));
        }

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            receipt_number: sale.receipt_number.clone(),
            seller: sale.seller.clone(),
            total: sale.totals.total,
            profit: sale.totals.profit,
            payload: serde_json::to_string(sale)?,
            recorded_at: Utc::now(),
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|e| e.receipt_number == entry.receipt_number) {
            return Err(DataError::duplicate("receipt number", &entry.receipt_number));
        }

        info!(
            sale_id = %entry.sale_id,
            receipt_number = %entry.receipt_number,
            total = %entry.total,
            "Sale recorded"
        );
        entries.push(entry.clone());
        Ok(entry)
    }

    /// All entries, oldest first.
    pub fn list(&self) -> Vec<LedgerEntry> {
        self.read().clone()
    }

    pub fn get_by_receipt(&self, receipt_number: &str) -> Option<LedgerEntry> {
        self.read()
            .iter()
            .find(|e| e.receipt_number == receipt_number)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Σ total of every recorded sale.
    pub fn revenue(&self) -> Money {
        self.read().iter().map(|e| e.total).sum()
    }

    /// Σ profit of every recorded sale.
    pub fn profit(&self) -> Money {
        self.read().iter().map(|e| e.profit).sum()
    }

    /// Number of sales a seller has closed.
    pub fn count_for_seller(&self, seller: &str) -> usize {
        self.read().iter().filter(|e| e.seller == seller).count()
    }
}

impl SaleSink for SaleLedger {
    fn record(&self, sale: &CompletedSale) -> Result<(), RecordError> {
        self.insert(sale).map(|_| ()).map_err(|err| {
            warn!(sale_id = %sale.id, error = %err, "Sale could not be recorded");
            err.into_record_error(&sale.id)
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
