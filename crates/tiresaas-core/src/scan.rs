//! # Scan History
//!
//! Products found by the barcode scanner during a session, newest first.
//! Scanning a code that is already listed bumps its count and timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// One scanned product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScanEntry {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub count: u32,
    #[ts(as = "String")]
    pub last_scanned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScanHistory {
    entries: Vec<ScanEntry>,
    last_code: Option<String>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan of `product` at `at`.
    ///
    /// ## Returns
    /// How many times the code has been scanned, this scan included.
    pub fn record(&mut self, product: &Product, at: DateTime<Utc>) -> u32 {
        self.last_code = Some(product.code.clone());

        let entry = match self.entries.iter().position(|e| e.code == product.code) {
            Some(index) => {
                let mut entry = self.entries.remove(index);
                entry.count += 1;
                entry.last_scanned_at = at;
                entry
            }
            None => ScanEntry {
                code: product.code.clone(),
                name: product.name.clone(),
                price: product.price(),
                count: 1,
                last_scanned_at: at,
            },
        };

        let count = entry.count;
        self.entries.insert(0, entry);
        count
    }

    /// Entries, most recent scan first.
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_code = None;
    }
}
