//! # Domain Types
//!
//! Core domain types used throughout TireSaaS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Store       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (EAN)     │   │  name           │   │  name, email    │       │
//! │  │  price_cents    │   │  manager        │   │  role, status   │       │
//! │  │  lots[]         │   │  status         │   │  points         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Margin      │   │   SaleStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (i64)      │   │  Draft          │   │  Cash, Card     │       │
//! │  │  2800 = 28.00%  │   │  Completed      │   │  Pix            │       │
//! │  └─────────────────┘   └─────────────────┘   │  Installments   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID: (product code, receipt number, email) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Margin
// =============================================================================

/// Profit margin in basis points (bps).
///
/// 1 basis point = 0.01%, so 2800 bps = 28.00%.
/// Margins can be negative when a sale is below cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Margin(i64);

impl Margin {
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Margin(bps)
    }

    /// Margin of `profit` over `total`; zero when `total` is not positive.
    pub fn of(profit: Money, total: Money) -> Self {
        Margin(profit.ratio_bps(total))
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the margin as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Margin(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13) - the code a scanner reads.
    pub code: String,

    /// Display name shown to the seller and on the sale record.
    pub name: String,

    pub brand: String,

    /// Catalog grouping, e.g. "Pneu Aro 15".
    pub category: String,

    /// Price in centavos.
    pub price_cents: i64,

    /// Cost in centavos (for profit margin calculations).
    pub cost_cents: i64,

    /// Units in stock.
    pub stock: i64,

    /// Lot identifiers currently on hand for this product.
    pub lots: Vec<String>,

    /// Whether every sale of this product must name a lot.
    pub lot_tracked: bool,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks whether `lot` is one of this product's known lots.
    ///
    /// Products without any registered lots accept any lot identifier.
    pub fn has_lot(&self, lot: &str) -> bool {
        self.lots.is_empty() || self.lots.iter().any(|l| l == lot)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale is in progress (items being added).
    #[default]
    Draft,
    /// Sale has been finalized and handed to the ledger.
    Completed,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on the store terminal.
    Card,
    /// Instant bank transfer.
    Pix,
    /// Paid over several installments.
    Installments,
}

impl PaymentMethod {
    /// All methods in the order the screen lists them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Pix,
        PaymentMethod::Installments,
    ];

    /// Stable identifier used by forms and config files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Installments => "installments",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "card" | "cartao" | "cartão" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "pix" => Ok(PaymentMethod::Pix),
            "installments" | "parcelado" => Ok(PaymentMethod::Installments),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Operating status of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

/// A physical store in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Name of the person responsible for the store.
    pub manager: String,
    pub employees: u32,
    /// Tire units across all products in this store.
    pub stock_units: i64,
    /// Sales this month in centavos.
    pub monthly_sales_cents: i64,
    pub status: StoreStatus,
    #[ts(as = "String")]
    pub opened_on: NaiveDate,
}

// =============================================================================
// User
// =============================================================================

/// Access profile of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    Seller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    /// Store the user works at; owners may have none.
    pub store_id: Option<String>,
    pub status: UserStatus,
    /// Sales closed this month.
    pub monthly_sales: u32,
    /// Gamification points.
    pub points: i64,
    #[ts(as = "String")]
    pub joined_on: NaiveDate,
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user can be picked as the seller on a sale.
    pub fn can_sell(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
