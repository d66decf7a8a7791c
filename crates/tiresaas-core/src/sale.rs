//! # Sale Builder
//!
//! Assembles a draft sale line by line and turns it into a completed sale.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Draft State Machine                               │
//! │                                                                         │
//! │            add_line_item                    add / remove                │
//! │   ┌───────┐ ─────────────► ┌──────────┐ ◄───────────────┐              │
//! │   │ Empty │                │ Building │ ────────────────┘              │
//! │   └───────┘ ◄───────────── └──────────┘                                 │
//! │       ▲     last line removed    │                                      │
//! │       │                          │ finalize (valid)                     │
//! │       │                          ▼                                      │
//! │       │                    ┌───────────┐                                │
//! │       └─────── reset ───── │ Finalized │ ──► SaleSink::record (once)    │
//! │                            └───────────┘                                │
//! │                                                                         │
//! │  A failed add or finalize leaves the draft exactly as it was.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Math
//! ```text
//! gross    = quantity × unit_price
//! subtotal = gross − line discount
//! cost     = quantity × unit_cost
//! profit   = subtotal − cost
//!
//! total    = Σ subtotal − overall discount
//! profit   = total − Σ cost
//! margin   = profit / total   (0 when total ≤ 0)
//! ```
//!
//! ## Example
//! ```rust
//! use tiresaas_core::money::Money;
//! use tiresaas_core::sale::{LineSelection, SaleBuilder};
//!
//! let mut builder = SaleBuilder::new();
//! let tire = LineSelection::new("7891234567890", "Pneu Michelin Energy XM2", 2, Money::from_cents(25000))
//!     .with_cost(Money::from_cents(18000));
//!
//! builder.add_line_item(tire.clone()).unwrap();
//! builder.add_line_item(tire.with_quantity(1)).unwrap();
//!
//! let totals = builder.totals();
//! assert_eq!(builder.draft().lines().len(), 1);
//! assert_eq!(totals.subtotal.cents(), 75000);
//! assert_eq!(totals.profit.cents(), 21000);
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, RecordError, ValidationError};
use crate::money::Money;
use crate::ports::{ProductCatalog, SaleSink};
use crate::types::{Margin, PaymentMethod, Product, SaleStatus};
use crate::validation::{
    normalize_lot, validate_amount, validate_discount, validate_line_count,
    validate_product_code, validate_quantity, validate_required_text, validate_unit_amount,
};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_AMOUNT_CENTS};

const MAX_BUYER_NAME: usize = 120;

// =============================================================================
// Lot Policy
// =============================================================================

/// Decides when a line must name a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LotPolicy {
    /// A switch on the sale turns lot entry on for every line.
    #[default]
    PerSale,
    /// Each product's `lot_tracked` flag decides.
    PerProduct,
}

impl std::fmt::Display for LotPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotPolicy::PerSale => write!(f, "per_sale"),
            LotPolicy::PerProduct => write!(f, "per_product"),
        }
    }
}

impl std::str::FromStr for LotPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_sale" | "sale" => Ok(LotPolicy::PerSale),
            "per_product" | "product" => Ok(LotPolicy::PerProduct),
            _ => Err(ValidationError::NotAllowed {
                field: "lot policy".to_string(),
                allowed: vec!["per_sale".to_string(), "per_product".to_string()],
            }),
        }
    }
}

/// Observable state of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Empty,
    Building,
}

// =============================================================================
// Line Selection
// =============================================================================

/// What the seller picked in the "add product" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineSelection {
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub unit_cost: Money,
    pub discount: Money,
    pub lot_id: Option<String>,
    /// Copied from the product; only consulted under [`LotPolicy::PerProduct`].
    pub lot_tracked: bool,
}

impl LineSelection {
    pub fn new(
        product_code: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        LineSelection {
            product_code: product_code.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            unit_cost: Money::zero(),
            discount: Money::zero(),
            lot_id: None,
            lot_tracked: false,
        }
    }

    /// Prefills price, cost and lot tracking from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineSelection {
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price(),
            unit_cost: product.cost(),
            discount: Money::zero(),
            lot_id: None,
            lot_tracked: product.lot_tracked,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_cost(mut self, unit_cost: Money) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_lot(mut self, lot_id: impl Into<String>) -> Self {
        self.lot_id = Some(lot_id.into());
        self
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in a draft sale.
///
/// Name, price and cost are frozen when the line is created, so later
/// catalog edits never change a sale in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub product_code: String,
    pub product_name: String,
    pub lot_id: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub unit_cost: Money,
    pub discount: Money,
}

impl LineItem {
    /// quantity × unit price, before the line discount.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.gross() - self.discount
    }

    #[inline]
    pub fn cost(&self) -> Money {
        self.unit_cost.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        self.subtotal() - self.cost()
    }

    pub fn margin(&self) -> Margin {
        Margin::of(self.profit(), self.subtotal())
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate figures for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTotals {
    pub line_count: usize,
    /// Units across all lines.
    pub quantity: i64,
    /// Σ line subtotals (line discounts already applied).
    pub subtotal: Money,
    /// Overall discount on the sale.
    pub discount: Money,
    /// subtotal − overall discount.
    pub total: Money,
    /// Σ quantity × unit cost.
    pub cost: Money,
    /// total − cost.
    pub profit: Money,
    pub margin: Margin,
}

impl SaleTotals {
    /// True for an empty draft with no overall discount.
    pub fn is_zero(&self) -> bool {
        *self == SaleTotals::default()
    }
}

/// Computes the totals of a draft from scratch.
///
/// Pure and cheap; callers recompute after every mutation instead of caching.
pub fn compute_totals(draft: &DraftSale) -> SaleTotals {
    let subtotal: Money = draft.lines.iter().map(LineItem::subtotal).sum();
    let cost: Money = draft.lines.iter().map(LineItem::cost).sum();
    let total = subtotal - draft.discount;
    let profit = total - cost;

    SaleTotals {
        line_count: draft.lines.len(),
        quantity: draft.lines.iter().map(|l| l.quantity).sum(),
        subtotal,
        discount: draft.discount,
        total,
        cost,
        profit,
        margin: Margin::of(profit, total),
    }
}

// =============================================================================
// Draft Sale
// =============================================================================

/// The in-progress, unsaved sale.
///
/// Mutated only through [`SaleBuilder`], which enforces the line invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftSale {
    lines: Vec<LineItem>,
    buyer: String,
    seller: Option<String>,
    payment_method: Option<PaymentMethod>,
    discount: Money,
    notes: String,
    #[ts(as = "String")]
    sale_date: NaiveDate,
}

impl DraftSale {
    /// Creates an empty draft dated today.
    pub fn new() -> Self {
        DraftSale {
            lines: Vec::new(),
            buyer: String::new(),
            seller: None,
            payment_method: None,
            discount: Money::zero(),
            notes: String::new(),
            sale_date: Utc::now().date_naive(),
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn buyer(&self) -> &str {
        &self.buyer
    }

    pub fn seller(&self) -> Option<&str> {
        self.seller.as_deref()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for DraftSale {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Completed Sale
// =============================================================================

/// The record handed to the [`SaleSink`] when a draft is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompletedSale {
    pub id: String,
    /// Human-readable number, `YYMMDD-HHMMSS-XXXXXXXX`.
    pub receipt_number: String,
    pub status: SaleStatus,
    pub buyer: String,
    pub seller: String,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<LineItem>,
    pub totals: SaleTotals,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

/// Outcome of a successful [`SaleBuilder::finalize`].
#[derive(Debug, Clone)]
pub struct FinalizedSale {
    pub sale: CompletedSale,
    /// Set when the sink refused the sale. The sale still counts as finalized.
    pub record_error: Option<RecordError>,
}

impl FinalizedSale {
    pub fn is_recorded(&self) -> bool {
        self.record_error.is_none()
    }
}

fn receipt_number(id: &Uuid, at: DateTime<Utc>) -> String {
    let suffix: String = id.simple().to_string().chars().take(8).collect();
    format!("{}-{}", at.format("%y%m%d-%H%M%S"), suffix.to_uppercase())
}

// =============================================================================
// Sale Builder
// =============================================================================

/// Owns the draft and applies every sale-entry action to it.
///
/// ## Invariants
/// - Lines are unique by (product code, lot); adding the same pair again
///   increases quantity
/// - Every line has 1 ≤ quantity ≤ 999 and 0 ≤ discount ≤ gross
/// - At most 100 lines
/// - Any rejected action leaves the draft unchanged
#[derive(Debug, Clone, Default)]
pub struct SaleBuilder {
    draft: DraftSale,
    lot_policy: LotPolicy,
    /// The sale-level "sell by lot" switch; survives resets.
    lot_tracking: bool,
}

impl SaleBuilder {
    /// Creates a builder with an empty draft and the per-sale lot policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lot_policy(mut self, policy: LotPolicy) -> Self {
        self.lot_policy = policy;
        self
    }

    pub fn draft(&self) -> &DraftSale {
        &self.draft
    }

    pub fn lot_policy(&self) -> LotPolicy {
        self.lot_policy
    }

    pub fn lot_tracking(&self) -> bool {
        self.lot_tracking
    }

    pub fn state(&self) -> DraftState {
        if self.draft.lines.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Building
        }
    }

    /// Fresh totals for the current draft.
    pub fn totals(&self) -> SaleTotals {
        compute_totals(&self.draft)
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Adds a selection to the draft, merging with a line for the same
    /// product and lot.
    ///
    /// ## Merge Rule
    /// The existing line keeps its unit price and cost. Quantity and
    /// discount are summed and re-checked against the merged gross amount.
    ///
    /// ## Returns
    /// The id of the new or merged line.
    pub fn add_line_item(&mut self, selection: LineSelection) -> CoreResult<String> {
        validate_product_code(&selection.product_code)?;
        validate_quantity(selection.quantity)?;
        validate_unit_amount("unit price", selection.unit_price)?;
        validate_unit_amount("unit cost", selection.unit_cost)?;
        validate_discount(
            "discount",
            selection.discount,
            selection.unit_price.multiply_quantity(selection.quantity),
        )?;

        let lot_id = normalize_lot(selection.lot_id.as_deref())?;
        if lot_id.is_none() && self.lot_required(&selection) {
            return Err(ValidationError::required("lot").into());
        }

        let code = selection.product_code.trim().to_string();

        if let Some(line) = self
            .draft
            .lines
            .iter_mut()
            .find(|l| l.product_code == code && l.lot_id == lot_id)
        {
            let quantity = line.quantity + selection.quantity;
            if quantity > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: quantity,
                    max: MAX_ITEM_QUANTITY,
                });
            }

            let discount = line.discount + selection.discount;
            validate_discount("discount", discount, line.unit_price.multiply_quantity(quantity))?;

            line.quantity = quantity;
            line.discount = discount;
            return Ok(line.id.clone());
        }

        validate_line_count(self.draft.lines.len())?;

        let name = selection.product_name.trim();
        let line = LineItem {
            id: Uuid::new_v4().to_string(),
            product_name: if name.is_empty() {
                code.clone()
            } else {
                name.to_string()
            },
            product_code: code,
            lot_id,
            quantity: selection.quantity,
            unit_price: selection.unit_price,
            unit_cost: selection.unit_cost,
            discount: selection.discount,
        };

        let id = line.id.clone();
        self.draft.lines.push(line);
        Ok(id)
    }

    /// Looks `code` up in the catalog and adds it at catalog price and cost.
    ///
    /// ## Returns
    /// - `Ok(Some(line_id))` - added or merged
    /// - `Ok(None)` - no product has this code; the draft is untouched
    /// - `Err(_)` - the product exists but the line was rejected
    pub fn add_by_code(
        &mut self,
        catalog: &dyn ProductCatalog,
        code: &str,
        quantity: i64,
        lot: Option<&str>,
    ) -> CoreResult<Option<String>> {
        let Some(product) = catalog.find_by_code(code.trim()) else {
            return Ok(None);
        };

        let mut selection = LineSelection::from_product(&product, quantity);
        if let Some(lot) = normalize_lot(lot)? {
            if !product.has_lot(&lot) {
                return Err(ValidationError::NotAllowed {
                    field: "lot".to_string(),
                    allowed: product.lots.clone(),
                }
                .into());
            }
            selection = selection.with_lot(lot);
        }

        self.add_line_item(selection).map(Some)
    }

    /// Removes a line. Unknown ids are ignored.
    ///
    /// ## Returns
    /// Whether a line was removed.
    pub fn remove_line_item(&mut self, id: &str) -> bool {
        let before = self.draft.lines.len();
        self.draft.lines.retain(|l| l.id != id);
        self.draft.lines.len() != before
    }

    fn lot_required(&self, selection: &LineSelection) -> bool {
        match self.lot_policy {
            LotPolicy::PerSale => self.lot_tracking,
            LotPolicy::PerProduct => selection.lot_tracked,
        }
    }

    // -------------------------------------------------------------------------
    // Header
    // -------------------------------------------------------------------------

    pub fn set_buyer(&mut self, buyer: impl Into<String>) {
        self.draft.buyer = buyer.into();
    }

    /// Sets the seller reference; a blank value clears it.
    pub fn set_seller(&mut self, seller: impl Into<String>) {
        let seller = seller.into();
        let seller = seller.trim();
        self.draft.seller = (!seller.is_empty()).then(|| seller.to_string());
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.draft.payment_method = method;
    }

    /// Sets the overall discount. It is checked against the subtotal only
    /// at finalize, since lines may still change.
    pub fn set_discount(&mut self, discount: Money) -> CoreResult<()> {
        validate_amount("overall discount", discount, MAX_SALE_AMOUNT_CENTS)?;
        self.draft.discount = discount;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub fn set_sale_date(&mut self, date: NaiveDate) {
        self.draft.sale_date = date;
    }

    /// Flips the sale-level lot switch. Lines already added are kept.
    pub fn set_lot_tracking(&mut self, enabled: bool) {
        self.lot_tracking = enabled;
    }

    // -------------------------------------------------------------------------
    // Finalize
    // -------------------------------------------------------------------------

    /// Validates the draft, hands it to `sink` exactly once, and resets.
    ///
    /// ## Errors
    /// `ValidationError` when there are no lines, the buyer, seller or
    /// payment method is missing, or the overall discount exceeds the
    /// subtotal. The draft is left untouched and the sink is not called.
    ///
    /// A sink failure is not an error here: it is reported in
    /// [`FinalizedSale::record_error`] and the draft still resets.
    pub fn finalize(&mut self, sink: &dyn SaleSink) -> CoreResult<FinalizedSale> {
        if self.draft.lines.is_empty() {
            return Err(ValidationError::required("items").into());
        }

        let buyer = validate_required_text("buyer", &self.draft.buyer, MAX_BUYER_NAME)?;
        let seller = self
            .draft
            .seller
            .clone()
            .ok_or_else(|| ValidationError::required("seller"))?;
        let payment_method = self
            .draft
            .payment_method
            .ok_or_else(|| ValidationError::required("payment method"))?;

        let totals = self.totals();
        if totals.total.is_negative() {
            return Err(ValidationError::DiscountTooLarge {
                field: "overall discount".to_string(),
                discount_cents: totals.discount.cents(),
                limit_cents: totals.subtotal.cents(),
            }
            .into());
        }

        let id = Uuid::new_v4();
        let completed_at = Utc::now();
        let notes = self.draft.notes.trim();

        let sale = CompletedSale {
            id: id.to_string(),
            receipt_number: receipt_number(&id, completed_at),
            status: SaleStatus::Completed,
            buyer,
            seller,
            payment_method,
            sale_date: self.draft.sale_date,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            lines: self.draft.lines.clone(),
            totals,
            completed_at,
        };

        let record_error = sink.record(&sale).err();
        self.reset();

        Ok(FinalizedSale { sale, record_error })
    }

    /// Discards the draft. Used after finalize and when leaving the screen.
    pub fn reset(&mut self) {
        self.draft = DraftSale::new();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const MICHELIN: &str = "7891234567890";
    const BRIDGESTONE: &str = "7891234567891";

    #[derive(Default)]
    struct RecordingSink {
        sales: Mutex<Vec<CompletedSale>>,
        fail: bool,
    }

    impl SaleSink for RecordingSink {
        fn record(&self, sale: &CompletedSale) -> Result<(), RecordError> {
            self.sales.lock().unwrap().push(sale.clone());
            if self.fail {
                Err(RecordError::new(&sale.id, "ledger offline"))
            } else {
                Ok(())
            }
        }
    }

    impl RecordingSink {
        fn calls(&self) -> usize {
            self.sales.lock().unwrap().len()
        }
    }

    struct Catalog(Vec<Product>);

    impl ProductCatalog for Catalog {
        fn find_by_code(&self, code: &str) -> Option<Product> {
            self.0.iter().find(|p| p.code == code).cloned()
        }

        fn find_by_name(&self, fragment: &str) -> Vec<Product> {
            let fragment = fragment.to_lowercase();
            self.0
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&fragment))
                .cloned()
                .collect()
        }
    }

    fn michelin(qty: i64) -> LineSelection {
        LineSelection::new(MICHELIN, "Pneu Michelin Energy XM2 195/65 R15", qty, Money::from_cents(25000))
            .with_cost(Money::from_cents(18000))
    }

    fn bridgestone(qty: i64) -> LineSelection {
        LineSelection::new(
            BRIDGESTONE,
            "Pneu Bridgestone Turanza ER300 205/55 R16",
            qty,
            Money::from_cents(32000),
        )
        .with_cost(Money::from_cents(23000))
    }

    fn catalog() -> Catalog {
        Catalog(vec![Product {
            id: "p1".into(),
            code: MICHELIN.into(),
            name: "Pneu Michelin Energy XM2 195/65 R15".into(),
            brand: "Michelin".into(),
            category: "Pneu Aro 15".into(),
            price_cents: 25000,
            cost_cents: 18000,
            stock: 12,
            lots: vec!["L240115".into(), "L240120".into()],
            lot_tracked: true,
        }])
    }

    fn ready_builder() -> SaleBuilder {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(2)).unwrap();
        builder.set_buyer("Carlos Pereira");
        builder.set_seller("maria");
        builder.set_payment_method(Some(PaymentMethod::Pix));
        builder
    }

    #[test]
    fn test_line_math() {
        for (qty, price, cost, discount) in [(1, 0, 0, 0), (2, 25000, 18000, 0), (4, 32000, 23000, 5000), (3, 999, 1200, 2997)] {
            let mut builder = SaleBuilder::new();
            let id = builder
                .add_line_item(
                    LineSelection::new(MICHELIN, "Pneu", qty, Money::from_cents(price))
                        .with_cost(Money::from_cents(cost))
                        .with_discount(Money::from_cents(discount)),
                )
                .unwrap();

            let line = builder.draft().line(&id).unwrap();
            assert_eq!(line.subtotal().cents(), qty * price - discount);
            assert_eq!(line.profit().cents(), qty * price - discount - qty * cost);
        }
    }

    #[test]
    fn test_same_product_and_lot_merges() {
        let mut builder = SaleBuilder::new();
        let first = builder.add_line_item(michelin(2)).unwrap();
        let second = builder.add_line_item(michelin(1)).unwrap();

        assert_eq!(first, second);
        assert_eq!(builder.draft().lines().len(), 1);

        let line = &builder.draft().lines()[0];
        assert_eq!(line.quantity, 3);
        assert_eq!(line.subtotal().cents(), 75000);
        assert_eq!(line.profit().cents(), 21000);

        let totals = builder.totals();
        assert_eq!(totals.subtotal.cents(), 75000);
        assert_eq!(totals.cost.cents(), 54000);
        assert_eq!(totals.profit.cents(), 21000);
        assert_eq!(totals.margin.bps(), 2800);
    }

    #[test]
    fn test_different_lots_stay_separate() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(1).with_lot("L240115")).unwrap();
        builder.add_line_item(michelin(1).with_lot("L240120")).unwrap();
        builder.add_line_item(michelin(1).with_lot(" L240115 ")).unwrap();

        let lines = builder.draft().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].lot_id.as_deref(), Some("L240115"));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(bridgestone(1)).unwrap();
        builder.add_line_item(michelin(1)).unwrap();
        builder.add_line_item(bridgestone(1)).unwrap();

        let codes: Vec<_> = builder
            .draft()
            .lines()
            .iter()
            .map(|l| l.product_code.as_str())
            .collect();
        assert_eq!(codes, vec![BRIDGESTONE, MICHELIN]);
    }

    #[test]
    fn test_invalid_selection_leaves_draft_unchanged() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(1)).unwrap();
        let before = builder.draft().clone();

        assert!(builder.add_line_item(michelin(0)).is_err());
        assert!(builder
            .add_line_item(michelin(1).with_discount(Money::from_cents(25001)))
            .is_err());
        assert!(builder
            .add_line_item(LineSelection::new("", "Nada", 1, Money::from_cents(100)))
            .is_err());
        assert!(builder
            .add_line_item(LineSelection::new(MICHELIN, "Pneu", 1, Money::from_cents(-1)))
            .is_err());

        assert_eq!(builder.draft(), &before);
    }

    #[test]
    fn test_merge_rechecks_limits() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(998)).unwrap();

        let err = builder.add_line_item(michelin(2)).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));
        assert_eq!(builder.draft().lines()[0].quantity, 998);
    }

    #[test]
    fn test_oversized_amounts_rejected_without_overflow() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(1)).unwrap();
        let before = builder.draft().clone();

        let huge: Money = "50000000000000000".parse().unwrap();
        let err = builder
            .add_line_item(LineSelection::new(BRIDGESTONE, "Pneu", 2, huge))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "unit price"
        ));
        assert!(builder.add_line_item(bridgestone(2).with_cost(huge)).is_err());
        assert!(builder.set_discount(Money::from_cents(i64::MAX)).is_err());

        assert_eq!(builder.draft(), &before);
        assert_eq!(builder.totals().subtotal.cents(), 25000);
    }

    #[test]
    fn test_largest_sale_totals_fit() {
        let mut builder = SaleBuilder::new();
        let top = Money::from_cents(crate::MAX_UNIT_PRICE_CENTS);
        for i in 0..crate::MAX_SALE_LINES {
            builder
                .add_line_item(LineSelection::new(format!("P{}", i), "Pneu", MAX_ITEM_QUANTITY, top).with_cost(top))
                .unwrap();
        }
        builder.set_discount(Money::from_cents(MAX_SALE_AMOUNT_CENTS)).unwrap();

        let totals = builder.totals();
        assert_eq!(totals.subtotal.cents(), MAX_SALE_AMOUNT_CENTS);
        assert!(totals.total.is_zero());
        assert_eq!(totals.profit.cents(), -MAX_SALE_AMOUNT_CENTS);
    }

    #[test]
    fn test_merge_sums_discounts() {
        let mut builder = SaleBuilder::new();
        builder
            .add_line_item(michelin(1).with_discount(Money::from_cents(1000)))
            .unwrap();
        builder
            .add_line_item(michelin(1).with_discount(Money::from_cents(500)))
            .unwrap();

        let line = &builder.draft().lines()[0];
        assert_eq!(line.discount.cents(), 1500);
        assert_eq!(line.subtotal().cents(), 48500);
    }

    #[test]
    fn test_lot_required_per_sale() {
        let mut builder = SaleBuilder::new();
        builder.set_lot_tracking(true);

        let err = builder.add_line_item(michelin(1)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "lot"
        ));
        assert!(builder.draft().is_empty());

        assert!(builder.add_line_item(michelin(1).with_lot("L240115")).is_ok());
    }

    #[test]
    fn test_lot_required_per_product() {
        let mut builder = SaleBuilder::new().with_lot_policy(LotPolicy::PerProduct);
        builder.set_lot_tracking(true);

        // Sale-level switch is ignored under the per-product policy
        assert!(builder.add_line_item(bridgestone(1)).is_ok());

        let mut tracked = michelin(1);
        tracked.lot_tracked = true;
        assert!(builder.add_line_item(tracked.clone()).is_err());
        assert!(builder.add_line_item(tracked.with_lot("L240115")).is_ok());
    }

    #[test]
    fn test_add_by_code() {
        let catalog = catalog();
        let mut builder = SaleBuilder::new().with_lot_policy(LotPolicy::PerProduct);

        assert_eq!(builder.add_by_code(&catalog, "0000000000000", 1, None).unwrap(), None);
        assert!(builder.draft().is_empty());

        // Product is lot tracked, and the lot must be one it carries
        assert!(builder.add_by_code(&catalog, MICHELIN, 1, None).is_err());
        assert!(builder.add_by_code(&catalog, MICHELIN, 1, Some("L999999")).is_err());

        let id = builder
            .add_by_code(&catalog, MICHELIN, 2, Some("L240120"))
            .unwrap()
            .unwrap();
        let line = builder.draft().line(&id).unwrap();
        assert_eq!(line.unit_price.cents(), 25000);
        assert_eq!(line.unit_cost.cents(), 18000);
        assert_eq!(line.lot_id.as_deref(), Some("L240120"));
    }

    #[test]
    fn test_remove_unknown_line_is_noop() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(2)).unwrap();
        let before = builder.totals();

        assert!(!builder.remove_line_item("missing"));
        assert_eq!(builder.totals(), before);
    }

    #[test]
    fn test_remove_line_returns_to_empty() {
        let mut builder = SaleBuilder::new();
        assert_eq!(builder.state(), DraftState::Empty);

        let id = builder.add_line_item(michelin(1)).unwrap();
        assert_eq!(builder.state(), DraftState::Building);

        assert!(builder.remove_line_item(&id));
        assert_eq!(builder.state(), DraftState::Empty);
        assert!(builder.totals().is_zero());
    }

    #[test]
    fn test_overall_discount_reduces_total_and_profit() {
        let mut builder = SaleBuilder::new();
        builder.add_line_item(michelin(3)).unwrap();
        builder.set_discount(Money::from_cents(5000)).unwrap();

        let totals = builder.totals();
        assert_eq!(totals.subtotal.cents(), 75000);
        assert_eq!(totals.total.cents(), 70000);
        assert_eq!(totals.profit.cents(), 16000);
        assert_eq!(totals.margin.bps(), 2286);

        assert!(builder.set_discount(Money::from_cents(-1)).is_err());
        assert_eq!(builder.draft().discount().cents(), 5000);
    }

    #[test]
    fn test_margin_zero_when_total_zero() {
        let mut builder = SaleBuilder::new();
        builder
            .add_line_item(LineSelection::new(MICHELIN, "Brinde", 1, Money::zero()).with_cost(Money::from_cents(1000)))
            .unwrap();

        let totals = builder.totals();
        assert!(totals.total.is_zero());
        assert_eq!(totals.profit.cents(), -1000);
        assert!(totals.margin.is_zero());
    }

    #[test]
    fn test_finalize_empty_draft_fails() {
        let sink = RecordingSink::default();
        let mut builder = SaleBuilder::new();
        builder.set_buyer("Carlos");
        builder.set_seller("maria");
        builder.set_payment_method(Some(PaymentMethod::Cash));

        let err = builder.finalize(&sink).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(sink.calls(), 0);
        assert_eq!(builder.draft().buyer(), "Carlos");
    }

    #[test]
    fn test_finalize_requires_header() {
        let sink = RecordingSink::default();

        let mut builder = ready_builder();
        builder.set_buyer("  ");
        assert!(builder.finalize(&sink).is_err());

        let mut builder = ready_builder();
        builder.set_seller("");
        assert!(builder.finalize(&sink).is_err());

        let mut builder = ready_builder();
        builder.set_payment_method(None);
        let before = builder.draft().clone();
        assert!(builder.finalize(&sink).is_err());
        assert_eq!(builder.draft(), &before);

        assert_eq!(sink.calls(), 0);
    }

    #[test]
    fn test_finalize_rejects_negative_total() {
        let sink = RecordingSink::default();
        let mut builder = ready_builder();
        builder.set_discount(Money::from_cents(50001)).unwrap();

        assert!(builder.finalize(&sink).is_err());
        assert_eq!(builder.state(), DraftState::Building);
        assert_eq!(sink.calls(), 0);
    }

    #[test]
    fn test_finalize_records_once_and_resets() {
        let sink = RecordingSink::default();
        let mut builder = ready_builder();
        builder.set_lot_tracking(true);
        builder.set_notes("  entrega amanhã ");

        let finalized = builder.finalize(&sink).unwrap();
        assert!(finalized.is_recorded());
        assert_eq!(sink.calls(), 1);

        let sale = &finalized.sale;
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.buyer, "Carlos Pereira");
        assert_eq!(sale.seller, "maria");
        assert_eq!(sale.notes.as_deref(), Some("entrega amanhã"));
        assert_eq!(sale.totals.total.cents(), 50000);
        assert_eq!(sale.lines.len(), 1);
        assert_eq!(sale.receipt_number.len(), "YYMMDD-HHMMSS-XXXXXXXX".len());

        assert_eq!(builder.state(), DraftState::Empty);
        assert!(builder.totals().is_zero());
        assert_eq!(builder.draft().buyer(), "");
        assert!(builder.lot_tracking());
    }

    #[test]
    fn test_finalize_reports_sink_failure_and_still_resets() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut builder = ready_builder();

        let finalized = builder.finalize(&sink).unwrap();
        assert!(!finalized.is_recorded());
        assert_eq!(finalized.record_error.unwrap().reason, "ledger offline");
        assert_eq!(sink.calls(), 1);
        assert!(builder.draft().is_empty());
    }

    #[test]
    fn test_lot_policy_parsing() {
        assert_eq!("per_sale".parse::<LotPolicy>().unwrap(), LotPolicy::PerSale);
        assert_eq!("per-product".parse::<LotPolicy>().unwrap(), LotPolicy::PerProduct);
        assert!("always".parse::<LotPolicy>().is_err());
        assert_eq!(LotPolicy::PerProduct.to_string(), "per_product");
    }
}
