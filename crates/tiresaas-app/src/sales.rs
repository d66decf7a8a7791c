//! # Sales Screen
//!
//! Controller behind the "Nova Venda" screen. Owns the [`SaleBuilder`] and
//! the product form, and turns every outcome into a [`Notice`](crate::notify::Notice).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select_product / CaptureEvent ──► pending LineSelection (the form)    │
//! │                                          │                              │
//! │                                add_pending                              │
//! │                                          ▼                              │
//! │                                    SaleBuilder ──► totals               │
//! │                                          │                              │
//! │                                    finalize                             │
//! │                                          ▼                              │
//! │  SaleLedger (SaleSink) ◄── CompletedSale ──► seller points, stock      │
//! │                                                                         │
//! │  Every step reports through the Notifier; nothing here panics or       │
//! │  returns an error to the shell.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use tiresaas_core::scan::ScanHistory;
use tiresaas_core::{
    CoreError, DraftSale, FinalizedSale, LineSelection, Money, PaymentMethod, Product,
    ProductCatalog, SaleBuilder, SaleTotals, User, ValidationError,
};
use tiresaas_data::{DataStore, ProductRepository, SaleLedger, UserRepository};

use crate::capture::CaptureEvent;
use crate::config::AppConfig;
use crate::devices::DeviceKind;
use crate::notify::{Message, Notifier};
use crate::state::Language;

/// Header fields whose absence makes a sale incomplete.
const HEADER_FIELDS: [&str; 3] = ["buyer", "seller", "payment method"];

/// Where notices from a screen action go.
pub struct Feedback<'a> {
    pub notifier: &'a mut Notifier,
    pub language: Language,
}

impl<'a> Feedback<'a> {
    pub fn new(notifier: &'a mut Notifier, language: Language) -> Self {
        Feedback { notifier, language }
    }

    fn send(&mut self, message: Message) {
        self.notifier.notify(&message, self.language);
    }
}

pub struct SalesScreen {
    builder: SaleBuilder,
    /// The product form; `None` until a product is picked.
    pending: Option<LineSelection>,
    history: ScanHistory,
    catalog: ProductRepository,
    ledger: SaleLedger,
    users: UserRepository,
    config: AppConfig,
}

impl SalesScreen {
    pub fn new(config: &AppConfig, data: &DataStore) -> Self {
        let mut builder = SaleBuilder::new().with_lot_policy(config.sales.lot_policy);
        builder.set_lot_tracking(config.sales.lot_tracking);

        SalesScreen {
            builder,
            pending: None,
            history: ScanHistory::new(),
            catalog: data.products(),
            ledger: data.sales(),
            users: data.users(),
            config: config.clone(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn builder(&self) -> &SaleBuilder {
        &self.builder
    }

    pub fn draft(&self) -> &DraftSale {
        self.builder.draft()
    }

    pub fn totals(&self) -> SaleTotals {
        self.builder.totals()
    }

    pub fn pending(&self) -> Option<&LineSelection> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    pub fn ledger(&self) -> &SaleLedger {
        &self.ledger
    }

    /// Users that can be picked as the seller.
    pub fn sellers(&self) -> Vec<User> {
        self.users.sellers()
    }

    /// Products whose name contains `fragment`, for the product picker.
    pub fn search(&self, fragment: &str) -> Vec<Product> {
        self.catalog.find_by_name(fragment)
    }

    // =========================================================================
    // Product Form
    // =========================================================================

    /// Resolves a code or name and prefills the product form with it.
    ///
    /// A miss notifies and leaves the form as it was.
    pub fn select_product(&mut self, input: &str, feedback: &mut Feedback<'_>) -> bool {
        match self.catalog.lookup(input) {
            Some(product) => {
                self.prefill(&product);
                true
            }
            None => {
                feedback.send(Message::ProductNotFound(input.trim().to_string()));
                false
            }
        }
    }

    /// Edits the product form in place. No-op when nothing is selected.
    pub fn edit_pending(&mut self, edit: impl FnOnce(&mut LineSelection)) {
        if let Some(selection) = self.pending.as_mut() {
            edit(selection);
        }
    }

    /// Adds the product form to the draft.
    ///
    /// The form is cleared on success and kept on failure so the seller can
    /// correct it.
    pub fn add_pending(&mut self, feedback: &mut Feedback<'_>) -> Option<String> {
        let Some(selection) = self.pending.clone() else {
            feedback.send(Message::ItemRejected(
                ValidationError::required("product").to_string(),
            ));
            return None;
        };

        let id = self.add_selection(selection, feedback)?;
        self.pending = None;
        Some(id)
    }

    /// Adds a line directly, bypassing the form.
    pub fn add_selection(
        &mut self,
        selection: LineSelection,
        feedback: &mut Feedback<'_>,
    ) -> Option<String> {
        let name = selection.product_name.clone();
        let quantity = selection.quantity;

        match self.builder.add_line_item(selection) {
            Ok(id) => {
                debug!(line_id = %id, product = %name, quantity, "Line added");
                feedback.send(Message::ItemAdded {
                    product: name,
                    quantity,
                });
                Some(id)
            }
            Err(e) => {
                feedback.send(line_rejection(&e));
                None
            }
        }
    }

    /// Adds a product by code at catalog price.
    pub fn add_by_code(
        &mut self,
        code: &str,
        quantity: i64,
        lot: Option<&str>,
        feedback: &mut Feedback<'_>,
    ) -> Option<String> {
        match self.builder.add_by_code(&self.catalog, code, quantity, lot) {
            Ok(Some(id)) => {
                let name = self
                    .draft()
                    .line(&id)
                    .map(|l| l.product_name.clone())
                    .unwrap_or_default();
                feedback.send(Message::ItemAdded {
                    product: name,
                    quantity,
                });
                Some(id)
            }
            Ok(None) => {
                feedback.send(Message::ProductNotFound(code.trim().to_string()));
                None
            }
            Err(e) => {
                feedback.send(line_rejection(&e));
                None
            }
        }
    }

    pub fn remove_line(&mut self, id: &str, feedback: &mut Feedback<'_>) -> bool {
        let removed = self.builder.remove_line_item(id);
        if removed {
            feedback.send(Message::ItemRemoved);
        }
        removed
    }

    // =========================================================================
    // Header
    // =========================================================================

    pub fn set_buyer(&mut self, buyer: &str) {
        self.builder.set_buyer(buyer);
    }

    pub fn set_seller(&mut self, seller_id: &str) {
        self.builder.set_seller(seller_id);
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.builder.set_payment_method(method);
    }

    pub fn set_discount(&mut self, discount: Money, feedback: &mut Feedback<'_>) -> bool {
        match self.builder.set_discount(discount) {
            Ok(()) => true,
            Err(e) => {
                feedback.send(Message::SaleRejected(e.to_string()));
                false
            }
        }
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.builder.set_notes(notes);
    }

    pub fn set_sale_date(&mut self, date: NaiveDate) {
        self.builder.set_sale_date(date);
    }

    pub fn set_lot_tracking(&mut self, enabled: bool) {
        self.builder.set_lot_tracking(enabled);
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Applies the result of a camera or microphone capture.
    pub fn handle_capture(&mut self, event: CaptureEvent, feedback: &mut Feedback<'_>) {
        match event {
            CaptureEvent::CameraStarted => feedback.send(Message::ScannerActive),
            CaptureEvent::Barcode(code) => match self.catalog.find_by_code(&code) {
                Some(product) => {
                    let count = self.history.record(&product, Utc::now());
                    debug!(code = %product.code, count, "Barcode matched");
                    feedback.send(Message::ProductFound(product.name.clone()));
                    self.prefill(&product);
                }
                None => feedback.send(Message::ProductNotFound(code)),
            },
            CaptureEvent::Transcript(text) => {
                feedback.send(Message::Heard(text.clone()));
                match self.catalog.lookup(&text) {
                    Some(product) => {
                        feedback.send(Message::ProductFound(product.name.clone()));
                        self.prefill(&product);
                    }
                    None => feedback.send(Message::ProductNotFound(text)),
                }
            }
            CaptureEvent::Failed { device, error } => {
                warn!(%device, %error, "Capture failed");
                let message = match device {
                    DeviceKind::Camera => Message::CameraError(error.to_string()),
                    DeviceKind::Microphone => Message::MicrophoneError(error.to_string()),
                };
                feedback.send(message);
            }
        }
    }

    pub fn clear_history(&mut self, feedback: &mut Feedback<'_>) {
        self.history.clear();
        feedback.send(Message::HistoryCleared);
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    /// Finalizes the draft into the ledger.
    ///
    /// On success the seller is credited and stock leaves the catalog, both
    /// only when the ledger accepted the sale.
    pub fn finalize(&mut self, feedback: &mut Feedback<'_>) -> Option<FinalizedSale> {
        let finalized = match self.builder.finalize(&self.ledger) {
            Ok(finalized) => finalized,
            Err(e) => {
                debug!(error = %e, "Finalize rejected");
                feedback.send(finalize_rejection(&e));
                return None;
            }
        };

        self.pending = None;
        let sale = &finalized.sale;
        info!(
            receipt = %sale.receipt_number,
            total = %sale.totals.total,
            recorded = finalized.is_recorded(),
            "Sale finalized"
        );

        feedback.send(Message::SaleCompleted {
            total: self.config.format_currency(sale.totals.total),
            profit: self.config.format_currency(sale.totals.profit),
        });

        match &finalized.record_error {
            Some(error) => feedback.send(Message::SaleNotRecorded(error.reason.clone())),
            None => {
                if let Err(e) = self.users.credit_sale(&sale.seller) {
                    warn!(seller = %sale.seller, error = %e, "Could not credit seller");
                }
                for line in &sale.lines {
                    if let Err(e) = self.catalog.adjust_stock(&line.product_code, -line.quantity) {
                        warn!(code = %line.product_code, error = %e, "Could not adjust stock");
                    }
                }
            }
        }

        Some(finalized)
    }

    /// Discards the draft and the product form. The lot switch is kept.
    pub fn reset(&mut self) {
        self.builder.reset();
        self.pending = None;
    }

    fn prefill(&mut self, product: &Product) {
        self.pending = Some(LineSelection::from_product(product, 1));
    }
}

fn line_rejection(error: &CoreError) -> Message {
    match error {
        CoreError::Validation(ValidationError::Required { field }) if field == "lot" => {
            Message::LotRequired
        }
        other => Message::ItemRejected(other.to_string()),
    }
}

fn finalize_rejection(error: &CoreError) -> Message {
    match error {
        CoreError::Validation(ValidationError::Required { field }) if field == "items" => {
            Message::NoItems
        }
        CoreError::Validation(ValidationError::Required { field })
            if HEADER_FIELDS.contains(&field.as_str()) =>
        {
            Message::IncompleteSale
        }
        other => Message::SaleRejected(other.to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceError;
    use crate::notify::NoticeLevel;
    use tiresaas_core::LotPolicy;

    const MICHELIN: &str = "7891234567890";
    const CONTINENTAL: &str = "7891234567892";

    fn screen() -> (SalesScreen, DataStore) {
        let data = DataStore::seeded();
        (SalesScreen::new(&AppConfig::default(), &data), data)
    }

    fn titles(notifier: &Notifier) -> Vec<String> {
        notifier.notices().map(|n| n.title.clone()).collect()
    }

    fn fill_header(screen: &mut SalesScreen) {
        screen.set_buyer("Carlos Pereira");
        screen.set_seller("user-maria");
        screen.set_payment_method(Some(PaymentMethod::Pix));
    }

    #[test]
    fn test_select_then_add_pending() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        assert!(screen.select_product("continental", &mut feedback));
        screen.edit_pending(|s| s.quantity = 4);

        let id = screen.add_pending(&mut feedback).unwrap();
        assert!(screen.pending().is_none());
        assert_eq!(screen.draft().line(&id).unwrap().quantity, 4);
        assert_eq!(screen.totals().subtotal.cents(), 92000);
        assert_eq!(titles(&notifier), vec!["Item adicionado"]);
        assert_eq!(
            notifier.latest().unwrap().description,
            "Pneu Continental ContiPowerContact 185/60 R14 - Qtd: 4"
        );
    }

    #[test]
    fn test_add_pending_without_selection() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();

        assert!(screen
            .add_pending(&mut Feedback::new(&mut notifier, Language::En))
            .is_none());
        assert_eq!(notifier.latest().unwrap().level, NoticeLevel::Error);
        assert!(screen.draft().is_empty());
    }

    #[test]
    fn test_lot_required_keeps_form() {
        let (mut screen, _) = screen();
        screen.set_lot_tracking(true);
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.select_product(MICHELIN, &mut feedback);
        assert!(screen.add_pending(&mut feedback).is_none());
        assert!(screen.pending().is_some());
        assert_eq!(titles(&notifier), vec!["Lote obrigatório"]);

        let mut feedback = Feedback::new(&mut notifier, Language::Pt);
        screen.edit_pending(|s| s.lot_id = Some("L240115".into()));
        assert!(screen.add_pending(&mut feedback).is_some());
        assert_eq!(screen.draft().lines()[0].lot_id.as_deref(), Some("L240115"));
    }

    #[test]
    fn test_per_product_policy_from_config() {
        let data = DataStore::seeded();
        let mut config = AppConfig::default();
        config.sales.lot_policy = LotPolicy::PerProduct;
        let mut screen = SalesScreen::new(&config, &data);
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        assert!(screen.add_by_code(CONTINENTAL, 1, None, &mut feedback).is_some());
        assert!(screen.add_by_code(MICHELIN, 1, None, &mut feedback).is_none());
        assert!(screen
            .add_by_code(MICHELIN, 1, Some("L240120"), &mut feedback)
            .is_some());
        assert_eq!(screen.draft().lines().len(), 2);
    }

    #[test]
    fn test_unknown_code_notifies_and_leaves_draft() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        assert!(screen.add_by_code("0000000000000", 1, None, &mut feedback).is_none());
        assert!(!screen.select_product("pirelli", &mut feedback));
        assert!(screen.draft().is_empty());
        assert_eq!(titles(&notifier), vec!["Produto não encontrado"; 2]);
    }

    #[test]
    fn test_remove_line() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        let id = screen.add_by_code(CONTINENTAL, 1, None, &mut feedback).unwrap();
        assert!(!screen.remove_line("missing", &mut feedback));
        assert!(screen.remove_line(&id, &mut feedback));
        assert!(screen.totals().is_zero());
        assert_eq!(notifier.latest().unwrap().title, "Item removido");
    }

    #[test]
    fn test_barcode_capture_prefills_and_records_history() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.handle_capture(CaptureEvent::CameraStarted, &mut feedback);
        screen.handle_capture(CaptureEvent::Barcode(MICHELIN.into()), &mut feedback);
        screen.handle_capture(CaptureEvent::Barcode(MICHELIN.into()), &mut feedback);

        assert_eq!(screen.pending().unwrap().product_code, MICHELIN);
        assert_eq!(screen.pending().unwrap().unit_price.cents(), 25000);
        assert_eq!(screen.history().len(), 1);
        assert_eq!(screen.history().entries()[0].count, 2);
        assert_eq!(
            titles(&notifier),
            vec!["Scanner ativo", "Produto encontrado!", "Produto encontrado!"]
        );
    }

    #[test]
    fn test_missed_barcode_keeps_selection() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.handle_capture(CaptureEvent::Barcode(CONTINENTAL.into()), &mut feedback);
        screen.handle_capture(CaptureEvent::Barcode("123".into()), &mut feedback);

        assert_eq!(screen.pending().unwrap().product_code, CONTINENTAL);
        assert_eq!(screen.history().len(), 1);
        assert_eq!(
            notifier.latest().unwrap().description,
            "Código \"123\" não localizado no sistema"
        );
    }

    #[test]
    fn test_voice_and_failures() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::En);

        screen.handle_capture(CaptureEvent::Transcript("bridgestone".into()), &mut feedback);
        screen.handle_capture(
            CaptureEvent::Failed {
                device: DeviceKind::Camera,
                error: DeviceError::PermissionDenied(DeviceKind::Camera),
            },
            &mut feedback,
        );
        screen.handle_capture(
            CaptureEvent::Failed {
                device: DeviceKind::Microphone,
                error: DeviceError::NothingRecognized(DeviceKind::Microphone),
            },
            &mut feedback,
        );

        assert_eq!(screen.pending().unwrap().product_code, "7891234567891");
        assert_eq!(
            titles(&notifier),
            vec!["Voice command", "Product found!", "Camera error", "Microphone error"]
        );
    }

    #[test]
    fn test_clear_history() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.handle_capture(CaptureEvent::Barcode(MICHELIN.into()), &mut feedback);
        screen.clear_history(&mut feedback);
        assert!(screen.history().is_empty());
        assert_eq!(notifier.latest().unwrap().title, "Histórico limpo");
    }

    #[test]
    fn test_finalize_rejections_map_to_notices() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();

        {
            let mut feedback = Feedback::new(&mut notifier, Language::Pt);
            fill_header(&mut screen);
            assert!(screen.finalize(&mut feedback).is_none());

            screen.add_by_code(CONTINENTAL, 1, None, &mut feedback);
            screen.set_payment_method(None);
            assert!(screen.finalize(&mut feedback).is_none());

            screen.set_payment_method(Some(PaymentMethod::Cash));
            screen.set_discount(Money::from_cents(23001), &mut feedback);
            assert!(screen.finalize(&mut feedback).is_none());
        }

        let titles = titles(&notifier);
        assert_eq!(titles[0], "Nenhum item");
        assert_eq!(titles[2], "Dados incompletos");
        assert_eq!(titles[3], "Venda inválida");
        assert_eq!(screen.draft().lines().len(), 1);
    }

    #[test]
    fn test_finalize_records_credits_and_resets() {
        let (mut screen, data) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.add_by_code(MICHELIN, 3, None, &mut feedback);
        fill_header(&mut screen);

        let finalized = screen.finalize(&mut feedback).unwrap();
        assert!(finalized.is_recorded());
        assert!(screen.draft().is_empty());

        assert_eq!(data.sales().count(), 1);
        assert_eq!(data.users().get_by_id("user-maria").unwrap().points, 1860);
        assert_eq!(data.products().find_by_code(MICHELIN).unwrap().stock, 9);
        assert_eq!(
            notifier.latest().unwrap().description,
            "Total: R$ 750.00 | Lucro: R$ 210.00"
        );
    }

    #[test]
    fn test_finalize_while_ledger_unavailable() {
        let (mut screen, data) = screen();
        data.sales().set_available(false);
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.add_by_code(CONTINENTAL, 1, None, &mut feedback);
        fill_header(&mut screen);

        let finalized = screen.finalize(&mut feedback).unwrap();
        assert!(!finalized.is_recorded());
        assert!(screen.draft().is_empty());
        assert_eq!(data.sales().count(), 0);
        assert_eq!(data.users().get_by_id("user-maria").unwrap().points, 1850);
        assert_eq!(notifier.latest().unwrap().title, "Venda não registrada");
    }

    #[test]
    fn test_reset_keeps_lot_switch() {
        let (mut screen, _) = screen();
        let mut notifier = Notifier::new();
        let mut feedback = Feedback::new(&mut notifier, Language::Pt);

        screen.set_lot_tracking(true);
        screen.select_product(CONTINENTAL, &mut feedback);
        screen.reset();

        assert!(screen.pending().is_none());
        assert!(screen.builder().lot_tracking());
    }

    #[test]
    fn test_sellers_excludes_inactive() {
        let (screen, _) = screen();
        let ids: Vec<_> = screen.sellers().into_iter().map(|u| u.id).collect();
        assert!(ids.contains(&"user-maria".to_string()));
        assert!(!ids.contains(&"user-ana".to_string()));
    }
}
