//! # TireSaaS App
//!
//! Application shell: wires configuration, shell state, notices, the
//! simulated devices and the sales screen into one [`App`] context.
//!
//! ## Module Organization
//! ```text
//! tiresaas_app/
//! ├── lib.rs       ◄─── You are here (App context, tracing setup)
//! ├── config.rs    ◄─── TOML + environment configuration
//! ├── state.rs     ◄─── Tab, theme, language, connectivity
//! ├── notify.rs    ◄─── Notices shown to the seller
//! ├── devices.rs   ◄─── Camera / microphone capabilities
//! ├── capture.rs   ◄─── Background capture tasks
//! ├── sales.rs     ◄─── Sales screen controller
//! └── error.rs     ◄─── AppError
//! ```
//!
//! ## Context Passing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  App                                                                    │
//! │  ├── config    AppConfig      read-only after startup                   │
//! │  ├── state     AppState       tab, theme, language, offline             │
//! │  ├── notifier  Notifier       every outcome lands here                  │
//! │  ├── data      DataStore      shared repository handles                 │
//! │  ├── sales     SalesScreen    owns the draft sale                       │
//! │  └── camera / microphone      Arc<dyn ...> handed to capture tasks      │
//! │                                                                         │
//! │  No globals: whoever needs state receives it from App.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod config;
pub mod devices;
pub mod error;
pub mod notify;
pub mod sales;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiresaas_core::ranking::{rank_sellers, rank_stores, RankBy, SellerRanking, StoreRanking};
use tiresaas_data::DataStore;

use capture::CaptureEvent;
use config::AppConfig;
use devices::{BarcodeCamera, Microphone, SimulatedCamera, SimulatedMicrophone};
use notify::{Message, Notifier};
use sales::{Feedback, SalesScreen};
use state::{AppState, Tab};

pub use error::{AppError, AppResult};

/// Capture results buffered before a task waits on the screen.
const CAPTURE_CHANNEL_CAPACITY: usize = 8;

/// Everything the screens share, passed explicitly.
pub struct App {
    config: AppConfig,
    state: AppState,
    notifier: Notifier,
    data: DataStore,
    sales: SalesScreen,
    camera: Arc<dyn BarcodeCamera>,
    microphone: Arc<dyn Microphone>,
}

impl App {
    /// Builds the app with simulated devices timed by `config.devices`.
    pub fn new(config: AppConfig, data: DataStore) -> Self {
        let camera = SimulatedCamera::new(Duration::from_millis(config.devices.scan_delay_ms));
        let microphone =
            SimulatedMicrophone::new(Duration::from_millis(config.devices.listen_delay_ms));
        Self::with_devices(config, data, Arc::new(camera), Arc::new(microphone))
    }

    pub fn with_devices(
        config: AppConfig,
        data: DataStore,
        camera: Arc<dyn BarcodeCamera>,
        microphone: Arc<dyn Microphone>,
    ) -> Self {
        info!(store = %config.store.id, lot_policy = %config.sales.lot_policy, "Starting app");

        App {
            state: AppState::new(config.ui.language, config.ui.theme),
            notifier: Notifier::new(),
            sales: SalesScreen::new(&config, &data),
            config,
            data,
            camera,
            microphone,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn data(&self) -> &DataStore {
        &self.data
    }

    pub fn sales(&self) -> &SalesScreen {
        &self.sales
    }

    /// The sales screen together with a notice sink in the current language.
    pub fn sales_mut(&mut self) -> (&mut SalesScreen, Feedback<'_>) {
        let feedback = Feedback::new(&mut self.notifier, self.state.language);
        (&mut self.sales, feedback)
    }

    // =========================================================================
    // Shell
    // =========================================================================

    /// Switches tab by id. Leaving the sales tab discards the draft.
    pub fn navigate(&mut self, tab_id: &str) -> AppResult<Tab> {
        let tab: Tab = tab_id.parse()?;
        let change = self.state.navigate(tab);

        if change.left(Tab::Sales) {
            info!(to = %change.to, "Left sales screen, discarding draft");
            self.sales.reset();
        }
        Ok(tab)
    }

    /// Updates connectivity. While offline the ledger refuses sales.
    pub fn set_offline(&mut self, offline: bool) {
        if !self.state.set_offline(offline) {
            return;
        }

        self.data.sales().set_available(!offline);
        let message = if offline {
            Message::OfflineMode
        } else {
            Message::ConnectionRestored
        };
        self.notifier.notify(&message, self.state.language);
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Starts a barcode scan in the background.
    ///
    /// Feed the received events to [`handle_capture`](Self::handle_capture).
    pub fn start_scan(&self) -> (JoinHandle<()>, mpsc::Receiver<CaptureEvent>) {
        let (tx, rx) = capture::channel(CAPTURE_CHANNEL_CAPACITY);
        (capture::spawn_barcode_scan(self.camera.clone(), tx), rx)
    }

    pub fn start_listening(&self) -> (JoinHandle<()>, mpsc::Receiver<CaptureEvent>) {
        let (tx, rx) = capture::channel(CAPTURE_CHANNEL_CAPACITY);
        (capture::spawn_voice_capture(self.microphone.clone(), tx), rx)
    }

    /// Stops the camera if a scan left it running.
    pub async fn stop_scan(&mut self) {
        if self.camera.is_active() {
            self.camera.stop().await;
            self.notifier
                .notify(&Message::ScannerStopped, self.state.language);
        }
    }

    pub fn handle_capture(&mut self, event: CaptureEvent) {
        let (sales, mut feedback) = self.sales_mut();
        sales.handle_capture(event, &mut feedback);
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    pub fn store_ranking(&self, by: RankBy) -> Vec<StoreRanking> {
        rank_stores(self.data.store_metrics(), by)
    }

    pub fn seller_ranking(&self) -> Vec<SellerRanking> {
        rank_sellers(&self.data.users().list())
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tiresaas_data=trace` - Trace one crate only
/// - Default: INFO, DEBUG for the tiresaas crates
///
/// Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tiresaas=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiresaas_core::PaymentMethod;

    fn app_with_readings(codes: &[&str]) -> App {
        let camera = SimulatedCamera::new(Duration::from_millis(10)).with_readings(codes.iter().copied());
        let microphone = SimulatedMicrophone::new(Duration::from_millis(10)).with_phrases(["continental"]);
        App::with_devices(
            AppConfig::default(),
            DataStore::seeded(),
            Arc::new(camera),
            Arc::new(microphone),
        )
    }

    #[test]
    fn test_leaving_sales_discards_draft() {
        let mut app = app_with_readings(&[]);
        app.navigate("sales").unwrap();

        {
            let (sales, mut feedback) = app.sales_mut();
            sales.add_by_code("7891234567892", 1, None, &mut feedback);
        }
        app.navigate("sales").unwrap();
        assert_eq!(app.sales().draft().lines().len(), 1);

        app.navigate("ranking").unwrap();
        assert!(app.sales().draft().is_empty());
        assert_eq!(app.state().active_tab, Tab::Ranking);
    }

    #[test]
    fn test_unknown_tab_is_error() {
        let mut app = app_with_readings(&[]);
        assert!(matches!(app.navigate("checkout"), Err(AppError::UnknownTab(_))));
        assert_eq!(app.state().active_tab, Tab::Dashboard);
    }

    #[test]
    fn test_offline_blocks_recording() {
        let mut app = app_with_readings(&[]);
        app.set_offline(true);
        app.set_offline(true);
        assert_eq!(app.notifier().len(), 1);
        assert!(!app.data().sales().is_available());

        {
            let (sales, mut feedback) = app.sales_mut();
            sales.add_by_code("7891234567892", 1, None, &mut feedback);
            sales.set_buyer("Carlos Pereira");
            sales.set_seller("user-pedro");
            sales.set_payment_method(Some(PaymentMethod::Card));
            assert!(!sales.finalize(&mut feedback).unwrap().is_recorded());
        }

        app.set_offline(false);
        assert!(app.data().sales().is_available());
        assert_eq!(app.notifier().latest().unwrap().title, "Conexão restaurada");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_flows_into_sales_screen() {
        let mut app = app_with_readings(&["7891234567890"]);
        let (task, mut events) = app.start_scan();
        task.await.unwrap();

        while let Some(event) = events.recv().await {
            app.handle_capture(event);
        }

        assert_eq!(
            app.sales().pending().unwrap().product_code,
            "7891234567890"
        );
        assert_eq!(app.sales().history().len(), 1);

        app.stop_scan().await;
        assert_eq!(app.notifier().latest().unwrap().title, "Produto encontrado!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_flows_into_sales_screen() {
        let mut app = app_with_readings(&[]);
        let (_task, mut events) = app.start_listening();

        let event = events.recv().await.unwrap();
        app.handle_capture(event);

        assert_eq!(
            app.sales().pending().unwrap().product_code,
            "7891234567892"
        );
    }

    #[test]
    fn test_rankings() {
        let app = App::new(AppConfig::default(), DataStore::seeded());
        let stores = app.store_ranking(RankBy::Sales);
        assert_eq!(stores.len(), 4);
        assert_eq!(stores[0].position, 1);

        let sellers = app.seller_ranking();
        assert_eq!(sellers[0].user_id, "user-maria");
        assert!(sellers.iter().all(|s| s.user_id != "user-ana"));
    }
}
