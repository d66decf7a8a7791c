//! # Demo Sale
//!
//! Scripted walkthrough of the sales screen against the seeded store:
//! scan a tire, add lines, finalize, then print the notices and rankings.
//!
//! ```text
//! demo-sale [CONFIG_PATH]
//! ```
//!
//! `RUST_LOG` and the `TIRESAAS_*` variables apply as usual.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tiresaas_app::config::AppConfig;
use tiresaas_app::devices::{SimulatedCamera, SimulatedMicrophone};
use tiresaas_app::{init_tracing, App, AppResult};
use tiresaas_core::ranking::RankBy;
use tiresaas_core::{Money, PaymentMethod};
use tiresaas_data::DataStore;

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing();

    let config = AppConfig::load(std::env::args().nth(1).map(PathBuf::from))?;
    let camera = SimulatedCamera::new(Duration::from_millis(config.devices.scan_delay_ms))
        .with_readings(["7891234567890"]);
    let microphone =
        SimulatedMicrophone::new(Duration::from_millis(config.devices.listen_delay_ms))
            .with_phrases(["continental"]);

    let mut app = App::with_devices(
        config,
        DataStore::seeded(),
        Arc::new(camera),
        Arc::new(microphone),
    );
    app.navigate("sales")?;

    info!("Scanning a tire");
    let (scan, mut events) = app.start_scan();
    while let Some(event) = events.recv().await {
        app.handle_capture(event);
    }
    let _ = scan.await;

    {
        let (sales, mut feedback) = app.sales_mut();
        sales.edit_pending(|line| {
            line.quantity = 2;
            line.lot_id = Some("L240120".to_string());
        });
        sales.add_pending(&mut feedback);
    }

    info!("Listening for a product name");
    let (listen, mut events) = app.start_listening();
    while let Some(event) = events.recv().await {
        app.handle_capture(event);
    }
    let _ = listen.await;

    {
        let (sales, mut feedback) = app.sales_mut();
        sales.edit_pending(|line| line.quantity = 4);
        sales.add_pending(&mut feedback);

        sales.set_buyer("Carlos Pereira");
        sales.set_seller("user-maria");
        sales.set_payment_method(Some(PaymentMethod::Pix));
        sales.set_discount(Money::from_major_minor(20, 0), &mut feedback);

        if let Some(finalized) = sales.finalize(&mut feedback) {
            println!(
                "Receipt {}: {} lines, total {}",
                finalized.sale.receipt_number,
                finalized.sale.lines.len(),
                finalized.sale.totals.total
            );
        }
    }

    println!("\nNotices:");
    for notice in app.notifier().notices() {
        println!("  [{:?}] {} - {}", notice.level, notice.title, notice.description);
    }

    println!("\nStores by profit:");
    for row in app.store_ranking(RankBy::Profit) {
        println!(
            "  {}. {} ({})",
            row.position,
            row.metrics.store_name,
            app.config().format_currency(row.metrics.profit())
        );
    }

    println!("\nSellers:");
    for row in app.seller_ranking() {
        println!("  {}. {} - {} pts", row.position, row.name, row.points);
    }

    Ok(())
}
