//! # Sample Records
//!
//! The records a fresh [`DataStore`](crate::DataStore) starts with: three
//! tires, three stores, four staff members and one month of leaderboard
//! figures.
//!
//! Ids are stable so that users can reference their store.

use chrono::{DateTime, NaiveDate, Utc};
use tiresaas_core::ranking::StoreMetrics;
use tiresaas_core::{Money, Product, Role, Store, StoreStatus, User, UserStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn login(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    date(y, m, d).and_hms_opt(9, 0, 0).map(|dt| dt.and_utc())
}

fn lots(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|l| l.to_string()).collect()
}

/// Tires in the catalog.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "prod-1".into(),
            code: "7891234567890".into(),
            name: "Pneu Michelin Energy XM2 195/65 R15".into(),
            brand: "Michelin".into(),
            category: "Pneu Aro 15".into(),
            price_cents: 25000,
            cost_cents: 18000,
            stock: 12,
            lots: lots(&["L240115", "L240120", "L240125"]),
            lot_tracked: true,
        },
        Product {
            id: "prod-2".into(),
            code: "7891234567891".into(),
            name: "Pneu Bridgestone Turanza ER300 205/55 R16".into(),
            brand: "Bridgestone".into(),
            category: "Pneu Aro 16".into(),
            price_cents: 32000,
            cost_cents: 23000,
            stock: 8,
            lots: lots(&["L240118", "L240122", "L240128"]),
            lot_tracked: true,
        },
        Product {
            id: "prod-3".into(),
            code: "7891234567892".into(),
            name: "Pneu Continental ContiPowerContact 185/60 R14".into(),
            brand: "Continental".into(),
            category: "Pneu Aro 14".into(),
            price_cents: 23000,
            cost_cents: 16500,
            stock: 15,
            lots: lots(&["L240112", "L240119", "L240126"]),
            lot_tracked: false,
        },
    ]
}

pub fn sample_stores() -> Vec<Store> {
    vec![
        Store {
            id: "loja-centro".into(),
            name: "Loja Centro".into(),
            address: "Rua das Flores, 123 - Centro".into(),
            phone: "(11) 9999-0001".into(),
            email: "centro@tiresaas.com".into(),
            manager: "Maria Santos".into(),
            employees: 5,
            stock_units: 350,
            monthly_sales_cents: Money::from_major_minor(25000, 0).cents(),
            status: StoreStatus::Active,
            opened_on: date(2024, 1, 15),
        },
        Store {
            id: "loja-norte".into(),
            name: "Loja Norte".into(),
            address: "Av. Norte, 456 - Zona Norte".into(),
            phone: "(11) 9999-0002".into(),
            email: "norte@tiresaas.com".into(),
            manager: "João Silva".into(),
            employees: 3,
            stock_units: 280,
            monthly_sales_cents: Money::from_major_minor(22000, 0).cents(),
            status: StoreStatus::Active,
            opened_on: date(2024, 2, 1),
        },
        Store {
            id: "loja-sul".into(),
            name: "Loja Sul".into(),
            address: "Rua Sul, 789 - Zona Sul".into(),
            phone: "(11) 9999-0003".into(),
            email: "sul@tiresaas.com".into(),
            manager: "Pedro Costa".into(),
            employees: 4,
            stock_units: 195,
            monthly_sales_cents: Money::from_major_minor(18000, 0).cents(),
            status: StoreStatus::Maintenance,
            opened_on: date(2024, 2, 15),
        },
    ]
}

pub fn sample_users() -> Vec<User> {
    vec![
        User {
            id: "user-joao".into(),
            name: "João Silva".into(),
            email: "joao@tiresaas.com".into(),
            phone: "(11) 99999-0001".into(),
            role: Role::Owner,
            store_id: None,
            status: UserStatus::Active,
            monthly_sales: 15,
            points: 1250,
            joined_on: date(2024, 1, 10),
            last_login: login(2024, 1, 25),
        },
        User {
            id: "user-maria".into(),
            name: "Maria Santos".into(),
            email: "maria@tiresaas.com".into(),
            phone: "(11) 99999-0002".into(),
            role: Role::Manager,
            store_id: Some("loja-centro".into()),
            status: UserStatus::Active,
            monthly_sales: 23,
            points: 1850,
            joined_on: date(2024, 1, 15),
            last_login: login(2024, 1, 25),
        },
        User {
            id: "user-pedro".into(),
            name: "Pedro Costa".into(),
            email: "pedro@tiresaas.com".into(),
            phone: "(11) 99999-0003".into(),
            role: Role::Seller,
            store_id: Some("loja-norte".into()),
            status: UserStatus::Active,
            monthly_sales: 18,
            points: 1100,
            joined_on: date(2024, 2, 1),
            last_login: login(2024, 1, 24),
        },
        User {
            id: "user-ana".into(),
            name: "Ana Oliveira".into(),
            email: "ana@tiresaas.com".into(),
            phone: "(11) 99999-0004".into(),
            role: Role::Seller,
            store_id: Some("loja-centro".into()),
            status: UserStatus::Inactive,
            monthly_sales: 12,
            points: 950,
            joined_on: date(2024, 2, 10),
            last_login: login(2024, 1, 20),
        },
    ]
}

/// Month figures for the store leaderboard.
pub fn sample_store_metrics() -> Vec<StoreMetrics> {
    let metrics = |id: &str,
                   name: &str,
                   sales: i64,
                   costs: i64,
                   demand: u32,
                   goal: i64,
                   growth_bps: i64,
                   efficiency_bps: i64| StoreMetrics {
        store_id: id.to_string(),
        store_name: name.to_string(),
        sales: Money::from_major_minor(sales, 0),
        costs: Money::from_major_minor(costs, 0),
        demand,
        goal: Money::from_major_minor(goal, 0),
        growth_bps,
        efficiency_bps,
    };

    vec![
        metrics("loja-centro", "Loja Centro", 89500, 62300, 145, 85000, 1250, 9200),
        metrics("loja-norte", "Loja Norte", 76800, 54600, 128, 75000, 830, 8800),
        metrics("loja-sul", "Loja Sul", 68200, 49800, 112, 70000, -210, 8200),
        metrics("loja-oeste", "Loja Oeste", 54300, 41200, 89, 60000, 570, 7600),
    ]
}
