//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TIRESAAS_STORE_ID=loja-norte                                       │
//! │     TIRESAAS_LOT_POLICY=per_product                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tiresaas/tiresaas.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tiresaas.tiresaas/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Loja Centro, per-sale lots, Portuguese, light theme                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tiresaas.toml
//! [store]
//! id = "loja-centro"
//! name = "Loja Centro"
//!
//! [sales]
//! lot_policy = "per_sale"   # per_sale | per_product
//! lot_tracking = false      # initial state of the "sell by lot" switch
//! currency_symbol = "R$"
//!
//! [ui]
//! language = "pt"           # pt | en
//! theme = "light"           # light | dark
//!
//! [devices]
//! scan_delay_ms = 3000
//! listen_delay_ms = 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use tiresaas_core::sale::LotPolicy;
use tiresaas_core::Money;

use crate::error::{AppError, AppResult};
use crate::state::{Language, Theme};

/// Longest simulated device delay accepted.
const MAX_DEVICE_DELAY_MS: u64 = 60_000;

// =============================================================================
// Sections
// =============================================================================

/// The store this terminal sells for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub id: String,

    #[serde(default)]
    pub name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            id: "loja-centro".to_string(),
            name: "Loja Centro".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSettings {
    /// When a line must name a lot.
    #[serde(default)]
    pub lot_policy: LotPolicy,

    /// Initial state of the sale-level lot switch.
    #[serde(default)]
    pub lot_tracking: bool,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for SalesSettings {
    fn default() -> Self {
        SalesSettings {
            lot_policy: LotPolicy::default(),
            lot_tracking: false,
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub theme: Theme,
}

/// Timing of the simulated camera and microphone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Time from camera start to a barcode reading.
    #[serde(default = "default_scan_delay")]
    pub scan_delay_ms: u64,

    /// Time the microphone listens before producing a transcript.
    #[serde(default = "default_listen_delay")]
    pub listen_delay_ms: u64,
}

fn default_scan_delay() -> u64 {
    3000
}

fn default_listen_delay() -> u64 {
    2000
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            scan_delay_ms: default_scan_delay(),
            listen_delay_ms: default_listen_delay(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
///
/// ## Example
/// ```rust
/// use tiresaas_app::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.store.name, "Loja Centro");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub sales: SalesSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub devices: DeviceSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file, then environment
    /// overrides, then validation.
    ///
    /// A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as pretty TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Checks the values a file or the environment could have broken.
    pub fn validate(&self) -> AppResult<()> {
        if self.store.id.trim().is_empty() {
            return Err(AppError::InvalidConfig("store.id must not be empty".into()));
        }

        if self.sales.currency_symbol.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "sales.currency_symbol must not be empty".into(),
            ));
        }

        for (name, value) in [
            ("devices.scan_delay_ms", self.devices.scan_delay_ms),
            ("devices.listen_delay_ms", self.devices.listen_delay_ms),
        ] {
            if value > MAX_DEVICE_DELAY_MS {
                return Err(AppError::InvalidConfig(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_DEVICE_DELAY_MS, value
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `TIRESAAS_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("TIRESAAS_STORE_ID") {
            debug!(store_id = %id, "Overriding store ID from environment");
            self.store.id = id;
        }

        if let Some(name) = lookup("TIRESAAS_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(language) = lookup("TIRESAAS_LANGUAGE") {
            match language.parse() {
                Ok(parsed) => self.ui.language = parsed,
                Err(_) => warn!(language = %language, "Unknown language in environment"),
            }
        }

        if let Some(theme) = lookup("TIRESAAS_THEME") {
            match theme.parse() {
                Ok(parsed) => self.ui.theme = parsed,
                Err(_) => warn!(theme = %theme, "Unknown theme in environment"),
            }
        }

        if let Some(policy) = lookup("TIRESAAS_LOT_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(lot_policy = %policy, "Overriding lot policy from environment");
                    self.sales.lot_policy = parsed;
                }
                Err(_) => warn!(lot_policy = %policy, "Unknown lot policy in environment"),
            }
        }

        if let Some(delay) = lookup("TIRESAAS_SCAN_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.devices.scan_delay_ms = ms,
                Err(_) => warn!(scan_delay_ms = %delay, "Invalid scan delay in environment"),
            }
        }

        if let Some(delay) = lookup("TIRESAAS_LISTEN_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.devices.listen_delay_ms = ms,
                Err(_) => warn!(listen_delay_ms = %delay, "Invalid listen delay in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tiresaas", "tiresaas")
            .map(|dirs| dirs.config_dir().join("tiresaas.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Formats an amount with the configured currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{} {}.{:02}",
            sign,
            self.sales.currency_symbol,
            amount.major().abs(),
            amount.minor_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
