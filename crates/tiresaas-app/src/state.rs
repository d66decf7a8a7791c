//! # Application State
//!
//! The shell-level state every screen reads: active tab, theme, language
//! and connectivity. Owned by [`App`](crate::App) and passed explicitly.
//!
//! ## Tab Navigation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  "dashboard" "sales" "stores" "users" "reports" "scanner" "ranking"    │
//! │       │                                                                 │
//! │       ▼  Tab::from_str                                                  │
//! │  AppState::navigate(tab) ──► TabChange { from, to }                     │
//! │                                   │                                     │
//! │                  left(Tab::Sales)?│── yes ──► sales draft is discarded  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// =============================================================================
// Language
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Brazilian Portuguese.
    #[default]
    Pt,
    En,
}

impl Language {
    pub const fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    /// Shell labels in this language.
    pub const fn labels(&self) -> &'static Labels {
        match self {
            Language::Pt => &PT_LABELS,
            Language::En => &EN_LABELS,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" | "portugues" | "português" => Ok(Language::Pt),
            "en" | "en-us" | "en_us" | "english" => Ok(Language::En),
            other => Err(AppError::InvalidConfig(format!(
                "Unknown language: '{}'. Valid options: pt, en",
                other
            ))),
        }
    }
}

/// Static translation table for the shell.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static str,
    pub dashboard: &'static str,
    pub sales: &'static str,
    pub stores: &'static str,
    pub users: &'static str,
    pub reports: &'static str,
    pub scanner: &'static str,
    pub ranking: &'static str,
    pub offline: &'static str,
}

const PT_LABELS: Labels = Labels {
    title: "TireSaaS - Gestão Inteligente de Pneus",
    dashboard: "Dashboard",
    sales: "Vendas",
    stores: "Lojas",
    users: "Usuários",
    reports: "Relatórios",
    scanner: "Scanner",
    ranking: "Ranking",
    offline: "Offline",
};

const EN_LABELS: Labels = Labels {
    title: "TireSaaS - Smart Tire Management",
    dashboard: "Dashboard",
    sales: "Sales",
    stores: "Stores",
    users: "Users",
    reports: "Reports",
    scanner: "Scanner",
    ranking: "Ranking",
    offline: "Offline",
};

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "claro" => Ok(Theme::Light),
            "dark" | "escuro" => Ok(Theme::Dark),
            other => Err(AppError::InvalidConfig(format!(
                "Unknown theme: '{}'. Valid options: light, dark",
                other
            ))),
        }
    }
}

// =============================================================================
// Tabs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    Sales,
    Stores,
    Users,
    Reports,
    Scanner,
    Ranking,
}

impl Tab {
    /// Tabs in navigation bar order.
    pub const ALL: [Tab; 7] = [
        Tab::Dashboard,
        Tab::Sales,
        Tab::Stores,
        Tab::Users,
        Tab::Reports,
        Tab::Scanner,
        Tab::Ranking,
    ];

    /// Identifier used by links and the navigation bar.
    pub const fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Sales => "sales",
            Tab::Stores => "stores",
            Tab::Users => "users",
            Tab::Reports => "reports",
            Tab::Scanner => "scanner",
            Tab::Ranking => "ranking",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        let labels = language.labels();
        match self {
            Tab::Dashboard => labels.dashboard,
            Tab::Sales => labels.sales,
            Tab::Stores => labels.stores,
            Tab::Users => labels.users,
            Tab::Reports => labels.reports,
            Tab::Scanner => labels.scanner,
            Tab::Ranking => labels.ranking,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == id)
            .ok_or(AppError::UnknownTab(id))
    }
}

/// Result of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabChange {
    pub from: Tab,
    pub to: Tab,
}

impl TabChange {
    /// True when the user moved off `tab` to a different one.
    pub fn left(&self, tab: Tab) -> bool {
        self.from == tab && self.to != tab
    }
}

// =============================================================================
// App State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub active_tab: Tab,
    pub theme: Theme,
    pub language: Language,
    pub offline: bool,
}

impl AppState {
    pub fn new(language: Language, theme: Theme) -> Self {
        AppState {
            language,
            theme,
            ..Self::default()
        }
    }

    pub fn navigate(&mut self, tab: Tab) -> TabChange {
        let change = TabChange {
            from: self.active_tab,
            to: tab,
        };
        self.active_tab = tab;
        change
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Updates connectivity. Returns whether it changed.
    pub fn set_offline(&mut self, offline: bool) -> bool {
        let changed = self.offline != offline;
        self.offline = offline;
        changed
    }

    pub fn labels(&self) -> &'static Labels {
        self.language.labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_ids_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(tab.id().parse::<Tab>().unwrap(), tab);
        }
        assert_eq!(" Sales ".parse::<Tab>().unwrap(), Tab::Sales);
        assert!(matches!("checkout".parse::<Tab>(), Err(AppError::UnknownTab(_))));
    }

    #[test]
    fn test_navigate_reports_leaving_sales() {
        let mut state = AppState::default();
        assert_eq!(state.active_tab, Tab::Dashboard);

        assert!(!state.navigate(Tab::Sales).left(Tab::Sales));
        assert!(!state.navigate(Tab::Sales).left(Tab::Sales));
        assert!(state.navigate(Tab::Ranking).left(Tab::Sales));
        assert_eq!(state.active_tab, Tab::Ranking);
    }

    #[test]
    fn test_labels_follow_language() {
        let mut state = AppState::default();
        assert_eq!(Tab::Sales.label(state.language), "Vendas");

        state.set_language(Language::En);
        assert_eq!(Tab::Sales.label(state.language), "Sales");
        assert_eq!(state.labels().title, "TireSaaS - Smart Tire Management");
    }

    #[test]
    fn test_theme_and_offline() {
        let mut state = AppState::default();
        assert_eq!(state.toggle_theme(), Theme::Dark);
        assert_eq!(state.toggle_theme(), Theme::Light);

        assert!(state.set_offline(true));
        assert!(!state.set_offline(true));
        assert!(state.set_offline(false));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("pt-BR".parse::<Language>().unwrap(), Language::Pt);
        assert_eq!("english".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }
}
