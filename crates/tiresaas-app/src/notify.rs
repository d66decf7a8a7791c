//! # Notices
//!
//! Transient, dismissible messages shown to the seller. Every outcome on
//! the sales and scanner screens ends up here.
//!
//! ```text
//! SalesScreen ──► Message ──► Notifier::notify(message, language)
//!                                  │
//!                                  ▼
//!                      Notice { level, title, description }
//!                                  │
//!                        dismiss(id) / capacity evicts oldest
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::Language;

const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Something worth telling the seller about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ItemAdded { product: String, quantity: i64 },
    ItemRemoved,
    /// A line was rejected; carries the validation message.
    ItemRejected(String),
    LotRequired,
    NoItems,
    IncompleteSale,
    /// Finalize rejected for another reason (e.g. discount above subtotal).
    SaleRejected(String),
    SaleCompleted { total: String, profit: String },
    SaleNotRecorded(String),
    ProductFound(String),
    ProductNotFound(String),
    ScannerActive,
    ScannerStopped,
    CameraError(String),
    Heard(String),
    MicrophoneError(String),
    HistoryCleared,
    ConnectionRestored,
    OfflineMode,
}

impl Message {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Message::ItemRejected(_)
            | Message::LotRequired
            | Message::NoItems
            | Message::IncompleteSale
            | Message::SaleRejected(_)
            | Message::SaleNotRecorded(_)
            | Message::ProductNotFound(_)
            | Message::CameraError(_)
            | Message::MicrophoneError(_)
            | Message::OfflineMode => NoticeLevel::Error,
            _ => NoticeLevel::Info,
        }
    }

    pub fn title(&self, language: Language) -> &'static str {
        let pt = language == Language::Pt;
        match self {
            Message::ItemAdded { .. } => if pt { "Item adicionado" } else { "Item added" },
            Message::ItemRemoved => if pt { "Item removido" } else { "Item removed" },
            Message::ItemRejected(_) => if pt { "Campos obrigatórios" } else { "Required fields" },
            Message::LotRequired => if pt { "Lote obrigatório" } else { "Lot required" },
            Message::NoItems => if pt { "Nenhum item" } else { "No items" },
            Message::IncompleteSale => if pt { "Dados incompletos" } else { "Incomplete sale" },
            Message::SaleRejected(_) => if pt { "Venda inválida" } else { "Invalid sale" },
            Message::SaleCompleted { .. } => if pt { "Venda realizada!" } else { "Sale completed!" },
            Message::SaleNotRecorded(_) => if pt { "Venda não registrada" } else { "Sale not recorded" },
            Message::ProductFound(_) => if pt { "Produto encontrado!" } else { "Product found!" },
            Message::ProductNotFound(_) => if pt { "Produto não encontrado" } else { "Product not found" },
            Message::ScannerActive => if pt { "Scanner ativo" } else { "Scanner active" },
            Message::ScannerStopped => if pt { "Scanner desativado" } else { "Scanner stopped" },
            Message::CameraError(_) => if pt { "Erro na câmera" } else { "Camera error" },
            Message::Heard(_) => if pt { "Comando de voz" } else { "Voice command" },
            Message::MicrophoneError(_) => if pt { "Erro no microfone" } else { "Microphone error" },
            Message::HistoryCleared => if pt { "Histórico limpo" } else { "History cleared" },
            Message::ConnectionRestored => if pt { "Conexão restaurada" } else { "Connection restored" },
            Message::OfflineMode => if pt { "Modo offline ativado" } else { "Offline mode" },
        }
    }

    pub fn description(&self, language: Language) -> String {
        let pt = language == Language::Pt;
        match self {
            Message::ItemAdded { product, quantity } => {
                if pt {
                    format!("{} - Qtd: {}", product, quantity)
                } else {
                    format!("{} - Qty: {}", product, quantity)
                }
            }
            Message::ItemRemoved => pick(pt, "Item foi removido da venda", "Item was removed from the sale"),
            Message::ItemRejected(reason) | Message::SaleRejected(reason) => reason.clone(),
            Message::LotRequired => pick(
                pt,
                "Selecione o lote do produto para venda em lote",
                "Select the product lot for a sale by lot",
            ),
            Message::NoItems => pick(pt, "Adicione pelo menos um item à venda", "Add at least one item to the sale"),
            Message::IncompleteSale => pick(
                pt,
                "Preencha cliente, vendedor e forma de pagamento",
                "Fill in buyer, seller and payment method",
            ),
            Message::SaleCompleted { total, profit } => {
                if pt {
                    format!("Total: {} | Lucro: {}", total, profit)
                } else {
                    format!("Total: {} | Profit: {}", total, profit)
                }
            }
            Message::SaleNotRecorded(reason) => {
                if pt {
                    format!("A venda foi concluída, mas não foi salva: {}", reason)
                } else {
                    format!("The sale was completed but not saved: {}", reason)
                }
            }
            Message::ProductFound(name) => name.clone(),
            Message::ProductNotFound(code) => {
                if pt {
                    format!("Código \"{}\" não localizado no sistema", code)
                } else {
                    format!("Code \"{}\" was not found", code)
                }
            }
            Message::ScannerActive => pick(
                pt,
                "Aponte a câmera para o código de barras",
                "Point the camera at the barcode",
            ),
            Message::ScannerStopped => pick(pt, "Câmera foi desligada", "Camera was turned off"),
            Message::CameraError(reason) | Message::MicrophoneError(reason) => reason.clone(),
            Message::Heard(text) => format!("\"{}\"", text),
            Message::HistoryCleared => pick(
                pt,
                "Todos os produtos foram removidos da lista",
                "All products were removed from the list",
            ),
            Message::ConnectionRestored => pick(pt, "Sincronizando dados...", "Syncing data..."),
            Message::OfflineMode => pick(
                pt,
                "Os dados serão sincronizados quando a conexão for restaurada",
                "Data will sync when the connection is back",
            ),
        }
    }
}

fn pick(pt: bool, portuguese: &str, english: &str) -> String {
    let text = if pt { portuguese } else { english };
    text.to_string()
}

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: String,
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded queue of notices, oldest first.
#[derive(Debug, Clone)]
pub struct Notifier {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Notifier {
            notices: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Renders `message` in `language` and queues it.
    ///
    /// ## Returns
    /// The notice id, for [`dismiss`](Self::dismiss).
    pub fn notify(&mut self, message: &Message, language: Language) -> String {
        let notice = Notice {
            id: Uuid::new_v4().to_string(),
            level: message.level(),
            title: message.title(language).to_string(),
            description: message.description(language),
            created_at: Utc::now(),
        };

        match notice.level {
            NoticeLevel::Info => debug!(title = %notice.title, description = %notice.description, "Notice"),
            NoticeLevel::Error => warn!(title = %notice.title, description = %notice.description, "Error notice"),
        }

        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }

        let id = notice.id.clone();
        self.notices.push_back(notice);
        id
    }

    /// Removes a notice. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
