//! # Device Capabilities
//!
//! The camera and microphone the sales screen can use, behind traits so the
//! app never touches real hardware. Only simulated implementations ship.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BarcodeCamera                          Microphone                      │
//! │  ├── start()         permission check   └── listen()  → transcript      │
//! │  ├── read_barcode()  → code after delay                                 │
//! │  └── stop()                                                             │
//! │                                                                         │
//! │  SimulatedCamera / SimulatedMicrophone                                  │
//! │  ├── fixed delay (tokio::time::sleep)                                   │
//! │  ├── scripted readings, consumed front to back                          │
//! │  └── optional permission denial                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Camera => write!(f, "camera"),
            DeviceKind::Microphone => write!(f, "microphone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The user refused access.
    #[error("Permission to use the {0} was denied")]
    PermissionDenied(DeviceKind),

    /// The device was not started, or has no more input.
    #[error("The {0} is not available")]
    Unavailable(DeviceKind),

    /// The device ran but produced nothing usable.
    #[error("Nothing was recognized by the {0}")]
    NothingRecognized(DeviceKind),
}

// =============================================================================
// Traits
// =============================================================================

#[async_trait]
pub trait BarcodeCamera: Send + Sync {
    /// Acquires the camera.
    async fn start(&self) -> Result<(), DeviceError>;

    /// Waits for the next barcode in view.
    async fn read_barcode(&self) -> Result<String, DeviceError>;

    /// Releases the camera. Safe to call when not started.
    async fn stop(&self);

    fn is_active(&self) -> bool;
}

#[async_trait]
pub trait Microphone: Send + Sync {
    /// Listens for one utterance and returns its transcript.
    async fn listen(&self) -> Result<String, DeviceError>;
}

// =============================================================================
// Simulated Camera
// =============================================================================

/// Camera that "reads" scripted codes after a fixed delay.
#[derive(Debug)]
pub struct SimulatedCamera {
    delay: Duration,
    readings: Mutex<VecDeque<String>>,
    denied: bool,
    active: AtomicBool,
}

impl SimulatedCamera {
    pub fn new(delay: Duration) -> Self {
        SimulatedCamera {
            delay,
            readings: Mutex::new(VecDeque::new()),
            denied: false,
            active: AtomicBool::new(false),
        }
    }

    /// Queues codes returned by successive reads.
    pub fn with_readings<I, S>(self, readings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(readings.into_iter().map(Into::into));
        self
    }

    /// Makes every `start` fail as if the user refused access.
    pub fn deny_permission(mut self) -> Self {
        self.denied = true;
        self
    }
}

#[async_trait]
impl BarcodeCamera for SimulatedCamera {
    async fn start(&self) -> Result<(), DeviceError> {
        if self.denied {
            return Err(DeviceError::PermissionDenied(DeviceKind::Camera));
        }
        self.active.store(true, Ordering::SeqCst);
        debug!("Simulated camera started");
        Ok(())
    }

    async fn read_barcode(&self) -> Result<String, DeviceError> {
        if !self.is_active() {
            return Err(DeviceError::Unavailable(DeviceKind::Camera));
        }

        tokio::time::sleep(self.delay).await;

        let next = self
            .readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        debug!(code = ?next, "Simulated camera reading");
        next.ok_or(DeviceError::NothingRecognized(DeviceKind::Camera))
    }

    async fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            debug!("Simulated camera stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Simulated Microphone
// =============================================================================

/// Microphone that "hears" scripted phrases after a fixed delay.
#[derive(Debug)]
pub struct SimulatedMicrophone {
    delay: Duration,
    phrases: Mutex<VecDeque<String>>,
    denied: bool,
}

impl SimulatedMicrophone {
    pub fn new(delay: Duration) -> Self {
        SimulatedMicrophone {
            delay,
            phrases: Mutex::new(VecDeque::new()),
            denied: false,
        }
    }

    pub fn with_phrases<I, S>(self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(phrases.into_iter().map(Into::into));
        self
    }

    pub fn deny_permission(mut self) -> Self {
        self.denied = true;
        self
    }
}

#[async_trait]
impl Microphone for SimulatedMicrophone {
    async fn listen(&self) -> Result<String, DeviceError> {
        if self.denied {
            return Err(DeviceError::PermissionDenied(DeviceKind::Microphone));
        }

        tokio::time::sleep(self.delay).await;

        let phrase = self
            .phrases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .filter(|p| !p.trim().is_empty());
        debug!(phrase = ?phrase, "Simulated microphone transcript");
        phrase.ok_or(DeviceError::NothingRecognized(DeviceKind::Microphone))
    }
}
