//! # Capture Tasks
//!
//! Fire-and-forget device work. Each capture runs as its own tokio task and
//! reports back over a channel, so nothing waits on a camera or microphone.
//!
//! ```text
//!  spawn_barcode_scan ──► tokio task ─┐
//!                                     ├──► mpsc::Sender<CaptureEvent> ──► SalesScreen::handle_capture
//!  spawn_voice_capture ─► tokio task ─┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::devices::{BarcodeCamera, DeviceError, DeviceKind, Microphone};

/// Result of one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The camera started and is looking for a code.
    CameraStarted,
    Barcode(String),
    Transcript(String),
    Failed { device: DeviceKind, error: DeviceError },
}

/// Creates the channel capture tasks report on.
pub fn channel(capacity: usize) -> (mpsc::Sender<CaptureEvent>, mpsc::Receiver<CaptureEvent>) {
    mpsc::channel(capacity.max(1))
}

/// Starts the camera, reads one barcode and stops the camera.
///
/// Sends `CameraStarted` once the camera is acquired, then either
/// `Barcode` or `Failed`.
pub fn spawn_barcode_scan(
    camera: Arc<dyn BarcodeCamera>,
    events: mpsc::Sender<CaptureEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match camera.start().await {
            Ok(()) => {
                send(&events, CaptureEvent::CameraStarted).await;
                let reading = camera.read_barcode().await;
                camera.stop().await;
                match reading {
                    Ok(code) => CaptureEvent::Barcode(code),
                    Err(error) => CaptureEvent::Failed {
                        device: DeviceKind::Camera,
                        error,
                    },
                }
            }
            Err(error) => CaptureEvent::Failed {
                device: DeviceKind::Camera,
                error,
            },
        };

        send(&events, event).await;
    })
}

/// Listens for one utterance.
pub fn spawn_voice_capture(
    microphone: Arc<dyn Microphone>,
    events: mpsc::Sender<CaptureEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match microphone.listen().await {
            Ok(text) => CaptureEvent::Transcript(text),
            Err(error) => CaptureEvent::Failed {
                device: DeviceKind::Microphone,
                error,
            },
        };

        send(&events, event).await;
    })
}

async fn send(events: &mpsc::Sender<CaptureEvent>, event: CaptureEvent) {
    if events.send(event).await.is_err() {
        // The screen went away; the result is no longer wanted.
        debug!("Capture event dropped, receiver closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{SimulatedCamera, SimulatedMicrophone};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_barcode_scan_reports_code() {
        let camera = Arc::new(SimulatedCamera::new(Duration::from_secs(3)).with_readings(["7891234567890"]));
        let (tx, mut rx) = channel(4);

        spawn_barcode_scan(camera.clone(), tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(CaptureEvent::CameraStarted));
        assert_eq!(
            rx.recv().await,
            Some(CaptureEvent::Barcode("7891234567890".into()))
        );
        assert!(!camera.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_camera_reports_failure() {
        let camera = Arc::new(SimulatedCamera::new(Duration::ZERO).deny_permission());
        let (tx, mut rx) = channel(4);

        spawn_barcode_scan(camera, tx);

        assert_eq!(
            rx.recv().await,
            Some(CaptureEvent::Failed {
                device: DeviceKind::Camera,
                error: DeviceError::PermissionDenied(DeviceKind::Camera),
            })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_capture() {
        let mic = Arc::new(SimulatedMicrophone::new(Duration::from_secs(2)).with_phrases(["bridgestone"]));
        let (tx, mut rx) = channel(1);

        spawn_voice_capture(mic, tx);
        assert_eq!(
            rx.recv().await,
            Some(CaptureEvent::Transcript("bridgestone".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_receiver_does_not_panic() {
        let mic = Arc::new(SimulatedMicrophone::new(Duration::ZERO).with_phrases(["x"]));
        let (tx, rx) = channel(1);
        drop(rx);

        spawn_voice_capture(mic, tx).await.unwrap();
    }
}
