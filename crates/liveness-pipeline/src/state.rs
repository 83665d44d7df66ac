//! Latest-wins detection state shared between the dispatch thread and the
//! render loop.
//!
//! Exactly one writer ([`DetectionPublisher`]) replaces the value; readers
//! ([`LatestDetection`]) only ever see the most recent commit. Publishing never
//! blocks and is safe from any thread.

use std::sync::Arc;

use liveness_core::DetectionResult;
use tokio::sync::watch;

/// `None` means "no face detected".
pub type SharedDetection = Option<Arc<DetectionResult>>;

pub struct DetectionPublisher {
    tx: watch::Sender<SharedDetection>,
}

#[derive(Clone)]
pub struct LatestDetection {
    rx: watch::Receiver<SharedDetection>,
}

/// Create an empty state cell.
pub fn detection_cell() -> (DetectionPublisher, LatestDetection) {
    let (tx, rx) = watch::channel(None);
    (DetectionPublisher { tx }, LatestDetection { rx })
}

impl DetectionPublisher {
    /// Replace the current state. A result without a face clears it, so stale
    /// geometry is never held over. Returns whether a face is now shown.
    pub fn publish(&self, result: Option<DetectionResult>) -> bool {
        let next = result.filter(DetectionResult::has_face).map(Arc::new);
        let present = next.is_some();
        self.tx.send_replace(next);
        present
    }

    pub fn subscribe(&self) -> LatestDetection {
        LatestDetection {
            rx: self.tx.subscribe(),
        }
    }
}

impl LatestDetection {
    /// Most recent committed value.
    pub fn current(&self) -> SharedDetection {
        self.rx.borrow().clone()
    }

    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next update and return it. Intermediate values published
    /// while the caller was busy are skipped. Returns `None` once the
    /// publisher is gone.
    pub async fn changed(&mut self) -> Option<SharedDetection> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
