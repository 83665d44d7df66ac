use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

/// One captured camera frame. Opaque to this crate; only the plugin reads `data`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Outcome of handing a frame to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Queued,
    /// An older frame was still waiting for inference; it was discarded and
    /// this one took its place.
    Replaced,
    /// The dispatcher has shut down.
    Closed,
}

type Slot = Arc<Mutex<Option<Frame>>>;

fn lock(slot: &Mutex<Option<Frame>>) -> MutexGuard<'_, Option<Frame>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Capture-side end of the frame hand-off. Never blocks.
#[derive(Clone)]
pub struct FrameSink {
    slot: Slot,
    wake: mpsc::Sender<()>,
    dropped: Arc<AtomicU64>,
}

/// Dispatch-side end of the frame hand-off.
pub(crate) struct FrameSource {
    slot: Slot,
    wake: mpsc::Receiver<()>,
}

/// Single-slot frame hand-off: at most one frame waits while the plugin is
/// busy, and it is always the newest one submitted.
pub(crate) fn frame_channel() -> (FrameSink, FrameSource, Arc<AtomicU64>) {
    let slot: Slot = Arc::new(Mutex::new(None));
    let (wake_tx, wake_rx) = mpsc::channel(1);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        FrameSink {
            slot: Arc::clone(&slot),
            wake: wake_tx,
            dropped: Arc::clone(&dropped),
        },
        FrameSource {
            slot,
            wake: wake_rx,
        },
        dropped,
    )
}

impl FrameSink {
    pub fn submit(&self, frame: Frame) -> Submit {
        if self.wake.is_closed() {
            return Submit::Closed;
        }

        let sequence = frame.sequence;
        let stale = lock(&self.slot).replace(frame);

        // A full wake channel means the dispatcher has a pending wake-up and
        // will pick up the slot on its own.
        if let Err(TrySendError::Closed(())) = self.wake.try_send(()) {
            return Submit::Closed;
        }

        match stale {
            Some(stale) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(
                    sequence = stale.sequence,
                    replaced_by = sequence,
                    "dispatcher busy, stale frame dropped"
                );
                Submit::Replaced
            }
            None => Submit::Queued,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.wake.is_closed()
    }

    /// Frames discarded so far because the dispatcher was busy.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl FrameSource {
    /// Block until a frame is waiting and take it. Returns `None` once every
    /// [`FrameSink`] is gone and no frame is left.
    pub(crate) fn blocking_recv(&mut self) -> Option<Frame> {
        loop {
            self.wake.blocking_recv()?;
            // The frame behind a wake-up may already have been taken along
            // with an earlier one.
            if let Some(frame) = lock(&self.slot).take() {
                return Some(frame);
            }
        }
    }

    #[cfg(test)]
    fn try_recv(&mut self) -> Option<Frame> {
        self.wake.try_recv().ok()?;
        lock(&self.slot).take()
    }
}
