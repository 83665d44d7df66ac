use liveness_core::{select_view, CameraError, View};
use thiserror::Error;

use crate::frame::FrameSink;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("capture already running")]
    AlreadyStarted,
    #[error("failed to start capture thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Requested capture resolution and frame rate. A hint; the device may
/// deliver something close to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 10,
        }
    }
}

/// The external camera capability: permission, device lookup, frame stream.
pub trait CaptureDevice {
    /// Permission already held, without prompting.
    fn has_permission(&self) -> bool;

    /// Prompt for permission. Returns whether it was granted.
    fn request_permission(&mut self) -> bool;

    /// Whether a front-facing camera exists.
    fn is_available(&self) -> bool;

    /// Start streaming frames into `sink` on the device's own thread. Frames
    /// keep coming until [`CaptureDevice::stop`] or the sink closes.
    fn start(&mut self, format: CaptureFormat, sink: FrameSink) -> Result<(), CaptureError>;

    fn stop(&mut self);
}

/// Resolve permission and device availability into the view to display,
/// prompting for permission only when it is not already held.
pub fn negotiate_view<D: CaptureDevice + ?Sized>(device: &mut D) -> View {
    let has_permission = device.has_permission();
    let request_granted = has_permission || device.request_permission();
    let view = select_view(has_permission, request_granted, device.is_available());
    tracing::debug!(has_permission, request_granted, ?view, "camera view negotiated");
    view
}
