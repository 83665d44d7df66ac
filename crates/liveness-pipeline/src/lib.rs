//! Per-frame pipeline: camera frames go to the inference plugin on a dedicated
//! thread, and each result replaces the previous one in a shared cell that the
//! render loop watches.

pub mod capture;
pub mod dispatcher;
pub mod frame;
pub mod plugin;
pub mod state;

pub use capture::{negotiate_view, CaptureDevice, CaptureError, CaptureFormat};
pub use dispatcher::{spawn_dispatcher, DispatchError, DispatchStats, Dispatcher, DispatcherHandle};
pub use frame::{Frame, FrameSink, Submit};
pub use plugin::{LivenessPlugin, PluginError};
pub use state::{detection_cell, DetectionPublisher, LatestDetection, SharedDetection};
