use std::any::Any;

use liveness_core::DetectionResult;
use thiserror::Error;

use crate::frame::Frame;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("malformed plugin output: {0}")]
    Malformed(String),
    #[error("plugin panicked: {0}")]
    Panicked(String),
}

impl PluginError {
    /// Wrap a payload caught from a panicking plugin call.
    pub(crate) fn from_panic(payload: &(dyn Any + Send + 'static)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        PluginError::Panicked(message)
    }
}

/// The external liveness inference capability.
///
/// Called once per frame on the dispatch thread. The frame is borrowed for
/// the duration of the call only.
pub trait LivenessPlugin: Send + 'static {
    fn liveness(&mut self, frame: &Frame) -> Result<DetectionResult, PluginError>;
}

impl<F> LivenessPlugin for F
where
    F: FnMut(&Frame) -> Result<DetectionResult, PluginError> + Send + 'static,
{
    fn liveness(&mut self, frame: &Frame) -> Result<DetectionResult, PluginError> {
        self(frame)
    }
}
