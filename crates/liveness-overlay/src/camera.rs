//! Synthetic capture device: emits blank YUV 4:2:0 frames at the requested
//! rate so the pipeline can run without camera hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use liveness_core::CameraError;
use liveness_pipeline::{CaptureDevice, CaptureError, CaptureFormat, Frame, FrameSink, Submit};

use crate::config::PermissionMode;

struct Session {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<u64>,
}

pub struct SyntheticCamera {
    permission: PermissionMode,
    available: bool,
    /// Stop after this many frames (None = until stopped).
    frame_limit: Option<u64>,
    session: Option<Session>,
}

impl SyntheticCamera {
    pub fn new(permission: PermissionMode, available: bool, frame_limit: Option<u64>) -> Self {
        Self {
            permission,
            available,
            frame_limit,
            session: None,
        }
    }
}

fn yuv420_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3 / 2
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

impl CaptureDevice for SyntheticCamera {
    fn has_permission(&self) -> bool {
        self.permission == PermissionMode::Granted
    }

    fn request_permission(&mut self) -> bool {
        let granted = self.permission != PermissionMode::Denied;
        tracing::info!(granted, "camera permission requested");
        if granted {
            self.permission = PermissionMode::Granted;
        }
        granted
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, format: CaptureFormat, sink: FrameSink) -> Result<(), CaptureError> {
        if !self.available {
            return Err(CameraError::NoDevice.into());
        }
        if !self.has_permission() {
            return Err(CameraError::PermissionDenied.into());
        }
        if self.session.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let frame_limit = self.frame_limit;
        let interval = frame_interval(format.fps);

        let thread = std::thread::Builder::new()
            .name("liveness-capture".into())
            .spawn(move || {
                tracing::info!(
                    width = format.width,
                    height = format.height,
                    fps = format.fps,
                    "capture started"
                );
                let mut sequence = 0u64;
                while !stop_flag.load(Ordering::Relaxed)
                    && frame_limit.map_or(true, |limit| sequence < limit)
                {
                    let frame = Frame {
                        sequence,
                        width: format.width,
                        height: format.height,
                        data: vec![0; yuv420_len(format.width, format.height)],
                    };
                    if sink.submit(frame) == Submit::Closed {
                        tracing::debug!("frame sink closed");
                        break;
                    }
                    sequence += 1;
                    std::thread::sleep(interval);
                }
                tracing::info!(frames = sequence, dropped = sink.dropped(), "capture stopped");
                sequence
            })
            .map_err(CaptureError::Spawn)?;

        self.session = Some(Session { stop, thread });
        Ok(())
    }

    fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        session.stop.store(true, Ordering::Relaxed);
        if session.thread.join().is_err() {
            tracing::error!("capture thread panicked");
        }
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveness_core::DetectionResult;
    use liveness_pipeline::{spawn_dispatcher, PluginError};

    fn fast_format() -> CaptureFormat {
        CaptureFormat {
            width: 8,
            height: 4,
            fps: 1000,
        }
    }

    #[test]
    fn test_frame_buffer_size() {
        assert_eq!(yuv420_len(1280, 720), 1_382_400);
        assert_eq!(frame_interval(10), Duration::from_millis(100));
        assert_eq!(frame_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_permission_modes() {
        let mut cam = SyntheticCamera::new(PermissionMode::Prompt, true, None);
        assert!(!cam.has_permission());
        assert!(cam.request_permission());
        assert!(cam.has_permission());

        let mut cam = SyntheticCamera::new(PermissionMode::Denied, true, None);
        assert!(!cam.request_permission());
        assert!(!cam.has_permission());
    }

    #[test]
    fn test_start_refused_without_device() {
        let (sink, handle) = spawn_dispatcher(|_: &Frame| -> Result<DetectionResult, PluginError> {
            Ok(DetectionResult::default())
        })
        .unwrap();
        let mut cam = SyntheticCamera::new(PermissionMode::Granted, false, None);
        let err = cam.start(fast_format(), sink).unwrap_err();
        assert!(matches!(err, CaptureError::Camera(CameraError::NoDevice)));
        handle.join().unwrap();
    }

    #[test]
    fn test_frame_limit_ends_pipeline() {
        let (sink, handle) = spawn_dispatcher(|_: &Frame| -> Result<DetectionResult, PluginError> {
            Ok(DetectionResult::default())
        })
        .unwrap();
        let mut cam = SyntheticCamera::new(PermissionMode::Granted, true, Some(5));
        cam.start(fast_format(), sink).unwrap();

        // The capture thread owns the only sink; it drops it after five frames.
        let stats = handle.join().unwrap();
        assert_eq!(stats.processed + stats.dropped, 5);
        assert_eq!(stats.detections, 0);
        cam.stop();
    }

    #[test]
    fn test_second_start_rejected() {
        let (sink, handle) = spawn_dispatcher(|_: &Frame| -> Result<DetectionResult, PluginError> {
            Ok(DetectionResult::default())
        })
        .unwrap();
        let mut cam = SyntheticCamera::new(PermissionMode::Granted, true, None);
        cam.start(fast_format(), sink.clone()).unwrap();
        assert!(matches!(
            cam.start(fast_format(), sink),
            Err(CaptureError::AlreadyStarted)
        ));
        cam.stop();
        handle.join().unwrap();
    }
}
