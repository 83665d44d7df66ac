use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::frame::{frame_channel, Frame, FrameSink};
use crate::plugin::{LivenessPlugin, PluginError};
use crate::state::{detection_cell, DetectionPublisher, LatestDetection};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to spawn dispatch thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("dispatch thread panicked")]
    Panicked,
}

/// Counters reported when the dispatcher shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames handed to the plugin.
    pub processed: u64,
    /// Frames whose result contained a face.
    pub detections: u64,
    /// Frames whose plugin call failed (published as "no face").
    pub plugin_errors: u64,
    /// Frames discarded at submission because the plugin was busy.
    pub dropped: u64,
}

/// Runs the plugin for one frame at a time and publishes each result.
pub struct Dispatcher<P> {
    plugin: P,
    publisher: DetectionPublisher,
    stats: DispatchStats,
}

impl<P: LivenessPlugin> Dispatcher<P> {
    pub fn new(plugin: P, publisher: DetectionPublisher) -> Self {
        Self {
            plugin,
            publisher,
            stats: DispatchStats::default(),
        }
    }

    /// Run inference on `frame` and publish exactly once. A plugin error or
    /// panic is published as "no face"; it never stops the pipeline.
    pub fn process_frame(&mut self, frame: &Frame) -> bool {
        self.stats.processed += 1;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.plugin.liveness(frame)))
            .unwrap_or_else(|payload| Err(PluginError::from_panic(payload.as_ref())));
        let result = match outcome {
            Ok(result) => Some(result),
            Err(e) => {
                self.stats.plugin_errors += 1;
                tracing::warn!(sequence = frame.sequence, error = %e, "liveness plugin failed");
                None
            }
        };

        let present = self.publisher.publish(result);
        if present {
            self.stats.detections += 1;
        }
        tracing::trace!(sequence = frame.sequence, face = present, "frame processed");
        present
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

/// Handle to the dispatch thread.
pub struct DispatcherHandle {
    latest: LatestDetection,
    dropped: Arc<AtomicU64>,
    thread: JoinHandle<DispatchStats>,
}

impl DispatcherHandle {
    /// A reader of the latest-wins detection state.
    pub fn latest(&self) -> LatestDetection {
        self.latest.clone()
    }

    /// Wait for the thread to finish. It exits once every [`FrameSink`] has
    /// been dropped and the pending frame (if any) is processed.
    pub fn join(self) -> Result<DispatchStats, DispatchError> {
        let mut stats = self.thread.join().map_err(|_| DispatchError::Panicked)?;
        stats.dropped = self.dropped.load(Ordering::Relaxed);
        Ok(stats)
    }
}

/// Spawn the dispatcher on a dedicated OS thread so inference never runs on
/// the capture or render context.
///
/// Returns the capture-side [`FrameSink`] and a handle for reading results.
pub fn spawn_dispatcher<P: LivenessPlugin>(
    plugin: P,
) -> Result<(FrameSink, DispatcherHandle), DispatchError> {
    let (sink, mut frames, dropped) = frame_channel();
    let (publisher, latest) = detection_cell();
    let mut dispatcher = Dispatcher::new(plugin, publisher);

    let thread = std::thread::Builder::new()
        .name("liveness-dispatch".into())
        .spawn(move || {
            tracing::info!("dispatch thread started");
            while let Some(frame) = frames.blocking_recv() {
                dispatcher.process_frame(&frame);
            }
            let stats = dispatcher.stats();
            tracing::info!(
                processed = stats.processed,
                detections = stats.detections,
                plugin_errors = stats.plugin_errors,
                "dispatch thread exiting"
            );
            stats
        })
        .map_err(DispatchError::Spawn)?;

    Ok((
        sink,
        DispatcherHandle {
            latest,
            dropped,
            thread,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Submit;
    use liveness_core::{DetectionResult, Face};

    fn frame(sequence: u64) -> Frame {
        Frame {
            sequence,
            width: 1280,
            height: 720,
            data: Vec::new(),
        }
    }

    fn with_face(score: f64) -> DetectionResult {
        DetectionResult {
            face: Some(Face {
                left: 100.0,
                top: 200.0,
                right: 400.0,
                bottom: 800.0,
            }),
            score,
            ..Default::default()
        }
    }

    /// Face on even frames, nothing on odd ones, error on multiples of 5.
    fn scripted(frame: &Frame) -> Result<DetectionResult, PluginError> {
        if frame.sequence % 5 == 0 {
            return Err(PluginError::Inference("model crashed".into()));
        }
        if frame.sequence % 2 == 0 {
            Ok(with_face(frame.sequence as f64))
        } else {
            Ok(DetectionResult::default())
        }
    }

    #[test]
    fn test_face_then_no_face_clears() {
        let (publisher, latest) = detection_cell();
        let mut dispatcher = Dispatcher::new(scripted, publisher);

        assert!(dispatcher.process_frame(&frame(2)));
        assert_eq!(latest.current().unwrap().score, 2.0);

        assert!(!dispatcher.process_frame(&frame(3)));
        assert!(latest.current().is_none());
    }

    #[test]
    fn test_plugin_error_publishes_absent_and_continues() {
        let (publisher, latest) = detection_cell();
        let mut dispatcher = Dispatcher::new(scripted, publisher);

        dispatcher.process_frame(&frame(4));
        assert!(latest.current().is_some());

        assert!(!dispatcher.process_frame(&frame(5)));
        assert!(latest.current().is_none());

        assert!(dispatcher.process_frame(&frame(6)));
        assert_eq!(latest.current().unwrap().score, 6.0);

        let stats = dispatcher.stats();
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.detections, 2);
        assert_eq!(stats.plugin_errors, 1);
    }

    #[test]
    fn test_plugin_panic_publishes_absent_and_continues() {
        let plugin = |frame: &Frame| -> Result<DetectionResult, PluginError> {
            if frame.sequence == 1 {
                panic!("decoder exploded");
            }
            Ok(with_face(frame.sequence as f64))
        };
        let (publisher, latest) = detection_cell();
        let mut dispatcher = Dispatcher::new(plugin, publisher);

        assert!(dispatcher.process_frame(&frame(0)));
        assert!(!dispatcher.process_frame(&frame(1)));
        assert!(latest.current().is_none());

        assert!(dispatcher.process_frame(&frame(2)));
        assert_eq!(latest.current().unwrap().score, 2.0);

        let stats = dispatcher.stats();
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.detections, 2);
        assert_eq!(stats.plugin_errors, 1);
    }

    #[tokio::test]
    async fn test_threaded_pipeline_survives_panicking_frame() {
        let plugin = |frame: &Frame| -> Result<DetectionResult, PluginError> {
            if frame.sequence == 1 {
                panic!("bad frame");
            }
            Ok(with_face(frame.sequence as f64))
        };
        let (sink, handle) = spawn_dispatcher(plugin).unwrap();
        let mut latest = handle.latest();

        assert_eq!(sink.submit(frame(1)), Submit::Queued);
        let seen = latest.changed().await.unwrap();
        assert!(seen.is_none());

        assert_eq!(sink.submit(frame(2)), Submit::Queued);
        let seen = latest.changed().await.unwrap();
        assert_eq!(seen.unwrap().score, 2.0);

        drop(sink);
        let stats = tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.plugin_errors, 1);
    }

    #[test]
    fn test_panic_payload_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("boom"));
        let err = PluginError::from_panic(payload.as_ref());
        assert_eq!(err.to_string(), "plugin panicked: boom");
    }

    #[tokio::test]
    async fn test_one_publish_per_frame() {
        let calls = Arc::new(AtomicU64::new(0));
        let counted = Arc::clone(&calls);
        let plugin = move |_: &Frame| -> Result<DetectionResult, PluginError> {
            counted.fetch_add(1, Ordering::Relaxed);
            Ok(with_face(1.0))
        };
        let (publisher, mut latest) = detection_cell();
        let mut dispatcher = Dispatcher::new(plugin, publisher);

        for seq in 1..5 {
            dispatcher.process_frame(&frame(seq));
            assert!(latest.has_changed());
            latest.changed().await.unwrap();
            assert!(!latest.has_changed());
        }
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn test_threaded_pipeline() {
        let (sink, handle) = spawn_dispatcher(scripted).unwrap();
        let mut latest = handle.latest();

        assert_eq!(sink.submit(frame(2)), Submit::Queued);
        let seen = latest.changed().await.unwrap();
        assert_eq!(seen.unwrap().score, 2.0);

        assert_eq!(sink.submit(frame(3)), Submit::Queued);
        let seen = latest.changed().await.unwrap();
        assert!(seen.is_none());

        assert_eq!(sink.submit(frame(5)), Submit::Queued);
        let seen = latest.changed().await.unwrap();
        assert!(seen.is_none());

        drop(sink);
        let stats = tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.detections, 1);
        assert_eq!(stats.plugin_errors, 1);
        assert_eq!(stats.dropped, 0);
    }
}
