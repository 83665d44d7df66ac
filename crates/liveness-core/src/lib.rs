//! Core types for the liveness overlay: the detection result produced by the
//! inference plugin, and the pure projection of that result onto a viewport.

pub mod challenge;
pub mod detection;
pub mod diagnostics;
pub mod projector;
pub mod transform;
pub mod view;

pub use detection::{DetectionResult, Face, Features, LandmarkKind, LandmarkPoint, Landmarks, Rotation};
pub use diagnostics::DiagnosticPanel;
pub use projector::{project, FaceProjection, Overlay, Viewport};
pub use transform::Transform;
pub use view::{select_view, CameraError, View};
