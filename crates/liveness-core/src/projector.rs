//! Projection of a detection result onto the display viewport.
//!
//! [`project`] is a pure function: the same result and viewport always produce
//! the same [`Overlay`]. Face coordinates are scaled from the detector's fixed
//! 720×1280 grid regardless of the actual capture resolution, and landmarks
//! are placed relative to the projected face box.

use serde::Serialize;

use crate::detection::{DetectionResult, Face, LandmarkKind, LandmarkPoint};
use crate::diagnostics::DiagnosticPanel;
use crate::transform::Transform;

/// Width of the grid the detector reports face coordinates against.
pub const SOURCE_GRID_WIDTH: f64 = 720.0;
/// Height of the grid the detector reports face coordinates against.
pub const SOURCE_GRID_HEIGHT: f64 = 1280.0;

/// Landmark markers are fixed-size squares, shifted to centre on the point.
pub const MARKER_SIZE: f64 = 5.0;
const MARKER_OFFSET: f64 = 2.0;

const BAR_LENGTH: f64 = 50.0;
const BAR_THICKNESS: f64 = 6.0;
/// Horizontal shift of the vertical bar so it sits on the nose tip.
const VERTICAL_BAR_X_OFFSET: f64 = 3.0;
/// Vertical shift of the vertical bar so it sits on the nose tip.
const VERTICAL_BAR_Y_OFFSET: f64 = 22.0;

/// Display surface size in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute-positioned rectangle in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        }
    }
}

/// Face box edges in screen space. All zero when no face was detected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FaceProjection {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl FaceProjection {
    pub fn new(face: Option<&Face>, viewport: Viewport) -> Self {
        let Some(face) = face else {
            return Self::default();
        };
        Self {
            left: face.left / SOURCE_GRID_WIDTH * viewport.width,
            top: face.top / SOURCE_GRID_HEIGHT * viewport.height,
            right: face.right / SOURCE_GRID_WIDTH * viewport.width,
            bottom: face.bottom / SOURCE_GRID_HEIGHT * viewport.height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn rect(&self) -> ScreenRect {
        ScreenRect {
            left: self.left,
            top: self.top,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Screen position of a face-relative point.
    pub fn locate(&self, point: LandmarkPoint) -> (f64, f64) {
        (
            self.left + point.x() * self.width(),
            self.top + point.y() * self.height(),
        )
    }
}

/// Rounded outline around the detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceBox {
    pub rect: ScreenRect,
    pub border_radius: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub landmark: LandmarkKind,
    pub rect: ScreenRect,
    pub color: Color,
}

impl Marker {
    /// The landmark position the marker is centred on.
    pub fn center(&self) -> (f64, f64) {
        (self.rect.left + MARKER_OFFSET, self.rect.top + MARKER_OFFSET)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    /// Horizontal bar, primary transform.
    Primary,
    /// Horizontal bar, secondary transform.
    Secondary,
    /// Vertical bar, primary transform.
    Vertical,
}

impl BarKind {
    pub fn name(self) -> &'static str {
        match self {
            BarKind::Primary => "primary",
            BarKind::Secondary => "secondary",
            BarKind::Vertical => "vertical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationBar {
    pub kind: BarKind,
    pub rect: ScreenRect,
    pub color: Color,
    pub transform: Transform,
}

/// Everything to draw over the preview for one detection result.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlay {
    pub face: FaceProjection,
    pub face_box: Option<FaceBox>,
    pub markers: Vec<Marker>,
    pub rotation_bars: Vec<RotationBar>,
    pub diagnostics: Option<DiagnosticPanel>,
}

impl Overlay {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.face_box.is_none()
            && self.markers.is_empty()
            && self.rotation_bars.is_empty()
            && self.diagnostics.is_none()
    }
}

/// Project the latest detection result onto a viewport.
///
/// Gating: the face box needs a face; markers need a face and landmarks;
/// rotation bars need a face, landmarks (they anchor on the nose tip) and a
/// rotation. Without a face nothing is produced and all edges are zero.
pub fn project(result: Option<&DetectionResult>, viewport: Viewport) -> Overlay {
    let Some(result) = result else {
        return Overlay::default();
    };
    let Some(face) = result.face.as_ref() else {
        return Overlay::default();
    };

    let projection = FaceProjection::new(Some(face), viewport);
    let face_box = FaceBox {
        rect: projection.rect(),
        border_radius: projection.height(),
        color: Color::Yellow,
    };

    let markers = match &result.landmarks {
        Some(landmarks) => landmarks
            .iter()
            .map(|(kind, point)| project_marker(&projection, kind, point))
            .collect(),
        None => Vec::new(),
    };

    let rotation_bars = match (&result.landmarks, &result.rotation) {
        (Some(landmarks), Some(rotation)) => {
            let anchor = bar_anchor(&projection, landmarks.nose_tip);
            let primary = Transform::primary(rotation);
            let secondary = Transform::secondary(rotation);
            vec![
                RotationBar {
                    kind: BarKind::Primary,
                    rect: horizontal_bar(anchor),
                    color: Color::Red,
                    transform: primary,
                },
                RotationBar {
                    kind: BarKind::Secondary,
                    rect: horizontal_bar(anchor),
                    color: Color::Green,
                    transform: secondary,
                },
                RotationBar {
                    kind: BarKind::Vertical,
                    rect: vertical_bar(anchor),
                    color: Color::Blue,
                    transform: primary,
                },
            ]
        }
        _ => Vec::new(),
    };

    Overlay {
        face: projection,
        face_box: Some(face_box),
        markers,
        rotation_bars,
        diagnostics: DiagnosticPanel::from_result(result),
    }
}

fn project_marker(projection: &FaceProjection, kind: LandmarkKind, point: LandmarkPoint) -> Marker {
    let (x, y) = projection.locate(point);
    Marker {
        landmark: kind,
        rect: ScreenRect {
            left: x - MARKER_OFFSET,
            top: y - MARKER_OFFSET,
            width: MARKER_SIZE,
            height: MARKER_SIZE,
        },
        color: Color::Red,
    }
}

/// Nose-tip anchor for the rotation bars. The vertical coordinate is scaled
/// by the face *width*, matching the layout the bars were tuned against.
fn bar_anchor(projection: &FaceProjection, nose_tip: LandmarkPoint) -> (f64, f64) {
    (
        projection.left + nose_tip.x() * projection.width(),
        projection.top + nose_tip.y() * projection.width(),
    )
}

fn horizontal_bar((x, y): (f64, f64)) -> ScreenRect {
    ScreenRect {
        left: x - BAR_LENGTH / 2.0,
        top: y,
        width: BAR_LENGTH,
        height: BAR_THICKNESS,
    }
}

fn vertical_bar((x, y): (f64, f64)) -> ScreenRect {
    ScreenRect {
        left: x - VERTICAL_BAR_X_OFFSET,
        top: y - VERTICAL_BAR_Y_OFFSET,
        width: BAR_THICKNESS,
        height: BAR_LENGTH,
    }
}
