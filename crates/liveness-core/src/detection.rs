//! Detection result as emitted by the liveness inference plugin.
//!
//! The plugin produces one result per processed frame. Face coordinates are
//! pixels on a fixed 720×1280 portrait grid; landmarks are normalized to the
//! face box. Field names follow the plugin's camelCase wire shape.

use serde::{Deserialize, Serialize};

/// Face bounding box in source-grid pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Face {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Head rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub roll: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub is_mouth_open: bool,
    pub is_left_eye_open: bool,
    pub is_right_eye_open: bool,
    pub horizontal_rotation: f64,
    pub vertical_rotation: f64,
}

/// A face-relative point on the wire as `[x, y]`.
///
/// The plugin may send fewer than two components, or `null` entries; any
/// missing component reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Option<f64>>", into = "Vec<Option<f64>>")]
pub struct LandmarkPoint {
    x: Option<f64>,
    y: Option<f64>,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x.unwrap_or(0.0)
    }

    pub fn y(&self) -> f64 {
        self.y.unwrap_or(0.0)
    }

    /// True when both components were supplied.
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

impl From<Vec<Option<f64>>> for LandmarkPoint {
    fn from(components: Vec<Option<f64>>) -> Self {
        Self {
            x: components.first().copied().flatten(),
            y: components.get(1).copied().flatten(),
        }
    }
}

impl From<LandmarkPoint> for Vec<Option<f64>> {
    fn from(point: LandmarkPoint) -> Self {
        let mut components = vec![point.x, point.y];
        while components.last() == Some(&None) {
            components.pop();
        }
        components
    }
}

/// Named landmark on the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LandmarkKind {
    NoseTip,
    LipsTop,
    LipsBottom,
    LeftEyeTop,
    LeftEyeBottom,
    RightEyeTop,
    RightEyeBottom,
}

impl LandmarkKind {
    /// Every landmark, in render order.
    pub const ALL: [LandmarkKind; 7] = [
        LandmarkKind::NoseTip,
        LandmarkKind::LipsTop,
        LandmarkKind::LipsBottom,
        LandmarkKind::LeftEyeTop,
        LandmarkKind::LeftEyeBottom,
        LandmarkKind::RightEyeTop,
        LandmarkKind::RightEyeBottom,
    ];

    /// Wire name of the landmark.
    pub fn name(self) -> &'static str {
        match self {
            LandmarkKind::NoseTip => "noseTip",
            LandmarkKind::LipsTop => "lipsTop",
            LandmarkKind::LipsBottom => "lipsBottom",
            LandmarkKind::LeftEyeTop => "leftEyeTop",
            LandmarkKind::LeftEyeBottom => "leftEyeBottom",
            LandmarkKind::RightEyeTop => "rightEyeTop",
            LandmarkKind::RightEyeBottom => "rightEyeBottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmarks {
    pub nose_tip: LandmarkPoint,
    pub lips_top: LandmarkPoint,
    pub lips_bottom: LandmarkPoint,
    pub left_eye_top: LandmarkPoint,
    pub left_eye_bottom: LandmarkPoint,
    pub right_eye_top: LandmarkPoint,
    pub right_eye_bottom: LandmarkPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_eye_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_eye_area: Option<f64>,
}

impl Landmarks {
    pub fn get(&self, kind: LandmarkKind) -> LandmarkPoint {
        match kind {
            LandmarkKind::NoseTip => self.nose_tip,
            LandmarkKind::LipsTop => self.lips_top,
            LandmarkKind::LipsBottom => self.lips_bottom,
            LandmarkKind::LeftEyeTop => self.left_eye_top,
            LandmarkKind::LeftEyeBottom => self.left_eye_bottom,
            LandmarkKind::RightEyeTop => self.right_eye_top,
            LandmarkKind::RightEyeBottom => self.right_eye_bottom,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkKind, LandmarkPoint)> + '_ {
        LandmarkKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// One frame's worth of plugin output. Replaced wholesale on every frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub face: Option<Face>,
    #[serde(default)]
    pub rotation: Option<Rotation>,
    pub features: Features,
    #[serde(default)]
    pub landmarks: Option<Landmarks>,
    /// Liveness score, presumed in [0, 1].
    pub score: f64,
}

impl DetectionResult {
    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }
}
