//! Textual diagnostic panel listing every numeric and boolean field of a result.

use std::fmt;

use serde::Serialize;

use crate::detection::DetectionResult;

/// Placeholder for a field whose section was absent from the result.
const MISSING: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEntry {
    pub label: &'static str,
    pub value: String,
}

/// Label/value rows, rendered bottom-anchored over the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticPanel {
    pub entries: Vec<DiagnosticEntry>,
}

fn value_or_missing<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

impl DiagnosticPanel {
    /// Build the panel, or `None` when the result has no face.
    pub fn from_result(result: &DetectionResult) -> Option<Self> {
        let face = result.face?;
        let rotation = result.rotation;
        let landmarks = result.landmarks.as_ref();
        let features = &result.features;

        let rows: [(&'static str, String); 16] = [
            ("Left", face.left.to_string()),
            ("Top", face.top.to_string()),
            ("Right", face.right.to_string()),
            ("Bottom", face.bottom.to_string()),
            ("score", result.score.to_string()),
            ("yaw", value_or_missing(rotation.map(|r| r.yaw))),
            ("roll", value_or_missing(rotation.map(|r| r.roll))),
            ("pitch", value_or_missing(rotation.map(|r| r.pitch))),
            ("mouthOpen", features.is_mouth_open.to_string()),
            ("leftEyeOpen", features.is_left_eye_open.to_string()),
            ("rightEyeOpen", features.is_right_eye_open.to_string()),
            ("horizontalRotation", features.horizontal_rotation.to_string()),
            ("verticalRotation", features.vertical_rotation.to_string()),
            ("mouthArea", value_or_missing(landmarks.and_then(|l| l.mouth_area))),
            ("leftEyeArea", value_or_missing(landmarks.and_then(|l| l.left_eye_area))),
            ("rightEyeArea", value_or_missing(landmarks.and_then(|l| l.right_eye_area))),
        ];

        Some(Self {
            entries: rows
                .into_iter()
                .map(|(label, value)| DiagnosticEntry { label, value })
                .collect(),
        })
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }
}

impl fmt::Display for DiagnosticPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.label, entry.value)?;
        }
        Ok(())
    }
}
