use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use liveness_core::projector::ScreenRect;
use liveness_core::Overlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable layout listing.
    Text,
    /// One JSON object per update.
    Json,
}

/// Writes overlay updates to an output stream.
pub struct Renderer<W> {
    format: Format,
    out: W,
    updates: u64,
}

impl<W: Write> Renderer<W> {
    pub fn new(format: Format, out: W) -> Self {
        Self {
            format,
            out,
            updates: 0,
        }
    }

    pub fn render(&mut self, overlay: &Overlay) -> Result<()> {
        self.updates += 1;
        match self.format {
            Format::Text => {
                writeln!(self.out, "== update {} ==", self.updates)?;
                self.out.write_all(render_text(overlay).as_bytes())?;
            }
            Format::Json => {
                serde_json::to_writer(&mut self.out, overlay)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Show a placeholder instead of the preview.
    pub fn placeholder(&mut self, text: &str) -> Result<()> {
        match self.format {
            Format::Text => writeln!(self.out, "{text}")?,
            Format::Json => {
                serde_json::to_writer(&mut self.out, &serde_json::json!({ "placeholder": text }))?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

fn rect(r: &ScreenRect) -> String {
    format!(
        "left={:.1} top={:.1} width={:.1} height={:.1}",
        r.left, r.top, r.width, r.height
    )
}

/// Text layout of an overlay: one line per primitive, then the diagnostic panel.
pub fn render_text(overlay: &Overlay) -> String {
    let mut out = String::new();
    let Some(face_box) = &overlay.face_box else {
        out.push_str("no face\n");
        return out;
    };

    let _ = writeln!(
        out,
        "face   {} radius={:.1} {}",
        rect(&face_box.rect),
        face_box.border_radius,
        face_box.color.name()
    );
    for marker in &overlay.markers {
        let _ = writeln!(
            out,
            "marker {:<14} {} {}",
            marker.landmark.name(),
            rect(&marker.rect),
            marker.color.name()
        );
    }
    for bar in &overlay.rotation_bars {
        let _ = writeln!(
            out,
            "bar    {:<14} {} {} [{}]",
            bar.kind.name(),
            rect(&bar.rect),
            bar.color.name(),
            bar.transform
        );
    }
    if let Some(panel) = &overlay.diagnostics {
        out.push_str(&panel.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveness_core::{project, DetectionResult, Face, LandmarkPoint, Landmarks, Rotation, Viewport};

    fn result() -> DetectionResult {
        DetectionResult {
            face: Some(Face {
                left: 100.0,
                top: 200.0,
                right: 400.0,
                bottom: 800.0,
            }),
            rotation: Some(Rotation {
                yaw: 20.0,
                roll: 5.0,
                pitch: 10.0,
            }),
            landmarks: Some(Landmarks {
                nose_tip: LandmarkPoint::new(0.5, 0.5),
                ..Default::default()
            }),
            score: 0.9,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_layout() {
        let overlay = project(Some(&result()), Viewport::new(1280.0, 720.0));
        let text = render_text(&overlay);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("face   left=177.8 top=112.5 width=533.3 height=337.5 radius=337.5 yellow")
        );
        assert!(text.contains("marker noseTip"));
        assert!(text.contains("[rotateX(10deg), rotateY(5deg), rotateZ(70deg)]"));
        assert!(text.contains("[rotateX(80deg), rotateY(330deg), rotateZ(-85deg)]"));
        assert!(text.contains("score: 0.9\n"));
        // face + 7 markers + 3 bars + 16 diagnostics
        assert_eq!(text.lines().count(), 27);
    }

    #[test]
    fn test_no_face_text() {
        let overlay = project(None, Viewport::new(1280.0, 720.0));
        assert_eq!(render_text(&overlay), "no face\n");
    }

    #[test]
    fn test_json_lines() {
        let mut buf = Vec::new();
        {
            let mut renderer = Renderer::new(Format::Json, &mut buf);
            renderer
                .render(&project(Some(&result()), Viewport::new(720.0, 1280.0)))
                .unwrap();
            renderer.render(&project(None, Viewport::new(720.0, 1280.0))).unwrap();
            assert_eq!(renderer.updates(), 2);
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["face_box"]["color"], "yellow");
        assert_eq!(lines[0]["rotation_bars"][1]["kind"], "secondary");
        assert_eq!(lines[0]["markers"][0]["landmark"], "noseTip");
        assert!(lines[1]["face_box"].is_null());
    }

    #[test]
    fn test_placeholder() {
        let mut buf = Vec::new();
        Renderer::new(Format::Text, &mut buf)
            .placeholder("No camera permission")
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No camera permission\n");
    }
}
