use liveness_core::Viewport;
use liveness_pipeline::CaptureFormat;

/// Simulated camera permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    /// Already held at startup.
    Granted,
    /// Not held; granted when requested.
    Prompt,
    /// Not held; refused when requested.
    Denied,
}

impl PermissionMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "granted" | "1" => Some(Self::Granted),
            "prompt" => Some(Self::Prompt),
            "denied" | "0" => Some(Self::Denied),
            _ => None,
        }
    }
}

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display surface width in screen units.
    pub viewport_width: f64,
    /// Display surface height in screen units.
    pub viewport_height: f64,
    /// Resolution and frame-rate hint passed to the camera.
    pub capture: CaptureFormat,
    pub camera_permission: PermissionMode,
    /// Camera position to open ("front" by default); "none" simulates a
    /// device without a usable camera.
    pub camera_device: String,
}

impl Config {
    /// Load configuration from `LIVENESS_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = CaptureFormat::default();
        let camera_permission = match lookup("LIVENESS_CAMERA_PERMISSION") {
            Some(v) => PermissionMode::parse(&v).unwrap_or_else(|| {
                tracing::warn!(value = %v, "unrecognised LIVENESS_CAMERA_PERMISSION, assuming granted");
                PermissionMode::Granted
            }),
            None => PermissionMode::Granted,
        };

        Self {
            viewport_width: parsed(&lookup, "LIVENESS_VIEWPORT_WIDTH", 720.0),
            viewport_height: parsed(&lookup, "LIVENESS_VIEWPORT_HEIGHT", 1280.0),
            capture: CaptureFormat {
                width: parsed(&lookup, "LIVENESS_CAPTURE_WIDTH", defaults.width),
                height: parsed(&lookup, "LIVENESS_CAPTURE_HEIGHT", defaults.height),
                fps: parsed(&lookup, "LIVENESS_CAPTURE_FPS", defaults.fps),
            },
            camera_permission,
            camera_device: lookup("LIVENESS_CAMERA_DEVICE").unwrap_or_else(|| "front".to_string()),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    pub fn device_available(&self) -> bool {
        !self.camera_device.eq_ignore_ascii_case("none")
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
