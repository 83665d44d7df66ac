//! Top-level display gating: camera placeholder versus overlay preview.

use thiserror::Error;

/// Reasons the preview cannot be shown. The display string is the
/// user-visible placeholder text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    #[error("No camera permission")]
    PermissionDenied,
    #[error("No camera")]
    NoDevice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Text-only fallback.
    Unavailable(CameraError),
    /// Camera preview with the detection overlay.
    Preview,
}

impl View {
    pub fn placeholder_text(&self) -> Option<String> {
        match self {
            View::Unavailable(err) => Some(err.to_string()),
            View::Preview => None,
        }
    }
}

/// Pick the view to show.
///
/// `has_permission` is the permission held at startup, `request_granted` the
/// outcome of the runtime request (if one was made). Permission is checked
/// before the device: a missing camera is only reported once access is allowed.
pub fn select_view(has_permission: bool, request_granted: bool, device_available: bool) -> View {
    if !has_permission && !request_granted {
        return View::Unavailable(CameraError::PermissionDenied);
    }
    if !device_available {
        return View::Unavailable(CameraError::NoDevice);
    }
    View::Preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_permission_wins_over_missing_device() {
        assert_eq!(
            select_view(false, false, false),
            View::Unavailable(CameraError::PermissionDenied)
        );
        assert_eq!(
            select_view(false, false, true).placeholder_text().as_deref(),
            Some("No camera permission")
        );
    }

    #[test]
    fn test_granted_on_request() {
        assert_eq!(select_view(false, true, true), View::Preview);
    }

    #[test]
    fn test_missing_device() {
        let view = select_view(true, false, false);
        assert_eq!(view, View::Unavailable(CameraError::NoDevice));
        assert_eq!(view.placeholder_text().as_deref(), Some("No camera"));
    }

    #[test]
    fn test_preview_has_no_placeholder() {
        assert_eq!(select_view(true, true, true).placeholder_text(), None);
    }
}
