//! Bindings a companion host provides to its plugins.
//!
//! The overlay subsystem does not depend on these; they are what plugin code
//! calls around it (choosing a popup anchor, copying text, narrating what
//! happened).

use thiserror::Error;
use tracing::{Level, warn};

use crate::clipboard::ClipboardError;
use crate::constants::FALLBACK_ANCHOR;
use crate::geometry::Point;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host binding `{0}` is not available")]
    Unavailable(&'static str),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

pub trait Host {
    /// Leveled diagnostic sink.
    fn log(&mut self, level: Level, message: &str);

    /// Current pointer position in surface coordinates.
    fn mouse_position(&mut self) -> Result<Point, HostError>;

    fn read_clipboard(&mut self) -> Result<String, HostError>;

    fn write_clipboard(&mut self, text: &str) -> Result<(), HostError>;

    fn take_screenshot(&mut self) -> Result<(), HostError> {
        Err(HostError::Unavailable("take_screenshot"))
    }
}

/// Pointer position for anchoring a new popup; falls back to a fixed point
/// when the host cannot report one.
pub fn anchor_from_host(host: &mut dyn Host) -> Point {
    match host.mouse_position() {
        Ok(point) => point,
        Err(err) => {
            warn!(%err, "mouse position unavailable, using fallback anchor");
            Point::new(FALLBACK_ANCHOR.0, FALLBACK_ANCHOR.1)
        }
    }
}

/// Put `text` on the host clipboard and narrate the outcome through the host
/// log. Returns whether the copy went through.
pub fn copy_text(host: &mut dyn Host, text: &str) -> bool {
    match host.write_clipboard(text) {
        Ok(()) => {
            host.log(Level::INFO, &format!("copied {text:?} to clipboard"));
            true
        }
        Err(err) => {
            host.log(Level::WARN, &format!("copy failed: {err}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct StubHost {
        pointer: Option<Point>,
        logged: Vec<(Level, String)>,
        clipboard: Option<String>,
        backend_down: bool,
    }

    impl Host for StubHost {
        fn log(&mut self, level: Level, message: &str) {
            self.logged.push((level, message.to_string()));
        }

        fn mouse_position(&mut self) -> Result<Point, HostError> {
            self.pointer.ok_or(HostError::Unavailable("mouse_position"))
        }

        fn read_clipboard(&mut self) -> Result<String, HostError> {
            self.clipboard
                .clone()
                .ok_or(HostError::Unavailable("read_clipboard"))
        }

        fn write_clipboard(&mut self, text: &str) -> Result<(), HostError> {
            if self.backend_down {
                let err = ClipboardError::from(arboard::Error::ClipboardNotSupported);
                return Err(err.into());
            }
            self.clipboard = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn anchor_uses_pointer_when_available() {
        let mut host = StubHost {
            pointer: Some(Point::new(3, 4)),
            ..Default::default()
        };
        assert_eq!(anchor_from_host(&mut host), Point::new(3, 4));
    }

    #[test]
    fn anchor_falls_back() {
        let mut host = StubHost::default();
        assert_eq!(anchor_from_host(&mut host), Point::new(100, 100));
    }

    #[test]
    fn screenshot_defaults_to_unavailable() {
        let mut host = StubHost::default();
        host.log(Level::INFO, "hello");
        let err = host.take_screenshot().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("host binding `take_screenshot` is not available")
        );
        assert_eq!(host.logged.len(), 1);
    }

    #[test]
    fn copy_text_round_trips_through_host() {
        let mut host = StubHost::default();
        assert!(copy_text(&mut host, "Companion"));
        assert_eq!(host.read_clipboard().ok().as_deref(), Some("Companion"));
        assert_eq!(host.logged[0].0, Level::INFO);
    }

    #[test]
    fn clipboard_backend_errors_map_to_host_error() {
        let mut host = StubHost {
            backend_down: true,
            ..Default::default()
        };
        let err = host.write_clipboard("x").err();
        assert!(matches!(
            err,
            Some(HostError::Clipboard(ClipboardError::Backend(
                arboard::Error::ClipboardNotSupported
            )))
        ));

        assert!(!copy_text(&mut host, "Companion"));
        let (level, message) = &host.logged[0];
        assert_eq!(*level, Level::WARN);
        assert!(message.starts_with("copy failed: clipboard backend error:"));
        assert!(host.read_clipboard().is_err());
    }
}
