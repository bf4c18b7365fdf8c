//! Platform-neutral input events and the intents they turn into.

use web_time::Instant;

use crate::geometry::Point;

/// Identifier the platform assigns to a mouse, pen or touch contact.
pub type PointerId = i32;

/// Input events the viewport responds to.
///
/// Positions are relative to the viewport's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse wheel scrolled. Positive delta zooms in.
    Wheel { delta: f64, position: Point },
    /// Keyboard key pressed.
    Key(Key),
    /// A contact touched down or a mouse button was pressed.
    PointerDown {
        id: PointerId,
        position: Point,
        time: Instant,
    },
    /// A contact moved.
    PointerMove {
        id: PointerId,
        position: Point,
        time: Instant,
    },
    /// A contact lifted or a mouse button was released.
    PointerUp {
        id: PointerId,
        position: Point,
        time: Instant,
    },
    /// The platform took the contact away (scroll, focus loss).
    PointerCancel { id: PointerId, time: Instant },
}

impl InputEvent {
    /// Timestamp of pointer events.
    pub fn time(&self) -> Option<Instant> {
        match self {
            InputEvent::PointerDown { time, .. }
            | InputEvent::PointerMove { time, .. }
            | InputEvent::PointerUp { time, .. }
            | InputEvent::PointerCancel { time, .. } => Some(*time),
            InputEvent::Wheel { .. } | InputEvent::Key(_) => None,
        }
    }
}

/// Keyboard keys (simplified set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Space,
    Escape,
    Enter,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// Legacy names (`Esc`, `Left`, ...) from older browsers are accepted.
    pub fn from_dom(key: &str) -> Option<Key> {
        let key = match key {
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Keys the viewport zooms or resets with.
    pub fn is_zoom_key(self) -> bool {
        matches!(self, Key::Space | Key::Char('+' | '=' | '-' | '0'))
    }
}

/// What an input event asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Move the image by a delta
    PanBy { dx: f64, dy: f64 },
    /// Move the image to an absolute offset
    PanTo(Point),
    /// Zoom to a scale about an origin (viewport center if `None`)
    ZoomTo { scale: f64, origin: Option<Point> },
    /// Return to fit scale
    Reset,
    /// Pan released with a velocity (px/ms); continue kinetically
    Fling { velocity: Point },
    /// Stop any running kinetic pan
    StopKinetic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_dom(" "), Some(Key::Space));
        assert_eq!(Key::from_dom("+"), Some(Key::Char('+')));
        assert_eq!(Key::from_dom("Shift"), None);
    }

    #[test]
    fn test_zoom_keys() {
        assert!(Key::Space.is_zoom_key());
        assert!(Key::Char('=').is_zoom_key());
        assert!(!Key::Up.is_zoom_key());
        assert!(!Key::Char('x').is_zoom_key());
    }
}
