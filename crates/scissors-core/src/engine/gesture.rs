//! Recognised gestures and the recognizer seam.

use super::PointerEvent;
use crate::geometry::Point;

/// A gesture the engine knows how to apply to its transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Move the image by `delta`; contain it right away when `contain`.
    Pan { delta: Point, contain: bool },
    /// Multiply the scale by `factor`, then clamp to the scale bounds.
    Pinch { factor: f32 },
    /// Pull the image back inside the viewport.
    Settle,
    /// Release velocity in px/s.
    Fling { velocity: Point },
    /// Second tap of a double tap, in view coordinates.
    DoubleTap { at: Point },
}

/// Turns raw pointer events into gestures.
pub trait GestureRecognizer: std::fmt::Debug {
    /// Feed one event; returns the gestures it completes, in order.
    fn on_event(&mut self, event: &PointerEvent) -> Vec<Gesture>;

    /// Forget every tracked pointer.
    fn reset(&mut self);
}
