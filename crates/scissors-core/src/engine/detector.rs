//! Gesture detection with scroll slop, fling and double tap.
//!
//! Single-pointer motion only scrolls once it has left the touch slop around
//! the down position. Two pointers pinch by the span ratio between
//! consecutive samples. Releasing a scroll reports the release velocity; a
//! second tap close in time and space to a first one reports a double tap
//! and swallows the rest of its gesture.

use super::velocity::VelocityTracker;
use super::{Gesture, GestureRecognizer, PointerAction, PointerEvent};
use crate::geometry::Point;
use std::time::Duration;

/// Distance a pointer may travel before a tap becomes a scroll.
pub const TOUCH_SLOP: f32 = 8.0;
/// Maximum distance between the downs of the two taps of a double tap.
pub const DOUBLE_TAP_SLOP: f32 = 100.0;
/// Shortest gap between the first release and the second down.
pub const DOUBLE_TAP_MIN_TIME: Duration = Duration::from_millis(40);
/// Longest gap between the first release and the second down.
pub const DOUBLE_TAP_TIMEOUT: Duration = Duration::from_millis(300);
/// Releases slower than this on both axes are not flings, in px/s.
pub const MIN_FLING_VELOCITY: f32 = 50.0;
/// Release velocities are capped at this magnitude per axis, in px/s.
pub const MAX_FLING_VELOCITY: f32 = 8000.0;

#[derive(Debug, Clone, Copy)]
struct Tap {
    down: Point,
    released: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    down_focus: Point,
    last_focus: Point,
    down_position: Point,
    in_tap_region: bool,
    double_tapping: bool,
    previous_span: Option<f32>,
    last_tap: Option<Tap>,
    velocity: VelocityTracker,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_double_tap(&self, at: Point, time: Duration) -> bool {
        let Some(tap) = self.last_tap else {
            return false;
        };
        let Some(gap) = time.checked_sub(tap.released) else {
            return false;
        };
        (DOUBLE_TAP_MIN_TIME..=DOUBLE_TAP_TIMEOUT).contains(&gap)
            && tap.down.distance(at) < DOUBLE_TAP_SLOP
    }

    fn on_down(&mut self, event: &PointerEvent, focus: Point) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        let at = event.pointers.first().copied().unwrap_or(focus);

        if self.is_double_tap(at, event.time) {
            self.double_tapping = true;
            self.last_tap = None;
            gestures.push(Gesture::DoubleTap { at });
        } else {
            self.double_tapping = false;
        }

        self.down_focus = focus;
        self.last_focus = focus;
        self.down_position = at;
        self.in_tap_region = true;
        self.previous_span = None;
        self.velocity.clear();
        self.velocity.add(event.time, focus);
        gestures
    }

    /// A pointer joined or left: restart focus tracking from the new set.
    fn on_pointer_change(&mut self, event: &PointerEvent, focus: Option<Point>) {
        if event.action == PointerAction::PointerDown {
            self.in_tap_region = false;
            self.double_tapping = false;
            self.last_tap = None;
        }
        if let Some(focus) = focus {
            self.down_focus = focus;
            self.last_focus = focus;
            self.velocity.clear();
            self.velocity.add(event.time, focus);
        }
        self.previous_span = event.span();
    }

    fn on_move(&mut self, event: &PointerEvent, focus: Point) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        self.velocity.add(event.time, focus);

        if let Some(span) = event.span() {
            if let Some(previous) = self.previous_span.filter(|p| *p > 0.0) {
                gestures.push(Gesture::Pinch {
                    factor: span / previous,
                });
            }
            self.previous_span = Some(span);
        }

        if self.double_tapping {
            return gestures;
        }

        let delta = focus - self.last_focus;
        if self.in_tap_region {
            if focus.distance(self.down_focus) > TOUCH_SLOP {
                self.in_tap_region = false;
                self.last_focus = focus;
                if event.pointer_count() == 1 {
                    gestures.push(Gesture::Pan {
                        delta,
                        contain: true,
                    });
                }
            }
        } else if delta.x.abs() >= 1.0 || delta.y.abs() >= 1.0 {
            self.last_focus = focus;
            if event.pointer_count() == 1 {
                gestures.push(Gesture::Pan {
                    delta,
                    contain: true,
                });
            }
        }
        gestures
    }

    fn on_up(&mut self, event: &PointerEvent) -> Vec<Gesture> {
        let mut gestures = Vec::new();

        if self.double_tapping {
            self.double_tapping = false;
        } else if self.in_tap_region {
            self.last_tap = Some(Tap {
                down: self.down_position,
                released: event.time,
            });
        } else {
            let velocity = self.velocity.velocity();
            let velocity = Point::new(
                velocity.x.clamp(-MAX_FLING_VELOCITY, MAX_FLING_VELOCITY),
                velocity.y.clamp(-MAX_FLING_VELOCITY, MAX_FLING_VELOCITY),
            );
            if velocity.x.abs() > MIN_FLING_VELOCITY || velocity.y.abs() > MIN_FLING_VELOCITY {
                gestures.push(Gesture::Fling { velocity });
            }
        }

        self.in_tap_region = false;
        self.previous_span = None;
        self.velocity.clear();
        gestures.push(Gesture::Settle);
        gestures
    }
}

impl GestureRecognizer for GestureDetector {
    fn on_event(&mut self, event: &PointerEvent) -> Vec<Gesture> {
        let focus = event.focus();
        match event.action {
            PointerAction::Down => match focus {
                Some(focus) => self.on_down(event, focus),
                None => Vec::new(),
            },
            PointerAction::PointerDown => {
                self.on_pointer_change(event, focus);
                Vec::new()
            }
            PointerAction::PointerUp => {
                self.on_pointer_change(event, focus);
                vec![Gesture::Settle]
            }
            PointerAction::Move => match focus {
                Some(focus) => self.on_move(event, focus),
                None => Vec::new(),
            },
            PointerAction::Up => self.on_up(event),
            PointerAction::Cancel => {
                self.reset();
                vec![Gesture::Settle]
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
