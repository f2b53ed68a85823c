//! Raw multi-pointer tracking.
//!
//! Up to [`MAX_POINTERS`] slots each hold the current and previous sample of
//! one pointer. One pressed slot drags, two pressed slots pinch by the ratio
//! of the current to the previous inter-pointer distance.

use super::{Gesture, GestureRecognizer, PointerAction, PointerEvent};
use crate::geometry::Point;

pub const MAX_POINTERS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Slot {
    current: Option<Point>,
    previous: Option<Point>,
}

impl Slot {
    fn clear(&mut self) {
        *self = Slot::default();
    }

    fn record(&mut self, point: Point) {
        match self.current {
            None => {
                self.current = Some(point);
                self.previous = None;
            }
            Some(current) => {
                self.previous = Some(current);
                self.current = Some(point);
            }
        }
    }

    /// Movement since the previous sample, zero on the first sample.
    fn delta(&self) -> Point {
        match (self.current, self.previous) {
            (Some(current), Some(previous)) => current - previous,
            _ => Point::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    slots: [Slot; MAX_POINTERS],
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots holding a pointer.
    pub fn down_count(&self) -> usize {
        self.slots.iter().filter(|s| s.current.is_some()).count()
    }

    /// Current sample of slot `index`.
    pub fn current(&self, index: usize) -> Option<Point> {
        self.slots.get(index).and_then(|s| s.current)
    }

    /// Previous sample of slot `index`.
    pub fn previous(&self, index: usize) -> Option<Point> {
        self.slots.get(index).and_then(|s| s.previous)
    }

    fn update_slots(&mut self, pointers: &[Point]) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            match pointers.get(i) {
                Some(point) => slot.record(*point),
                None => slot.clear(),
            }
        }
    }

    fn drag(&self) -> Option<Gesture> {
        if self.down_count() != 1 {
            return None;
        }
        let slot = self.slots.iter().find(|s| s.current.is_some())?;
        Some(Gesture::Pan {
            delta: slot.delta(),
            contain: false,
        })
    }

    fn pinch(&self) -> Option<Gesture> {
        let [a, b] = &self.slots;
        let (a_now, b_now) = (a.current?, b.current?);
        let current = a_now.distance(b_now);
        let previous = match (a.previous, b.previous) {
            (Some(a_prev), Some(b_prev)) => a_prev.distance(b_prev),
            _ => current,
        };

        let factor = if previous != 0.0 {
            current / previous
        } else {
            1.0
        };
        Some(Gesture::Pinch { factor })
    }
}

impl GestureRecognizer for PointerTracker {
    fn on_event(&mut self, event: &PointerEvent) -> Vec<Gesture> {
        if event.action == PointerAction::Cancel {
            self.reset();
            return vec![Gesture::Settle];
        }
        if event.index >= MAX_POINTERS {
            return Vec::new();
        }

        if event.action.is_up() {
            self.slots[event.index].clear();
            return vec![Gesture::Settle];
        }

        self.update_slots(&event.pointers);

        let mut gestures = Vec::new();
        gestures.extend(self.drag());
        gestures.extend(self.pinch());
        gestures
    }

    fn reset(&mut self) {
        self.slots = Default::default();
    }
}
