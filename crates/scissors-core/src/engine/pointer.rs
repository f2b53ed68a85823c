//! Pointer events as delivered by a multi-touch host.

use crate::geometry::Point;
use std::time::Duration;

/// What happened to the pointer at [`PointerEvent::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// First pointer touched down.
    Down,
    /// An additional pointer touched down.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// A pointer lifted while others remain down.
    PointerUp,
    /// The last pointer lifted.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

impl PointerAction {
    /// `PointerUp` or `Up`.
    pub fn is_up(self) -> bool {
        matches!(self, PointerAction::PointerUp | PointerAction::Up)
    }

    /// `Down` or `PointerDown`.
    pub fn is_down(self) -> bool {
        matches!(self, PointerAction::Down | PointerAction::PointerDown)
    }
}

/// A touch event.
///
/// `pointers` lists every pointer touching the surface, ordered by pointer
/// index. For up actions the lifting pointer is still present at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub index: usize,
    pub pointers: Vec<Point>,
    /// Monotonic timestamp of the event.
    pub time: Duration,
}

impl PointerEvent {
    pub fn new(action: PointerAction, index: usize, pointers: Vec<Point>, time: Duration) -> Self {
        Self {
            action,
            index,
            pointers,
            time,
        }
    }

    /// First pointer down at `at`.
    pub fn down(at: Point, time: Duration) -> Self {
        Self::new(PointerAction::Down, 0, vec![at], time)
    }

    /// Single pointer moved to `at`.
    pub fn moved(at: Point, time: Duration) -> Self {
        Self::new(PointerAction::Move, 0, vec![at], time)
    }

    /// Single pointer lifted at `at`.
    pub fn up(at: Point, time: Duration) -> Self {
        Self::new(PointerAction::Up, 0, vec![at], time)
    }

    /// Gesture aborted by the host.
    pub fn cancel(time: Duration) -> Self {
        Self::new(PointerAction::Cancel, 0, Vec::new(), time)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Pointers still down once this event is handled.
    pub fn remaining_count(&self) -> usize {
        match self.action {
            PointerAction::PointerUp | PointerAction::Up => self.pointers.len().saturating_sub(1),
            PointerAction::Cancel => 0,
            _ => self.pointers.len(),
        }
    }

    /// Average of the pointers that stay down, or `None` when none do.
    pub fn focus(&self) -> Option<Point> {
        let skip = if self.action.is_up() {
            Some(self.index)
        } else {
            None
        };

        let mut sum = Point::ZERO;
        let mut count = 0usize;
        for (i, point) in self.pointers.iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            sum += *point;
            count += 1;
        }

        if count == 0 {
            None
        } else {
            Some(sum * (1.0 / count as f32))
        }
    }

    /// Distance between the first two pointers that stay down.
    pub fn span(&self) -> Option<f32> {
        let skip = if self.action.is_up() {
            Some(self.index)
        } else {
            None
        };
        let mut remaining = self
            .pointers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, p)| *p);

        let a = remaining.next()?;
        let b = remaining.next()?;
        Some(a.distance(b))
    }
}
