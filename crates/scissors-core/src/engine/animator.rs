//! Time-based interpolation of the image position and scale.
//!
//! An [`Animation`] is a passive value: the host samples it with the current
//! time on every frame and applies the returned [`AnimationFrame`]. Nothing
//! runs in the background, so dropping a session cancels it.

use crate::geometry::Point;
use std::f32::consts::PI;
use std::time::Duration;

/// Duration of the post-fling translation.
pub const FLING_DURATION: Duration = Duration::from_millis(250);
/// Duration of the double-tap zoom.
pub const DOUBLE_TAP_DURATION: Duration = Duration::from_millis(500);

/// Easing curve applied to the elapsed fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolator {
    Linear,
    /// Starts fast and slows down: `1 - (1 - t)^2`.
    Decelerate,
    /// Slow at both ends: `cos((t + 1) * PI) / 2 + 0.5`.
    AccelerateDecelerate,
}

impl Interpolator {
    pub fn interpolate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolator::Linear => t,
            Interpolator::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Interpolator::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

/// Values to apply for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub position: Point,
    /// `None` when the session only translates.
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    from_position: Point,
    to_position: Point,
    scale: Option<(f32, f32)>,
    start: Option<Duration>,
    duration: Duration,
    interpolator: Interpolator,
}

impl Animation {
    /// Translation only, as used after a fling.
    pub fn translation(from: Point, to: Point) -> Self {
        Self {
            from_position: from,
            to_position: to,
            scale: None,
            start: None,
            duration: FLING_DURATION,
            interpolator: Interpolator::Decelerate,
        }
    }

    /// Translation and scale together, as used by double tap.
    pub fn zoom(from: Point, to: Point, from_scale: f32, to_scale: f32) -> Self {
        Self {
            from_position: from,
            to_position: to,
            scale: Some((from_scale, to_scale)),
            start: None,
            duration: DOUBLE_TAP_DURATION,
            interpolator: Interpolator::AccelerateDecelerate,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Anchor the session at `start` instead of at the first sample.
    pub fn starting_at(mut self, start: Duration) -> Self {
        self.start = Some(start);
        self
    }

    pub fn target_position(&self) -> Point {
        self.to_position
    }

    pub fn target_scale(&self) -> Option<f32> {
        self.scale.map(|(_, to)| to)
    }

    /// Frame for time `now` and whether the session is finished.
    ///
    /// The first call anchors the start time if none was given. The final
    /// frame carries the exact target values.
    pub fn sample(&mut self, now: Duration) -> (AnimationFrame, bool) {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);

        if elapsed >= self.duration {
            let frame = AnimationFrame {
                position: self.to_position,
                scale: self.target_scale(),
            };
            return (frame, true);
        }

        let fraction = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.interpolator.interpolate(fraction);

        let position = self.from_position + (self.to_position - self.from_position) * eased;
        let scale = self.scale.map(|(from, to)| from + (to - from) * eased);
        (AnimationFrame { position, scale }, false)
    }
}
