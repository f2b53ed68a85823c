//! Release velocity estimation.
//!
//! Velocity is the least-squares slope of position over time, fitted
//! separately per axis to the samples of the last [`HORIZON`].

use crate::geometry::Point;
use std::collections::VecDeque;
use std::time::Duration;

/// Samples older than this relative to the newest one are ignored.
pub const HORIZON: Duration = Duration::from_millis(100);

const HISTORY_SIZE: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Duration, Point)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn add(&mut self, time: Duration, position: Point) {
        if let Some(&(last, _)) = self.samples.back() {
            if time < last {
                // Time went backwards; start over.
                self.samples.clear();
            }
        }
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back((time, position));
    }

    /// Estimated velocity in px/s, zero with fewer than two usable samples.
    pub fn velocity(&self) -> Point {
        let Some(&(newest, _)) = self.samples.back() else {
            return Point::ZERO;
        };

        let window: Vec<(f32, Point)> = self
            .samples
            .iter()
            .map(|(t, p)| (newest.saturating_sub(*t), *p))
            .filter(|(age, _)| *age <= HORIZON)
            .map(|(age, p)| (-age.as_secs_f32(), p))
            .collect();
        if window.len() < 2 {
            return Point::ZERO;
        }

        let n = window.len() as f32;
        let mean_t = window.iter().map(|(t, _)| t).sum::<f32>() / n;
        let mean_x = window.iter().map(|(_, p)| p.x).sum::<f32>() / n;
        let mean_y = window.iter().map(|(_, p)| p.y).sum::<f32>() / n;

        let mut var_t = 0.0;
        let mut cov_x = 0.0;
        let mut cov_y = 0.0;
        for (t, p) in &window {
            let dt = t - mean_t;
            var_t += dt * dt;
            cov_x += dt * (p.x - mean_x);
            cov_y += dt * (p.y - mean_y);
        }

        if var_t <= f32::EPSILON {
            return Point::ZERO;
        }
        Point::new(cov_x / var_t, cov_y / var_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_constant_motion() {
        let mut tracker = VelocityTracker::new();
        for i in 0..6 {
            tracker.add(ms(i * 10), Point::new(i as f32 * 20.0, i as f32 * -5.0));
        }
        let v = tracker.velocity();
        assert!((v.x - 2000.0).abs() < 1.0, "{v}");
        assert!((v.y + 500.0).abs() < 1.0, "{v}");
    }

    #[test]
    fn test_single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.add(ms(0), Point::new(5.0, 5.0));
        assert_eq!(tracker.velocity(), Point::ZERO);
    }

    #[test]
    fn test_old_samples_fall_out_of_horizon() {
        let mut tracker = VelocityTracker::new();
        tracker.add(ms(0), Point::new(0.0, 0.0));
        tracker.add(ms(10), Point::new(1000.0, 0.0));
        // Pointer rested for a while, then moved slowly.
        tracker.add(ms(300), Point::new(1000.0, 0.0));
        tracker.add(ms(350), Point::new(1005.0, 0.0));

        let v = tracker.velocity();
        assert!((v.x - 100.0).abs() < 1.0, "{v}");
    }

    #[test]
    fn test_clear() {
        let mut tracker = VelocityTracker::new();
        tracker.add(ms(0), Point::ZERO);
        tracker.add(ms(10), Point::new(10.0, 0.0));
        tracker.clear();
        assert_eq!(tracker.velocity(), Point::ZERO);
    }
}
