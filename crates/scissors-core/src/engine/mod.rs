//! Touch-to-transform engine.
//!
//! [`TransformEngine`] owns the image scale and position and turns pointer
//! events into an affine transform. A [`GestureRecognizer`] chosen by
//! [`EngineMode`] interprets the raw events:
//!
//! - [`PointerTracker`]: drag and pinch from raw pointer samples
//! - [`GestureDetector`]: slop-gated scroll, pinch, fling and double tap
//!
//! Whatever the gesture, the scale stays within
//! `[minimum_scale, maximum_scale]` and the image is pulled back to cover the
//! viewport whenever a pointer lifts. Fling and double tap run as an
//! [`Animation`] advanced by [`TransformEngine::tick`].

mod animator;
mod detector;
mod gesture;
mod pointer;
mod tracker;
mod velocity;

pub use animator::{
    Animation, AnimationFrame, Interpolator, DOUBLE_TAP_DURATION, FLING_DURATION,
};
pub use detector::{
    GestureDetector, DOUBLE_TAP_MIN_TIME, DOUBLE_TAP_SLOP, DOUBLE_TAP_TIMEOUT, MAX_FLING_VELOCITY,
    MIN_FLING_VELOCITY, TOUCH_SLOP,
};
pub use gesture::{Gesture, GestureRecognizer};
pub use pointer::{PointerAction, PointerEvent};
pub use tracker::{PointerTracker, MAX_POINTERS};
pub use velocity::VelocityTracker;

use crate::config::{CropConfig, EngineMode};
use crate::geometry::{compute_viewport, Point, Rect, Viewport};
use crate::transform::Affine;
use std::time::Duration;
use tracing::{debug, trace};

/// Fling axes slower than this after halving are dropped, in px/s.
pub const MINIMUM_FLING_VELOCITY: f32 = 2500.0;

const INFLEXION: f32 = 0.35;
const SCROLL_FRICTION: f32 = 0.015;
/// Gravity (m/s^2) * inches per meter * pixels per inch * tuning.
const PHYSICAL_COEFF: f32 = 9.806_65 * 39.37 * 160.0 * 0.84;

/// Scale and position of the image.
///
/// `position` is where the image centre sits, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub scale: f32,
    pub position: Point,
}

impl Default for TransformState {
    fn default() -> Self {
        // Scale stays 0 until an image arrives.
        Self {
            scale: 0.0,
            position: Point::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct TransformEngine {
    config: CropConfig,
    recognizer: Box<dyn GestureRecognizer>,
    state: TransformState,
    minimum_scale: f32,
    maximum_scale: f32,
    aspect_ratio: f32,
    image_bounds: Option<Rect>,
    bitmap_width: u32,
    bitmap_height: u32,
    available_width: u32,
    available_height: u32,
    viewport: Viewport,
    horizontal_limit: i32,
    vertical_limit: i32,
    animation: Option<Animation>,
}

impl TransformEngine {
    /// Create an engine whose recognizer follows `config.mode()`.
    pub fn new(config: CropConfig) -> Self {
        let recognizer = recognizer_for(config.mode());
        Self::with_recognizer(config, recognizer)
    }

    /// Create an engine driven by a custom recognizer.
    pub fn with_recognizer(config: CropConfig, recognizer: Box<dyn GestureRecognizer>) -> Self {
        Self {
            minimum_scale: config.min_scale(),
            maximum_scale: config.max_scale(),
            aspect_ratio: config.viewport_ratio(),
            config,
            recognizer,
            state: TransformState::default(),
            image_bounds: None,
            bitmap_width: 0,
            bitmap_height: 0,
            available_width: 0,
            available_height: 0,
            viewport: Viewport::default(),
            horizontal_limit: 0,
            vertical_limit: 0,
            animation: None,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Change the configuration.
    ///
    /// A new mode swaps the recognizer. A new viewport ratio, padding or
    /// scale bound resets the transform; colors and shape leave it alone.
    pub fn update_config(&mut self, update: impl FnOnce(&mut CropConfig)) {
        let before = self.config.clone();
        update(&mut self.config);

        if self.config.mode() != before.mode() {
            self.recognizer = recognizer_for(self.config.mode());
            self.cancel_animation();
        }
        let resize = self.config.viewport_ratio() != before.viewport_ratio()
            || self.config.overlay_padding() != before.overlay_padding()
            || self.config.min_scale() != before.min_scale()
            || self.config.max_scale() != before.max_scale();
        if resize {
            self.reset();
        }
    }

    /// Recompute viewport, scale bounds and position for a bitmap shown in
    /// a view of the given size.
    ///
    /// Without a bitmap (either dimension zero) the viewport collapses to
    /// zero and gestures are ignored until a bitmap is set.
    pub fn reset_for(
        &mut self,
        bitmap_width: u32,
        bitmap_height: u32,
        available_width: u32,
        available_height: u32,
    ) {
        self.aspect_ratio = self.config.viewport_ratio();
        self.image_bounds = Some(Rect::new(
            0,
            0,
            (available_width / 2) as i32,
            (available_height / 2) as i32,
        ));
        self.viewport = compute_viewport(
            bitmap_width,
            bitmap_height,
            available_width,
            available_height,
            &self.config,
        );

        self.bitmap_width = bitmap_width;
        self.bitmap_height = bitmap_height;
        self.available_width = available_width;
        self.available_height = available_height;
        self.recognizer.reset();
        self.cancel_animation();

        if self.is_interactive() {
            self.set_minimum_scale();
            self.set_limits();
            self.reset_position();
            self.ensure_inside_viewport();
        }

        debug!(
            bitmap_width,
            bitmap_height,
            viewport_width = self.viewport.width,
            viewport_height = self.viewport.height,
            minimum_scale = self.minimum_scale,
            scale = self.state.scale,
            "Reset transform"
        );
    }

    /// Re-run [`reset_for`](Self::reset_for) with the last known sizes.
    pub fn reset(&mut self) {
        self.reset_for(
            self.bitmap_width,
            self.bitmap_height,
            self.available_width,
            self.available_height,
        );
    }

    /// Whether a bitmap with a nonzero size is set.
    pub fn has_image(&self) -> bool {
        self.bitmap_width > 0 && self.bitmap_height > 0
    }

    /// Whether gestures apply: an image is set and the viewport has an area.
    pub fn is_interactive(&self) -> bool {
        self.has_image() && !self.viewport.is_empty()
    }

    /// Feed a pointer event. Ignored until [`is_interactive`](Self::is_interactive).
    pub fn on_event(&mut self, event: &PointerEvent) {
        if !self.is_interactive() {
            return;
        }
        if event.action == PointerAction::Down && self.animation.is_some() {
            debug!("Touch down interrupts animation");
            self.cancel_animation();
        }

        for gesture in self.recognizer.on_event(event) {
            trace!(?gesture, "Gesture");
            self.apply(gesture);
        }
    }

    fn apply(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Pan { delta, contain } => {
                self.state.position += delta;
                if contain {
                    self.ensure_inside_viewport();
                }
            }
            Gesture::Pinch { factor } => {
                self.state.scale = self.clamp_scale(self.state.scale * factor);
                self.set_limits();
            }
            Gesture::Settle => self.ensure_inside_viewport(),
            Gesture::Fling { velocity } => self.fling(velocity),
            Gesture::DoubleTap { at } => self.double_tap(at),
        }
    }

    /// Append the image transform to `matrix`: centre the bitmap on the
    /// origin, scale it, then move it to the current position.
    pub fn apply_positioning_and_scale(&self, matrix: &mut Affine) {
        matrix.post_translate(
            -(self.bitmap_width as f32) / 2.0,
            -(self.bitmap_height as f32) / 2.0,
        );
        matrix.post_scale(self.state.scale, self.state.scale);
        matrix.post_translate(self.state.position.x, self.state.position.y);
    }

    /// The image transform on its own.
    pub fn transform(&self) -> Affine {
        let mut matrix = Affine::identity();
        self.apply_positioning_and_scale(&mut matrix);
        matrix
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport.width
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport.height
    }

    /// Viewport ratio in effect at the last reset; `0.0` means the ratio of
    /// the bitmap.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Store a new viewport ratio and reset for it.
    pub fn set_aspect_ratio(&mut self, ratio: f32) {
        self.update_config(|config| config.set_viewport_ratio(ratio));
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn position(&self) -> Point {
        self.state.position
    }

    pub fn minimum_scale(&self) -> f32 {
        self.minimum_scale
    }

    pub fn maximum_scale(&self) -> f32 {
        self.maximum_scale
    }

    /// Half the view size; the viewport centre.
    pub fn image_bounds(&self) -> Option<Rect> {
        self.image_bounds
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Drop the running animation where it is.
    pub fn cancel_animation(&mut self) {
        if self.animation.take().is_some() {
            debug!("Animation cancelled");
        }
    }

    /// Advance the running animation to `now`.
    ///
    /// Returns `true` while another frame is needed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let (frame, finished) = animation.sample(now);

        if let Some(scale) = frame.scale {
            self.state.scale = scale;
            self.set_limits();
        }
        self.state.position = frame.position;
        self.ensure_inside_viewport();

        if finished {
            self.animation = None;
            self.ensure_inside_viewport();
            debug!(scale = self.state.scale, position = %self.state.position, "Animation finished");
        }
        !finished
    }

    /// Clamp the position so the scaled image covers the viewport.
    pub fn ensure_inside_viewport(&mut self) {
        let Some(bounds) = self.image_bounds else {
            return;
        };

        let bottom = bounds.bottom as f32;
        let vertical = self.vertical_limit as f32;
        let mut y = self.state.position.y;
        if bottom - y >= vertical {
            y = bottom - vertical;
        } else if y - bottom >= vertical {
            y = bottom + vertical;
        }

        let right = bounds.right as f32;
        let horizontal = self.horizontal_limit as f32;
        let mut x = self.state.position.x;
        if x <= right - horizontal {
            x = right - horizontal;
        } else if x > right + horizontal {
            x = right + horizontal;
        }

        self.state.position = Point::new(x, y);
    }

    fn set_minimum_scale(&mut self) {
        let fw = self.viewport.width as f32 / self.bitmap_width as f32;
        let fh = self.viewport.height as f32 / self.bitmap_height as f32;
        self.minimum_scale = fw.max(fh).max(self.config.min_scale());
        self.maximum_scale = self.config.max_scale().max(self.minimum_scale);
        self.state.scale = self.clamp_scale(self.state.scale);
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.max(self.minimum_scale).min(self.maximum_scale)
    }

    fn set_limits(&mut self) {
        self.horizontal_limit = compute_limit(
            (self.bitmap_width as f32 * self.state.scale) as i32,
            self.viewport.width as i32,
        );
        self.vertical_limit = compute_limit(
            (self.bitmap_height as f32 * self.state.scale) as i32,
            self.viewport.height as i32,
        );
    }

    fn reset_position(&mut self) {
        if let Some(bounds) = self.image_bounds {
            self.state.position = Point::new(bounds.right as f32, bounds.bottom as f32);
        }
    }

    fn start_animation(&mut self, animation: Animation) {
        debug!(
            to = %animation.target_position(),
            scale = ?animation.target_scale(),
            replaced = self.animation.is_some(),
            "Animation started"
        );
        self.animation = Some(animation);
    }

    fn fling(&mut self, velocity: Point) {
        let mut velocity = velocity * 0.5;
        if velocity.x.abs() < MINIMUM_FLING_VELOCITY {
            velocity.x = 0.0;
        }
        if velocity.y.abs() < MINIMUM_FLING_VELOCITY {
            velocity.y = 0.0;
        }
        if velocity == Point::ZERO {
            return;
        }
        let Some(bounds) = self.image_bounds else {
            return;
        };

        let reach_x = bounds.right as f32 * self.state.scale;
        let reach_y = bounds.bottom as f32 * self.state.scale;
        let from = self.state.position;
        let target = Point::new(
            from.x + fling_displacement(velocity.x, reach_x),
            from.y + fling_displacement(velocity.y, reach_y),
        );
        self.start_animation(Animation::translation(from, target));
    }

    fn double_tap(&mut self, at: Point) {
        let scale = self.state.scale;
        if scale <= 0.0 {
            return;
        }

        let at_minimum = (scale - self.minimum_scale).abs() <= self.minimum_scale * 1e-6;
        let target_scale = if at_minimum {
            (self.maximum_scale / 2.0).max(self.minimum_scale)
        } else {
            self.minimum_scale
        };

        // Keep the image point under the tap in place.
        let from = self.state.position;
        let to = at - (at - from) * (target_scale / scale);
        self.start_animation(Animation::zoom(from, to, scale, target_scale));
    }
}

fn recognizer_for(mode: EngineMode) -> Box<dyn GestureRecognizer> {
    match mode {
        EngineMode::Tracker => Box::new(PointerTracker::new()),
        EngineMode::Animated => Box::new(GestureDetector::new()),
    }
}

fn compute_limit(bitmap_size: i32, viewport_size: i32) -> i32 {
    (bitmap_size - viewport_size) / 2
}

/// Distance a fling at `velocity` travels before coming to rest, signed
/// like the velocity and limited to `reach`.
fn fling_displacement(velocity: f32, reach: f32) -> f32 {
    if velocity == 0.0 {
        return 0.0;
    }
    let deceleration_rate = 0.78_f32.ln() / 0.9_f32.ln();
    let l = (INFLEXION * velocity.abs() / (SCROLL_FRICTION * PHYSICAL_COEFF)).ln();
    let distance =
        SCROLL_FRICTION * PHYSICAL_COEFF * (deceleration_rate / (deceleration_rate - 1.0) * l).exp();
    velocity.signum() * distance.min(reach.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn engine_for(bitmap: (u32, u32), view: (u32, u32)) -> TransformEngine {
        let mut engine = TransformEngine::new(CropConfig::default());
        engine.reset_for(bitmap.0, bitmap.1, view.0, view.1);
        engine
    }

    fn animated_for(bitmap: (u32, u32), view: (u32, u32)) -> TransformEngine {
        let config = CropConfig::default().with_mode(EngineMode::Animated);
        let mut engine = TransformEngine::new(config);
        engine.reset_for(bitmap.0, bitmap.1, view.0, view.1);
        engine
    }

    fn two(action: PointerAction, index: usize, a: Point, b: Point, time: u64) -> PointerEvent {
        PointerEvent::new(action, index, vec![a, b], ms(time))
    }

    #[test]
    fn test_scale_after_reset() {
        let cases = [
            (100, 200, 100, 200, 1.0), // perfect match
            (100, 100, 200, 200, 2.0), // scale up, same ratio
            (100, 100, 50, 50, 0.5),   // scale down, same ratio
            (100, 110, 200, 200, 2.0), // scale up, tall bitmap
            (100, 110, 50, 50, 0.5),   // scale down, tall bitmap
            (110, 100, 200, 200, 2.0), // scale up, wide bitmap
            (110, 100, 50, 50, 0.5),   // scale down, wide bitmap
        ];

        for (bw, bh, vw, vh, expected) in cases {
            let engine = engine_for((bw, bh), (vw, vh));
            let matrix = engine.transform();
            assert_eq!(matrix.sx, expected, "{bw}x{bh} in {vw}x{vh}");
            assert_eq!(matrix.sy, expected, "{bw}x{bh} in {vw}x{vh}");
        }
    }

    #[test]
    fn test_transform_centres_image_on_position() {
        let engine = engine_for((200, 100), (100, 100));
        let matrix = engine.transform();

        let centre = matrix.map_point(p(100.0, 50.0));
        assert_eq!(centre, engine.position());
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_apply_appends_to_existing_matrix() {
        let engine = engine_for((100, 100), (100, 100));
        let mut matrix = Affine::translate(-10.0, -20.0);
        engine.apply_positioning_and_scale(&mut matrix);

        // Pre-existing translation applies first
        assert_eq!(matrix.map_point(p(60.0, 70.0)), p(50.0, 50.0));
    }

    #[test]
    fn test_viewport_follows_config() {
        let config = CropConfig::default().with_viewport_ratio(2.0).with_overlay_padding(10);
        let mut engine = TransformEngine::new(config);
        engine.reset_for(400, 400, 300, 300);

        assert_eq!(engine.viewport_width(), 280);
        assert_eq!(engine.viewport_height(), 140);
        assert_eq!(engine.aspect_ratio(), 2.0);
        assert_eq!(engine.minimum_scale(), 0.7);
    }

    #[test]
    fn test_set_aspect_ratio_resets() {
        let mut engine = engine_for((400, 200), (300, 300));
        assert_eq!(engine.viewport_width(), 300);
        assert_eq!(engine.viewport_height(), 300);

        engine.set_aspect_ratio(0.0);
        assert_eq!(engine.aspect_ratio(), 0.0);
        assert_eq!(engine.config().viewport_ratio(), 0.0);
        assert_eq!(engine.viewport_width(), 300);
        assert_eq!(engine.viewport_height(), 150);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = engine_for((640, 480), (320, 200));
        let first = engine.state();
        engine.reset_for(640, 480, 320, 200);
        assert_eq!(engine.state(), first);
    }

    #[test]
    fn test_no_image_ignores_events() {
        let mut engine = engine_for((0, 0), (100, 100));
        assert_eq!(engine.viewport(), Viewport::default());
        assert!(!engine.has_image());

        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(50.0, 50.0), ms(10)));
        assert_eq!(engine.position(), Point::ZERO);
    }

    #[test]
    fn test_unlaid_out_view_ignores_events() {
        let mut engine = engine_for((100, 100), (0, 0));
        assert!(engine.has_image());
        assert!(!engine.is_interactive());
        assert_eq!(engine.viewport(), Viewport::default());

        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(60.0, 40.0), ms(10)));
        assert_eq!(engine.position(), Point::ZERO);
        assert_eq!(engine.scale(), 0.0);
    }

    #[test]
    fn test_padding_swallowing_view_ignores_events() {
        let config = CropConfig::default().with_overlay_padding(80);
        let mut engine = TransformEngine::new(config);
        engine.reset_for(100, 100, 100, 100);
        assert!(engine.viewport().is_empty());
        assert!(!engine.is_interactive());

        let before = engine.state();
        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(60.0, 40.0), ms(10)));
        engine.on_event(&PointerEvent::up(p(60.0, 40.0), ms(20)));
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn test_drag_then_release_contains() {
        // Image is 200x100 at scale 1 over a 100x100 viewport
        let mut engine = engine_for((200, 100), (100, 100));

        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(90.0, 20.0), ms(10)));
        // Tracker drags freely while the pointer is down
        assert_eq!(engine.position(), p(130.0, 60.0));

        engine.on_event(&PointerEvent::up(p(90.0, 20.0), ms(20)));
        assert_eq!(engine.position(), p(100.0, 50.0));
    }

    #[test]
    fn test_pinch_clamps_to_maximum() {
        let mut engine = engine_for((100, 100), (100, 100));
        engine.on_event(&PointerEvent::down(p(40.0, 50.0), ms(0)));
        engine.on_event(&two(PointerAction::PointerDown, 1, p(40.0, 50.0), p(41.0, 50.0), 5));
        engine.on_event(&two(PointerAction::Move, 0, p(40.0, 50.0), p(100.0, 50.0), 10));

        assert_eq!(engine.scale(), engine.maximum_scale());
        assert_eq!(engine.scale(), 10.0);
    }

    #[test]
    fn test_pinch_clamps_to_minimum() {
        let mut engine = engine_for((100, 100), (100, 100));
        engine.on_event(&two(PointerAction::PointerDown, 1, p(0.0, 50.0), p(100.0, 50.0), 0));
        engine.on_event(&two(PointerAction::Move, 0, p(40.0, 50.0), p(60.0, 50.0), 10));

        assert_eq!(engine.scale(), 1.0);
    }

    #[test]
    fn test_animated_pinch_clamps_to_bounds() {
        let mut engine = animated_for((100, 100), (100, 100));
        let a = p(40.0, 50.0);
        engine.on_event(&PointerEvent::down(a, ms(0)));
        engine.on_event(&two(PointerAction::PointerDown, 1, a, p(50.0, 50.0), 5));

        engine.on_event(&two(PointerAction::Move, 0, a, p(60.0, 50.0), 10));
        assert_eq!(engine.scale(), 2.0);
        engine.on_event(&two(PointerAction::Move, 0, a, p(1000.0, 50.0), 20));
        assert_eq!(engine.scale(), 10.0);
        engine.on_event(&two(PointerAction::Move, 0, a, p(41.0, 50.0), 30));
        assert_eq!(engine.scale(), 1.0);
        // Two-finger motion never pans
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_pinch_then_release_contains() {
        let mut engine = engine_for((100, 100), (100, 100));
        engine.on_event(&two(PointerAction::PointerDown, 1, p(40.0, 50.0), p(60.0, 50.0), 0));
        engine.on_event(&two(PointerAction::Move, 0, p(30.0, 50.0), p(70.0, 50.0), 10));
        assert_eq!(engine.scale(), 2.0);

        // Zoom back out, then lift one finger
        engine.on_event(&two(PointerAction::Move, 0, p(40.0, 50.0), p(60.0, 50.0), 20));
        engine.on_event(&two(PointerAction::PointerUp, 1, p(40.0, 50.0), p(60.0, 50.0), 30));
        assert_eq!(engine.scale(), 1.0);
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_cancel_settles() {
        let mut engine = engine_for((200, 100), (100, 100));
        engine.on_event(&PointerEvent::down(p(0.0, 0.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(-500.0, 0.0), ms(10)));
        engine.on_event(&PointerEvent::cancel(ms(20)));
        assert_eq!(engine.position(), p(0.0, 50.0));
    }

    #[test]
    fn test_scale_bounds_stay_ordered_for_small_images() {
        let config = CropConfig::default().with_max_scale(2.0);
        let mut engine = TransformEngine::new(config);
        engine.reset_for(10, 10, 100, 100);

        assert_eq!(engine.minimum_scale(), 10.0);
        assert_eq!(engine.maximum_scale(), 10.0);
        assert_eq!(engine.scale(), 10.0);
    }

    #[test]
    fn test_animated_scroll_contains_immediately() {
        let mut engine = animated_for((200, 100), (100, 100));
        engine.on_event(&PointerEvent::down(p(10.0, 50.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(200.0, 50.0), ms(400)));
        assert_eq!(engine.position(), p(100.0, 50.0));
    }

    #[test]
    fn test_fling_animates_towards_projected_target() {
        let mut engine = animated_for((1000, 100), (100, 100));
        assert_eq!(engine.position(), p(50.0, 50.0));

        engine.on_event(&PointerEvent::down(p(10.0, 50.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(90.0, 50.0), ms(10)));
        assert_eq!(engine.position(), p(130.0, 50.0));
        engine.on_event(&PointerEvent::up(p(90.0, 50.0), ms(10)));

        assert!(engine.is_animating());
        assert!(engine.animation().unwrap().target_scale().is_none());

        assert!(engine.tick(ms(100)));
        assert_eq!(engine.position(), p(130.0, 50.0));
        assert!(!engine.tick(ms(400)));
        assert!(!engine.is_animating());
        // Reach is bounded by half the view at the current scale
        assert_eq!(engine.position(), p(180.0, 50.0));
    }

    #[test]
    fn test_slow_fling_does_not_animate() {
        let mut engine = animated_for((1000, 100), (100, 100));
        engine.on_event(&PointerEvent::down(p(10.0, 50.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(30.0, 50.0), ms(10)));
        engine.on_event(&PointerEvent::up(p(30.0, 50.0), ms(10)));
        assert!(!engine.is_animating());
    }

    fn double_tap(engine: &mut TransformEngine, at: Point, start: u64) {
        engine.on_event(&PointerEvent::down(at, ms(start)));
        engine.on_event(&PointerEvent::up(at, ms(start + 50)));
        engine.on_event(&PointerEvent::down(at, ms(start + 150)));
        engine.on_event(&PointerEvent::up(at, ms(start + 200)));
    }

    #[test]
    fn test_double_tap_zooms_in_and_out() {
        let mut engine = animated_for((200, 200), (100, 100));
        assert_eq!(engine.scale(), 0.5);

        double_tap(&mut engine, p(50.0, 50.0), 0);
        assert_eq!(engine.animation().unwrap().target_scale(), Some(5.0));
        engine.tick(ms(1000));
        engine.tick(ms(2000));
        assert_eq!(engine.scale(), 5.0);
        assert_eq!(engine.position(), p(50.0, 50.0));

        double_tap(&mut engine, p(60.0, 50.0), 3000);
        engine.tick(ms(4000));
        assert!(engine.tick(ms(4250)));
        assert!(engine.scale() < 5.0 && engine.scale() > 0.5);
        engine.tick(ms(5000));
        assert_eq!(engine.scale(), 0.5);
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_double_tap_keeps_tapped_point() {
        let mut engine = animated_for((200, 200), (100, 100));
        let tap = p(70.0, 40.0);
        let before = engine.transform().invert().unwrap().map_point(tap);

        double_tap(&mut engine, tap, 0);
        engine.tick(ms(1000));
        engine.tick(ms(2000));

        let after = engine.transform().invert().unwrap().map_point(tap);
        assert!((before.x - after.x).abs() < 1e-3, "{before} vs {after}");
        assert!((before.y - after.y).abs() < 1e-3, "{before} vs {after}");
    }

    #[test]
    fn test_new_session_replaces_old() {
        let mut engine = animated_for((1000, 1000), (100, 100));
        engine.on_event(&PointerEvent::down(p(10.0, 50.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(90.0, 50.0), ms(10)));
        engine.on_event(&PointerEvent::up(p(90.0, 50.0), ms(10)));
        assert!(engine.is_animating());

        engine.apply(Gesture::DoubleTap { at: p(50.0, 50.0) });
        let animation = engine.animation().unwrap();
        assert_eq!(animation.target_scale(), Some(5.0));
    }

    #[test]
    fn test_touch_down_cancels_animation() {
        let mut engine = animated_for((1000, 100), (100, 100));
        engine.apply(Gesture::Fling {
            velocity: p(9000.0, 0.0),
        });
        assert!(engine.is_animating());

        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(5000)));
        assert!(!engine.is_animating());
        assert!(!engine.tick(ms(5010)));
    }

    #[test]
    fn test_update_config_switches_recognizer() {
        let mut engine = engine_for((200, 100), (100, 100));
        engine.update_config(|config| config.set_mode(EngineMode::Animated));

        // A move within the touch slop no longer drags
        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(14.0, 10.0), ms(10)));
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_cosmetic_config_keeps_transform() {
        let mut engine = engine_for((200, 100), (100, 100));
        engine.on_event(&PointerEvent::down(p(10.0, 10.0), ms(0)));
        engine.on_event(&PointerEvent::moved(p(40.0, 10.0), ms(10)));
        engine.on_event(&PointerEvent::up(p(40.0, 10.0), ms(20)));
        let moved = engine.state();
        assert_eq!(moved.position, p(80.0, 50.0));

        engine.update_config(|config| config.set_overlay_color(0x8000_00FF));
        assert_eq!(engine.state(), moved);

        engine.update_config(|config| config.set_overlay_padding(4));
        assert_eq!(engine.position(), p(50.0, 50.0));
    }

    #[test]
    fn test_fling_displacement_is_bounded_and_signed() {
        assert_eq!(fling_displacement(0.0, 100.0), 0.0);
        assert_eq!(fling_displacement(-4000.0, 50.0), -50.0);

        let free = fling_displacement(2500.0, f32::MAX);
        assert!(free > 900.0 && free < 1000.0, "{free}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::CropConfig;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn minimum_scale_covers_viewport(
            bw in 1u32..3000,
            bh in 1u32..3000,
            aw in 1u32..2000,
            ah in 1u32..2000,
            ratio in prop_oneof![Just(0.0f32), 0.2f32..5.0],
        ) {
            let config = CropConfig::default().with_viewport_ratio(ratio);
            let mut engine = TransformEngine::new(config);
            engine.reset_for(bw, bh, aw, ah);
            // Extreme ratios can round one viewport side to zero
            prop_assume!(engine.is_interactive());

            let scale = engine.scale();
            let tolerance = 1e-3;
            prop_assert!(scale * bw as f32 >= engine.viewport_width() as f32 - tolerance);
            prop_assert!(scale * bh as f32 >= engine.viewport_height() as f32 - tolerance);
            prop_assert!(engine.minimum_scale() <= engine.maximum_scale());
        }

        #[test]
        fn ensure_inside_is_idempotent(
            bw in 1u32..2000,
            bh in 1u32..2000,
            dx in -5000.0f32..5000.0,
            dy in -5000.0f32..5000.0,
        ) {
            let mut engine = TransformEngine::new(CropConfig::default());
            engine.reset_for(bw, bh, 400, 300);
            engine.apply(Gesture::Pan { delta: Point::new(dx, dy), contain: false });

            engine.ensure_inside_viewport();
            let once = engine.position();
            engine.ensure_inside_viewport();
            prop_assert_eq!(engine.position(), once);
        }

        #[test]
        fn pinch_keeps_scale_in_bounds(
            mode in prop_oneof![Just(EngineMode::Tracker), Just(EngineMode::Animated)],
            spans in prop::collection::vec(1.0f32..800.0, 1..20),
        ) {
            let mut engine = TransformEngine::new(CropConfig::default().with_mode(mode));
            engine.reset_for(300, 200, 400, 400);

            let anchor = Point::new(200.0, 200.0);
            let event = |action, span: f32, t| {
                PointerEvent::new(
                    action,
                    1,
                    vec![anchor, Point::new(200.0 + span, 200.0)],
                    Duration::from_millis(t),
                )
            };

            engine.on_event(&PointerEvent::down(anchor, Duration::ZERO));
            engine.on_event(&event(PointerAction::PointerDown, 100.0, 1));
            for (i, span) in spans.into_iter().enumerate() {
                engine.on_event(&event(PointerAction::Move, span, i as u64 + 2));
                prop_assert!(engine.scale() >= engine.minimum_scale());
                prop_assert!(engine.scale() <= engine.maximum_scale());
            }
        }
    }
}
