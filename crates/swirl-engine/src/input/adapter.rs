use crate::coords::{ScreenPoint, SurfaceMetrics};
use crate::pointer::{MAX_POINTERS, PointerTracker};

use super::types::{InputEvent, PointerPrecision};

/// Routes touch and mouse input into a [`PointerTracker`].
///
/// - Touch start/move replace the tracked set with the full list of touches.
/// - Touch end clears every pointer, even when other touches remain down.
/// - Mouse input is ignored on coarse devices. Moves count only between a
///   mouse-down and the following mouse-up.
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    precision: PointerPrecision,
    mouse_tracking: bool,
    mouse_points: Vec<ScreenPoint>,
}

impl InputAdapter {
    pub fn new(precision: PointerPrecision) -> Self {
        Self {
            precision,
            mouse_tracking: false,
            mouse_points: Vec::new(),
        }
    }

    #[inline]
    pub fn precision(&self) -> PointerPrecision {
        self.precision
    }

    /// True between a mouse-down and the next mouse-up.
    #[inline]
    pub fn is_tracking_mouse(&self) -> bool {
        self.mouse_tracking
    }

    pub fn on_touch_start(&mut self, tracker: &mut PointerTracker, touches: &[ScreenPoint]) {
        tracker.set_from_list(touches, MAX_POINTERS);
    }

    pub fn on_touch_move(&mut self, tracker: &mut PointerTracker, touches: &[ScreenPoint]) {
        tracker.set_from_list(touches, MAX_POINTERS);
    }

    pub fn on_touch_end(&mut self, tracker: &mut PointerTracker) {
        tracker.clear();
    }

    pub fn on_mouse_down(&mut self) {
        if self.mouse_enabled() {
            self.mouse_tracking = true;
        }
    }

    pub fn on_mouse_move(&mut self, tracker: &mut PointerTracker, cursor: ScreenPoint) {
        if !self.mouse_enabled() || !self.mouse_tracking {
            return;
        }
        let points = self.merge_mouse(&[cursor]);
        tracker.set_from_list(&points, MAX_POINTERS);
    }

    pub fn on_mouse_up(&mut self, tracker: &mut PointerTracker) {
        if !self.mouse_enabled() {
            return;
        }
        self.mouse_tracking = false;
        tracker.clear();

        let points = self.merge_mouse(&[]);
        tracker.set_from_list(&points, MAX_POINTERS);
    }

    pub fn on_resize(&mut self, tracker: &mut PointerTracker, metrics: SurfaceMetrics) {
        tracker.set_metrics(metrics);
    }

    /// Dispatches one event to the matching handler.
    pub fn handle(&mut self, tracker: &mut PointerTracker, event: &InputEvent) {
        match event {
            InputEvent::TouchStart(touches) => self.on_touch_start(tracker, touches),
            InputEvent::TouchMove(touches) => self.on_touch_move(tracker, touches),
            InputEvent::TouchEnd => self.on_touch_end(tracker),
            InputEvent::MouseDown => self.on_mouse_down(),
            InputEvent::MouseMove(p) => self.on_mouse_move(tracker, *p),
            InputEvent::MouseUp => self.on_mouse_up(tracker),
            InputEvent::Resize(m) => self.on_resize(tracker, *m),
        }
    }

    /// Pinned mouse points followed by `extra`.
    pub fn merge_mouse(&self, extra: &[ScreenPoint]) -> Vec<ScreenPoint> {
        self.mouse_points.iter().chain(extra).copied().collect()
    }

    /// Adds a point that stays in every mouse merge until cleared.
    pub fn pin_mouse_point(&mut self, point: ScreenPoint) {
        self.mouse_points.push(point);
    }

    pub fn clear_mouse_points(&mut self) {
        self.mouse_points.clear();
    }

    #[inline]
    fn mouse_enabled(&self) -> bool {
        self.precision == PointerPrecision::Fine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::POINTER_SCALARS;

    fn tracker() -> PointerTracker {
        PointerTracker::new(SurfaceMetrics::from_logical(1000.0, 800.0, 2.0))
    }

    fn pt(x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    // ── touch ──

    #[test]
    fn touch_start_stores_device_coordinates() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(100.0, 200.0)]));

        let mut expected = [0.0; POINTER_SCALARS];
        expected[0] = 200.0;
        expected[1] = 1200.0;
        assert_eq!(t.buffer().as_slice(), &expected);
    }

    #[test]
    fn touch_move_replaces_the_whole_set() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(1.0, 1.0), pt(2.0, 2.0), pt(3.0, 3.0)]));
        input.handle(&mut t, &InputEvent::TouchMove(vec![pt(10.0, 0.0)]));

        assert_eq!(t.active_count(), 1);
        assert_eq!(t.buffer().pair(0), Some([20.0, 1600.0]));
        assert_eq!(t.buffer().pair(1), Some([0.0, 0.0]));
    }

    #[test]
    fn touch_end_clears_even_with_touches_remaining() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(5.0, 5.0), pt(6.0, 6.0)]));
        input.handle(&mut t, &InputEvent::TouchEnd);

        assert!(t.buffer().is_zeroed());
    }

    #[test]
    fn touch_works_on_coarse_devices() {
        let mut input = InputAdapter::new(PointerPrecision::Coarse);
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(5.0, 5.0)]));
        assert_eq!(t.active_count(), 1);
    }

    // ── mouse ──

    #[test]
    fn mouse_move_without_down_is_ignored() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::MouseMove(pt(50.0, 50.0)));

        assert!(t.buffer().is_zeroed());
        assert!(!input.is_tracking_mouse());
    }

    #[test]
    fn mouse_drag_tracks_cursor_then_clears() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::MouseDown);
        input.handle(&mut t, &InputEvent::MouseMove(pt(50.0, 100.0)));
        assert_eq!(t.buffer().pair(0), Some([100.0, 1400.0]));

        input.handle(&mut t, &InputEvent::MouseMove(pt(60.0, 100.0)));
        assert_eq!(t.buffer().pair(0), Some([120.0, 1400.0]));
        assert_eq!(t.active_count(), 1);

        input.handle(&mut t, &InputEvent::MouseUp);
        assert!(t.buffer().is_zeroed());

        input.handle(&mut t, &InputEvent::MouseMove(pt(70.0, 100.0)));
        assert!(t.buffer().is_zeroed());
    }

    #[test]
    fn coarse_devices_ignore_mouse() {
        let mut input = InputAdapter::new(PointerPrecision::Coarse);
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::MouseDown);
        input.handle(&mut t, &InputEvent::MouseMove(pt(50.0, 50.0)));
        assert!(t.buffer().is_zeroed());

        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(1.0, 1.0)]));
        input.handle(&mut t, &InputEvent::MouseUp);
        assert_eq!(t.active_count(), 1);
    }

    #[test]
    fn merge_mouse_puts_pinned_points_first() {
        let mut input = InputAdapter::default();
        input.pin_mouse_point(pt(1.0, 1.0));
        input.pin_mouse_point(pt(2.0, 2.0));

        assert_eq!(input.merge_mouse(&[pt(3.0, 3.0)]), [pt(1.0, 1.0), pt(2.0, 2.0), pt(3.0, 3.0)]);
        assert_eq!(input.merge_mouse(&[]), [pt(1.0, 1.0), pt(2.0, 2.0)]);

        input.clear_mouse_points();
        assert!(input.merge_mouse(&[]).is_empty());
    }

    #[test]
    fn mouse_up_reapplies_pinned_points() {
        let mut input = InputAdapter::default();
        let mut t = tracker();
        input.pin_mouse_point(pt(10.0, 10.0));

        input.handle(&mut t, &InputEvent::MouseDown);
        input.handle(&mut t, &InputEvent::MouseMove(pt(20.0, 20.0)));
        assert_eq!(t.active_count(), 2);

        input.handle(&mut t, &InputEvent::MouseUp);
        assert_eq!(t.active_count(), 1);
        assert_eq!(t.buffer().pair(0), Some([20.0, 1580.0]));
    }

    // ── resize ──

    #[test]
    fn resize_changes_the_transform_for_later_events() {
        let mut input = InputAdapter::default();
        let mut t = tracker();

        input.handle(&mut t, &InputEvent::Resize(SurfaceMetrics::from_logical(500.0, 400.0, 1.0)));
        input.handle(&mut t, &InputEvent::TouchStart(vec![pt(100.0, 100.0)]));

        assert_eq!(t.buffer().pair(0), Some([100.0, 300.0]));
    }
}
