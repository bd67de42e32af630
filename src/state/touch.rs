// Touch gesture timing for the grid background: rate limiting and double-tap detection.

/// Minimum spacing between handled touch events (~60 per second).
pub const TOUCH_MIN_INTERVAL_MS: f64 = 16.0;
/// A tap is a touch shorter than this; two taps closer than this form a double tap.
pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchRelease {
    /// Ordinary lift; commit the head and leave a trail mark.
    Release,
    /// Second quick tap; reset the snake.
    DoubleTap,
    /// No touch was begun (its start was throttled or cancelled).
    Ignored,
}

#[derive(Default, Debug, Clone)]
pub struct TouchGesture {
    pub single_active: bool,
    last_event_ms: Option<f64>,
    start_ms: Option<f64>,
    last_tap_end_ms: Option<f64>,
}

impl TouchGesture {
    fn throttled(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_event_ms {
            if now_ms - last < TOUCH_MIN_INTERVAL_MS {
                return true;
            }
        }
        self.last_event_ms = Some(now_ms);
        false
    }

    /// Returns false when the event arrives too soon after the previous one.
    pub fn begin(&mut self, now_ms: f64) -> bool {
        if self.throttled(now_ms) {
            return false;
        }
        self.single_active = true;
        self.start_ms = Some(now_ms);
        true
    }

    pub fn track(&mut self, now_ms: f64) -> bool {
        self.single_active && !self.throttled(now_ms)
    }

    pub fn end(&mut self, now_ms: f64) -> TouchRelease {
        self.single_active = false;
        let Some(start) = self.start_ms.take() else {
            return TouchRelease::Ignored;
        };
        let was_tap = now_ms - start < DOUBLE_TAP_WINDOW_MS;
        if !was_tap {
            self.last_tap_end_ms = None;
            return TouchRelease::Release;
        }
        match self.last_tap_end_ms.take() {
            Some(prev) if now_ms - prev < DOUBLE_TAP_WINDOW_MS => TouchRelease::DoubleTap,
            _ => {
                self.last_tap_end_ms = Some(now_ms);
                TouchRelease::Release
            }
        }
    }

    pub fn cancel(&mut self) {
        self.single_active = false;
        self.start_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_inside_frame_budget_are_dropped() {
        let mut g = TouchGesture::default();
        assert!(g.begin(0.0));
        assert!(!g.track(10.0));
        assert!(g.track(20.0));
        assert!(!g.track(30.0));
        assert!(g.track(40.0));
    }

    #[test]
    fn two_quick_taps_make_a_double_tap() {
        let mut g = TouchGesture::default();
        assert!(g.begin(0.0));
        assert_eq!(g.end(80.0), TouchRelease::Release);
        assert!(g.begin(150.0));
        assert_eq!(g.end(220.0), TouchRelease::DoubleTap);
        // a third tap starts a new pair
        assert!(g.begin(300.0));
        assert_eq!(g.end(350.0), TouchRelease::Release);
    }

    #[test]
    fn slow_taps_or_long_presses_do_not_reset() {
        let mut g = TouchGesture::default();
        g.begin(0.0);
        assert_eq!(g.end(50.0), TouchRelease::Release);
        g.begin(600.0);
        assert_eq!(g.end(650.0), TouchRelease::Release);

        let mut g = TouchGesture::default();
        g.begin(0.0);
        g.end(50.0);
        g.begin(100.0);
        assert_eq!(g.end(900.0), TouchRelease::Release);
    }

    #[test]
    fn release_of_a_throttled_touch_is_ignored() {
        let mut g = TouchGesture::default();
        assert!(g.begin(0.0));
        assert_eq!(g.end(5.0), TouchRelease::Release);
        // second start lands inside the frame budget and is dropped
        assert!(!g.begin(10.0));
        assert_eq!(g.end(30.0), TouchRelease::Ignored);

        let mut g = TouchGesture::default();
        g.begin(0.0);
        g.cancel();
        assert_eq!(g.end(20.0), TouchRelease::Ignored);
    }

    #[test]
    fn moves_without_active_touch_are_ignored() {
        let mut g = TouchGesture::default();
        assert!(!g.track(100.0));
        g.begin(200.0);
        g.cancel();
        assert!(!g.track(300.0));
    }
}
