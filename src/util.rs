// Browser helpers: console logging, platform detection and page swipe gestures.

use std::sync::LazyLock;

use log::{Level, LevelFilter, Log, Metadata, Record};
use regex::Regex;
use wasm_bindgen::JsValue;

use crate::model::DeviceCapabilities;

/// Forwards `log` records to the browser console.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::log!(line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger; later calls keep the first logger.
pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

static PHONE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Mobile|Android|iOS|iPhone|iPad|iPod|Windows Phone|KFAPWI").expect("valid regex")
});

pub fn capabilities_from(user_agent: &str, has_vibrate: bool) -> DeviceCapabilities {
    let is_constrained_device = PHONE_UA.is_match(user_agent);
    DeviceCapabilities {
        is_constrained_device,
        supports_haptics: is_constrained_device && has_vibrate,
    }
}

/// Reads the current browser's user agent and vibration support.
pub fn detect_capabilities() -> DeviceCapabilities {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return DeviceCapabilities::default();
    };
    let ua = navigator.user_agent().unwrap_or_default();
    let has_vibrate = js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false);
    let caps = capabilities_from(&ua, has_vibrate);
    log::debug!("device capabilities {caps:?}");
    caps
}

// ---------------- Page swipes -----------------

const SWIPE_MIN_DISTANCE: f64 = 30.0;
const SWIPE_MIN_MS: f64 = 50.0;
const SWIPE_MAX_MS: f64 = 1000.0;
/// Touches this close to the canvas edge still navigate between pages.
pub const CANVAS_EDGE_BAND: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
    Undirected,
}

/// Classifies a finished touch by its travel. Returns `None` for touches that
/// were too quick or too slow to count as a swipe.
pub fn classify_swipe(dx: f64, dy: f64, duration_ms: f64) -> Option<SwipeDirection> {
    if !(duration_ms > SWIPE_MIN_MS && duration_ms < SWIPE_MAX_MS) {
        return None;
    }
    if dx.hypot(dy) < SWIPE_MIN_DISTANCE {
        return Some(SwipeDirection::Undirected);
    }
    let angle = dy.atan2(dx).to_degrees();
    let dir = if (-150.0..=-30.0).contains(&angle) {
        SwipeDirection::Up
    } else if angle > 30.0 && angle < 150.0 {
        SwipeDirection::Down
    } else if angle.abs() >= 120.0 {
        SwipeDirection::Left
    } else if angle.abs() <= 60.0 {
        SwipeDirection::Right
    } else {
        SwipeDirection::Undirected
    };
    Some(dir)
}

/// True when a canvas-local point sits in the interactive middle of the canvas.
pub fn in_canvas_interior(x: f64, y: f64, width: f64, height: f64) -> bool {
    x > CANVAS_EDGE_BAND && x < width - CANVAS_EDGE_BAND && y > CANVAS_EDGE_BAND && y < height - CANVAS_EDGE_BAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phones_are_constrained() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
        assert_eq!(
            capabilities_from(iphone, true),
            DeviceCapabilities { is_constrained_device: true, supports_haptics: true }
        );
        let desktop = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";
        assert_eq!(capabilities_from(desktop, true), DeviceCapabilities::default());
    }

    #[test]
    fn swipes_need_distance_and_reasonable_duration() {
        assert_eq!(classify_swipe(0.0, -200.0, 20.0), None);
        assert_eq!(classify_swipe(0.0, -200.0, 1500.0), None);
        assert_eq!(classify_swipe(10.0, -10.0, 200.0), Some(SwipeDirection::Undirected));
    }

    #[test]
    fn swipe_angle_bands() {
        assert_eq!(classify_swipe(0.0, -100.0, 200.0), Some(SwipeDirection::Up));
        assert_eq!(classify_swipe(20.0, 100.0, 200.0), Some(SwipeDirection::Down));
        assert_eq!(classify_swipe(-100.0, 5.0, 200.0), Some(SwipeDirection::Left));
        assert_eq!(classify_swipe(100.0, 10.0, 200.0), Some(SwipeDirection::Right));
        // just under 30 degrees still reads as horizontal
        assert_eq!(classify_swipe(100.0, 57.0, 200.0), Some(SwipeDirection::Right));
        assert_eq!(classify_swipe(100.0, 60.0, 200.0), Some(SwipeDirection::Down));
    }

    #[test]
    fn canvas_edges_belong_to_navigation() {
        assert!(in_canvas_interior(200.0, 300.0, 400.0, 800.0));
        assert!(!in_canvas_interior(20.0, 300.0, 400.0, 800.0));
        assert!(!in_canvas_interior(200.0, 780.0, 400.0, 800.0));
    }
}
