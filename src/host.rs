//! Browser host for the grid engine: binds a canvas, drives the frame loop and
//! forwards DOM input.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Navigator, TouchEvent};

use crate::engine::tuning::PROBE_ITERATIONS;
use crate::engine::{GridEngine, HapticPattern, Surface};
use crate::error::EngineError;
use crate::model::GridConfig;
use crate::state::touch::{TouchGesture, TouchRelease};

const FIRST_FOOD_DELAY_MS: u32 = 500;
const ORIENTATION_SETTLE_MS: u32 = 300;

/// [`Surface`] backed by a 2d canvas context. Canvas errors are dropped so a bad
/// frame never stops the loop.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.ctx.set_transform(a, b, c, d, e, f).ok();
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ctx.translate(x, y).ok();
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.ctx.set_shadow_color(color);
        self.ctx.set_shadow_blur(blur);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn fill_vignette(&mut self, cx: f64, cy: f64, radius: f64, inner: &str, outer: &str, w: f64, h: f64) {
        match self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius) {
            Ok(gradient) => {
                gradient.add_color_stop(0.0, inner).ok();
                gradient.add_color_stop(1.0, outer).ok();
                self.ctx.set_fill_style_canvas_gradient(&gradient);
                self.ctx.fill_rect(0.0, 0.0, w, h);
            }
            Err(err) => log::debug!("vignette skipped: {}", EngineError::from(err)),
        }
    }
}

/// One animated background bound to one canvas.
///
/// Created with [`GridAnimation::create`], started with [`GridAnimation::init`]
/// and torn down with [`GridAnimation::destroy`]. All callbacks hold weak
/// references, so dropping the last `Rc` also stops everything.
pub struct GridAnimation {
    canvas: HtmlCanvasElement,
    surface: RefCell<CanvasSurface>,
    engine: RefCell<GridEngine>,
    gesture: RefCell<TouchGesture>,
    frame: RefCell<Option<AnimationFrame>>,
    last_frame_ms: Cell<Option<f64>>,
    listeners: RefCell<Vec<EventListener>>,
    first_food_timer: RefCell<Option<Timeout>>,
    orientation_timer: RefCell<Option<Timeout>>,
    paused: Cell<bool>,
    destroyed: Cell<bool>,
}

impl GridAnimation {
    pub fn create(canvas: Option<HtmlCanvasElement>, config: GridConfig) -> Result<Rc<Self>, EngineError> {
        let canvas = canvas.ok_or(EngineError::MissingCanvas)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EngineError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable)?;
        let engine = GridEngine::new(config, Box::new(js_sys::Math::random));
        Ok(Rc::new(Self {
            canvas,
            surface: RefCell::new(CanvasSurface::new(ctx)),
            engine: RefCell::new(engine),
            gesture: RefCell::new(TouchGesture::default()),
            frame: RefCell::new(None),
            last_frame_ms: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            first_food_timer: RefCell::new(None),
            orientation_timer: RefCell::new(None),
            paused: Cell::new(false),
            destroyed: Cell::new(false),
        }))
    }

    pub fn init(self: &Rc<Self>) {
        if self.destroyed.get() {
            log::warn!("init called on a destroyed grid animation");
            return;
        }
        self.resize();
        self.attach_listeners();

        let constrained = self.engine.borrow().config().capabilities.is_constrained_device;
        if constrained {
            if let Some(score) = self.probe_performance() {
                self.engine.borrow_mut().apply_performance_score(score);
            }
        }

        self.schedule_frame();

        if constrained {
            let weak = Rc::downgrade(self);
            let timer = Timeout::new(FIRST_FOOD_DELAY_MS, move || {
                if let Some(host) = weak.upgrade() {
                    host.first_food_timer.borrow_mut().take();
                    host.engine.borrow_mut().spawn_food();
                }
            });
            rearm(&self.first_food_timer, timer);
        } else {
            self.engine.borrow_mut().spawn_food();
        }
        log::debug!("grid animation started (constrained: {constrained})");
    }

    /// Stops the loop and removes every listener. Safe to call more than once.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.first_food_timer.borrow_mut().take();
        self.orientation_timer.borrow_mut().take();
        log::debug!("grid animation destroyed");
    }

    // ---------------- Frame loop -----------------

    fn schedule_frame(self: &Rc<Self>) {
        if self.destroyed.get() || self.paused.get() || self.frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            if let Some(host) = weak.upgrade() {
                host.on_frame(timestamp);
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        self.frame.borrow_mut().take();
        if self.destroyed.get() {
            return;
        }
        let elapsed = match self.last_frame_ms.replace(Some(timestamp)) {
            Some(prev) => (timestamp - prev).max(0.0),
            None => 0.0,
        };
        {
            let mut engine = self.engine.borrow_mut();
            let mut surface = self.surface.borrow_mut();
            engine.tick(elapsed, &mut *surface);
        }
        self.flush_haptics();
        self.schedule_frame();
    }

    fn set_hidden(self: &Rc<Self>, hidden: bool) {
        if hidden {
            self.paused.set(true);
            self.frame.borrow_mut().take();
        } else if self.paused.replace(false) {
            // next frame measures from itself, not from before the pause
            self.last_frame_ms.set(None);
            self.schedule_frame();
        }
    }

    // ---------------- Geometry -----------------

    fn resize(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = self.canvas.offset_width() as f64;
        let height = self.canvas.offset_height() as f64;
        let mut engine = self.engine.borrow_mut();
        engine.resize(width, height, window.device_pixel_ratio());
        let vp = engine.viewport();
        self.canvas.set_width(vp.pixel_width());
        self.canvas.set_height(vp.pixel_height());
    }

    fn local_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (client_x as f64 - rect.left(), client_y as f64 - rect.top())
    }

    /// Times a burst of 1x1 fills; only run once, on constrained devices.
    fn probe_performance(&self) -> Option<f64> {
        let perf = web_sys::window()?.performance()?;
        let surface = self.surface.borrow();
        let start = perf.now();
        for _ in 0..PROBE_ITERATIONS {
            surface.ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        }
        Some(perf.now() - start)
    }

    // ---------------- Input -----------------

    fn attach_listeners(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let constrained = self.engine.borrow().config().capabilities.is_constrained_device;
        let mut listeners = Vec::new();

        listeners.push(EventListener::new(&window, "resize", self.handler(|host, _| host.resize())));

        listeners.push(EventListener::new(
            &self.canvas,
            "mousemove",
            self.handler(|host, event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let (x, y) = host.local_point(event.client_x(), event.client_y());
                    host.engine.borrow_mut().pointer_move(x, y);
                }
            }),
        ));

        listeners.push(EventListener::new(
            &self.canvas,
            "mouseleave",
            self.handler(|host, _| host.engine.borrow_mut().pointer_leave()),
        ));

        if let Some(document) = window.document() {
            let doc = document.clone();
            listeners.push(EventListener::new(
                &document,
                "visibilitychange",
                self.handler(move |host, _| host.set_hidden(doc.hidden())),
            ));
        }

        if constrained {
            self.attach_touch_listeners(&mut listeners);

            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new(&window, "orientationchange", move |_| {
                let Some(host) = weak.upgrade() else {
                    return;
                };
                let settle = Rc::downgrade(&host);
                let timer = Timeout::new(ORIENTATION_SETTLE_MS, move || {
                    if let Some(host) = settle.upgrade() {
                        host.orientation_timer.borrow_mut().take();
                        host.resize();
                        host.engine.borrow_mut().spawn_food();
                    }
                });
                rearm(&host.orientation_timer, timer);
            }));
        }

        self.listeners.borrow_mut().extend(listeners);
    }

    fn attach_touch_listeners(self: &Rc<Self>, listeners: &mut Vec<EventListener>) {
        let options = EventListenerOptions::enable_prevent_default();

        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "touchstart",
            options,
            self.handler(|host, event| {
                event.prevent_default();
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let touches = event.touches();
                if touches.length() != 1 || !host.gesture.borrow_mut().begin(now_ms()) {
                    return;
                }
                if let Some(touch) = touches.get(0) {
                    let (x, y) = host.local_point(touch.client_x(), touch.client_y());
                    host.engine.borrow_mut().touch_start(x, y);
                }
            }),
        ));

        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "touchmove",
            options,
            self.handler(|host, event| {
                event.prevent_default();
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let touches = event.touches();
                if touches.length() != 1 || !host.gesture.borrow_mut().track(now_ms()) {
                    return;
                }
                if let Some(touch) = touches.get(0) {
                    let (x, y) = host.local_point(touch.client_x(), touch.client_y());
                    host.engine.borrow_mut().touch_move(x, y);
                }
            }),
        ));

        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "touchend",
            options,
            self.handler(|host, event| {
                event.prevent_default();
                let release = host.gesture.borrow_mut().end(now_ms());
                let mut engine = host.engine.borrow_mut();
                match release {
                    TouchRelease::DoubleTap => engine.reset_snake(),
                    TouchRelease::Release => engine.touch_end(),
                    TouchRelease::Ignored => {}
                }
            }),
        ));

        listeners.push(EventListener::new_with_options(
            &self.canvas,
            "touchcancel",
            options,
            self.handler(|host, event| {
                event.prevent_default();
                host.gesture.borrow_mut().cancel();
            }),
        ));
    }

    /// Wraps a DOM callback so it only runs while the host is alive, then
    /// forwards any queued haptics.
    fn handler<F>(self: &Rc<Self>, f: F) -> impl FnMut(&web_sys::Event) + 'static
    where
        F: Fn(&Rc<Self>, &web_sys::Event) + 'static,
    {
        let weak: Weak<Self> = Rc::downgrade(self);
        move |event: &web_sys::Event| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            if host.destroyed.get() {
                return;
            }
            f(&host, event);
            host.flush_haptics();
        }
    }

    // ---------------- Haptics -----------------

    fn flush_haptics(&self) {
        let patterns = self.engine.borrow_mut().drain_haptics();
        if patterns.is_empty() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        for pattern in patterns {
            vibrate(&navigator, pattern);
        }
    }
}

impl Drop for GridAnimation {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn vibrate(navigator: &Navigator, pattern: HapticPattern) {
    let accepted = match pattern.durations_ms() {
        [single] => navigator.vibrate_with_duration(*single),
        steps => {
            let array = js_sys::Array::new();
            for step in steps {
                array.push(&JsValue::from(*step));
            }
            navigator.vibrate_with_pattern(&array)
        }
    };
    if !accepted {
        log::debug!("vibration {pattern:?} rejected");
    }
}

/// Puts `timer` in `slot`; a timer still pending there is dropped, which
/// cancels it.
fn rearm<T>(slot: &RefCell<Option<T>>, timer: T) {
    let previous = slot.borrow_mut().replace(timer);
    drop(previous);
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pending(Rc<Cell<u32>>);

    impl Drop for Pending {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn rearming_cancels_the_pending_timer() {
        let cancelled = Rc::new(Cell::new(0));
        let slot = RefCell::new(None);
        for _ in 0..5 {
            rearm(&slot, Pending(cancelled.clone()));
        }
        assert_eq!(cancelled.get(), 4);
        assert!(slot.borrow().is_some());
        slot.borrow_mut().take();
        assert_eq!(cancelled.get(), 5);
    }
}
