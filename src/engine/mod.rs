//! Grid animation engine.
//!
//! A host feeds it canvas geometry, pointer/touch positions in canvas-local CSS
//! pixels and per-frame elapsed time; the engine owns all scroll, snake, food,
//! trail and opacity state and draws through a [`Surface`]. It never schedules
//! anything itself, which keeps every step reproducible from synthetic input.

pub mod color;
pub mod render;
pub mod snake;
pub mod trail;
pub mod tuning;

pub use render::Surface;

use crate::model::{GridConfig, GridOffset, ScrollDirection, TileCoord};
use color::{Rgba, SnakePalette};
use snake::Snake;
use trail::{TrailMark, TrailMarks};
use tuning::{PerformanceTier, Tuning};

/// Source of uniform samples in `[0, 1)`.
pub type RandomSource = Box<dyn FnMut() -> f64>;

const MOUSE_HOVER_OPACITY: f64 = 0.6;
const TOUCH_HOVER_OPACITY: f64 = 0.8;
/// Head stays faintly lit after a finger lifts.
const TOUCH_RELEASED_OPACITY: f64 = 0.4;
const MOUSE_TRAIL_OPACITY: f64 = 0.6;
const TOUCH_TRAIL_OPACITY: f64 = 0.8;
const FOOD_SAMPLE_LIMIT: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticPattern {
    TouchStart,
    Eat,
    Reset,
}

impl HapticPattern {
    pub fn durations_ms(self) -> &'static [u32] {
        match self {
            HapticPattern::TouchStart => &[10],
            HapticPattern::Eat => &[100],
            HapticPattern::Reset => &[50, 50, 50],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Food {
    pub coord: TileCoord,
    pub color: String,
    /// Scroll phase when the block was placed.
    pub placed_at: GridOffset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    /// Device pixel ratio, never below 1.
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { css_width: 0.0, css_height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    pub fn pixel_width(&self) -> u32 {
        (self.css_width * self.dpr).floor() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.css_height * self.dpr).floor() as u32
    }
}

pub struct GridEngine {
    config: GridConfig,
    tuning: Tuning,
    palette: SnakePalette,
    hover_rgb: Rgba,
    trail_rgb: Rgba,
    viewport: Viewport,
    offset: GridOffset,
    hovered: Option<TileCoord>,
    snake: Snake,
    food: Option<Food>,
    trail: TrailMarks,
    opacity: f64,
    target_opacity: f64,
    random: RandomSource,
    haptics: Vec<HapticPattern>,
    /// Set by the first `spawn_food`; from then on a missing block is replaced
    /// as soon as the grid has room for one.
    food_armed: bool,
}

impl GridEngine {
    pub fn new(config: GridConfig, random: RandomSource) -> Self {
        let palette = SnakePalette::from_config(&config.snake_head_color, &config.snake_tail_color);
        let hover_rgb = render::parse_or_white(&config.hover_fill_color);
        let trail_rgb = render::parse_or_white(&config.trail_color);
        Self {
            tuning: Tuning::from_config(&config),
            config,
            palette,
            hover_rgb,
            trail_rgb,
            viewport: Viewport::default(),
            offset: GridOffset::default(),
            hovered: None,
            snake: Snake::default(),
            food: None,
            trail: TrailMarks::default(),
            opacity: 0.0,
            target_opacity: 0.0,
            random,
            haptics: Vec::new(),
            food_armed: false,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn offset(&self) -> GridOffset {
        self.offset
    }

    pub fn hovered(&self) -> Option<TileCoord> {
        self.hovered
    }

    pub fn snake_body(&self) -> Vec<TileCoord> {
        self.snake.body().copied().collect()
    }

    pub fn growth_pending(&self) -> bool {
        self.snake.growth_pending()
    }

    pub fn food(&self) -> Option<&Food> {
        self.food.as_ref()
    }

    pub fn trail(&self) -> &TrailMarks {
        &self.trail
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn target_opacity(&self) -> f64 {
        self.target_opacity
    }

    /// Takes the vibration requests queued since the last call.
    pub fn drain_haptics(&mut self) -> Vec<HapticPattern> {
        std::mem::take(&mut self.haptics)
    }

    fn haptic(&mut self, pattern: HapticPattern) {
        if self.config.vibration_enabled && self.config.capabilities.supports_haptics {
            self.haptics.push(pattern);
        }
    }

    // ---------------- Lifecycle & sizing -----------------

    /// Records the canvas display size and pixel density. Non-finite or
    /// negative sizes collapse to zero; the density is clamped to at least 1.
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        self.viewport = Viewport {
            css_width: clean(css_width),
            css_height: clean(css_height),
            dpr: if dpr.is_finite() { dpr.max(1.0) } else { 1.0 },
        };
    }

    /// Applies the result of the host's fill-rect probe once at start-up.
    pub fn apply_performance_score(&mut self, score_ms: f64) -> PerformanceTier {
        let tier = PerformanceTier::classify(score_ms);
        if tier != PerformanceTier::Fast {
            self.tuning.degrade(tier);
            self.offset.x = wrap(self.offset.x, self.tuning.tile_size);
            self.offset.y = wrap(self.offset.y, self.tuning.tile_size);
            log::info!("performance probe {score_ms:.1}ms -> {tier:?}, tuning {:?}", self.tuning);
        }
        tier
    }

    /// Number of tile columns/rows touching the visible canvas.
    fn visible_tiles(&self) -> (i32, i32) {
        let size = self.tuning.tile_size;
        if !(size > 0.0) {
            return (0, 0);
        }
        (
            (self.viewport.css_width / size).ceil() as i32,
            (self.viewport.css_height / size).ceil() as i32,
        )
    }

    fn has_interior(&self) -> bool {
        let (cols, rows) = self.visible_tiles();
        cols > 2 && rows > 2
    }

    // ---------------- Food placement -----------------

    fn occupied(&self, c: TileCoord) -> bool {
        self.hovered == Some(c) || self.snake.contains(c)
    }

    /// Places a new food block inside the visible grid, away from the outer
    /// ring and from every snake tile. Leaves no food when nothing fits.
    pub fn spawn_food(&mut self) {
        self.food_armed = true;
        let (cols, rows) = self.visible_tiles();
        let (inner_w, inner_h) = (cols - 2, rows - 2);
        if inner_w <= 0 || inner_h <= 0 {
            log::debug!("grid {cols}x{rows} too small for food");
            self.food = None;
            return;
        }
        let pick = |span: i32, random: &mut RandomSource| {
            let r = random().clamp(0.0, 1.0);
            1 + ((r * span as f64).floor() as i32).min(span - 1)
        };
        let mut found = None;
        for _ in 0..FOOD_SAMPLE_LIMIT {
            let c = TileCoord::new(pick(inner_w, &mut self.random), pick(inner_h, &mut self.random));
            if !self.occupied(c) {
                found = Some(c);
                break;
            }
        }
        if found.is_none() {
            log::debug!("food sampling exhausted, scanning interior");
            found = (1..=inner_h)
                .flat_map(|y| (1..=inner_w).map(move |x| TileCoord::new(x, y)))
                .find(|c| !self.occupied(*c));
        }
        self.food = found.map(|coord| Food {
            coord,
            color: self.config.food_color.clone(),
            placed_at: self.offset,
        });
    }

    // ---------------- Pointer & touch input -----------------

    /// Tile under a canvas-local point at the current scroll phase.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<TileCoord> {
        let size = self.tuning.tile_size;
        if !(size > 0.0) || !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(TileCoord::new(
            ((x + self.offset.x) / size).floor() as i32,
            ((y + self.offset.y) / size).floor() as i32,
        ))
    }

    /// Handles moving onto `next`; returns true when a tile boundary was crossed.
    fn cross(&mut self, next: TileCoord, target: f64, touch: bool) -> bool {
        if self.hovered == Some(next) {
            return false;
        }
        if let Some(prev) = self.hovered {
            self.snake.commit(prev);
        }
        self.hovered = Some(next);
        self.target_opacity = target.clamp(0.0, 1.0);
        if self.food.as_ref().is_some_and(|f| f.coord == next) {
            self.snake.feed();
            self.spawn_food();
            if touch {
                self.haptic(HapticPattern::Eat);
            }
        }
        true
    }

    fn trail_mark_at(&mut self, coord: TileCoord, opacity: f64) {
        let (x, y) = self.tile_origin(coord.x, coord.y);
        self.trail.insert(coord, TrailMark { opacity, x, y });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        match self.tile_at(x, y) {
            Some(tile) => self.cross(tile, MOUSE_HOVER_OPACITY, false),
            None => false,
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(h) = self.hovered.take() {
            self.trail_mark_at(h, MOUSE_TRAIL_OPACITY);
        }
        self.target_opacity = 0.0;
    }

    fn touch_opacity(&self) -> f64 {
        TOUCH_HOVER_OPACITY * self.config.touch_sensitivity
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.touch_move(x, y);
        self.target_opacity = self.touch_opacity().clamp(0.0, 1.0);
        self.haptic(HapticPattern::TouchStart);
    }

    pub fn touch_move(&mut self, x: f64, y: f64) -> bool {
        let target = self.touch_opacity();
        match self.tile_at(x, y) {
            Some(tile) => self.cross(tile, target, true),
            None => false,
        }
    }

    /// Finger lifted: the head joins the body, a trail mark is left and the
    /// highlight dims without disappearing.
    pub fn touch_end(&mut self) {
        if let Some(h) = self.hovered {
            self.snake.commit(h);
            self.trail_mark_at(h, TOUCH_TRAIL_OPACITY);
            self.target_opacity = TOUCH_RELEASED_OPACITY;
        }
    }

    /// Double tap: forget the snake and place fresh food.
    pub fn reset_snake(&mut self) {
        self.snake.reset();
        self.hovered = None;
        self.target_opacity = 0.0;
        self.trail.clear();
        self.spawn_food();
        self.haptic(HapticPattern::Reset);
    }

    // ---------------- Per-frame update -----------------

    pub fn update(&mut self, elapsed_ms: f64) {
        let elapsed = if elapsed_ms.is_finite() && elapsed_ms > 0.0 { elapsed_ms } else { 0.0 };

        if self.opacity != self.target_opacity {
            let duration = self.config.transition_duration_ms;
            let progress = if duration > 0.0 { (elapsed / duration).min(1.0) } else { 1.0 };
            if progress >= 1.0 {
                self.opacity = self.target_opacity;
            } else {
                self.opacity += (self.target_opacity - self.opacity) * progress;
            }
        }

        self.trail.decay(elapsed, self.tuning.trail_duration_ms);

        let size = self.tuning.tile_size;
        if size > 0.0 {
            let step = self.tuning.frame_advance(self.config.capabilities.is_constrained_device);
            let (dx, dy) = match self.config.direction {
                ScrollDirection::Right => (-step, 0.0),
                ScrollDirection::Left => (step, 0.0),
                ScrollDirection::Up => (0.0, step),
                ScrollDirection::Down => (0.0, -step),
                ScrollDirection::Diagonal => (-step, -step),
            };
            self.offset.x = wrap(self.offset.x + dx, size);
            self.offset.y = wrap(self.offset.y + dy, size);
        }

        let (w, h) = (self.viewport.css_width, self.viewport.css_height);
        let off_screen = self.food.as_ref().is_some_and(|food| {
            let (fx, fy) = self.tile_origin(food.coord.x, food.coord.y);
            fx < -size || fx > w || fy < -size || fy > h
        });
        let missing = self.food_armed && self.food.is_none() && self.has_interior();
        if off_screen || missing {
            self.spawn_food();
        }
    }

    /// One animation frame: advance state by `elapsed_ms`, then draw.
    pub fn tick<S: Surface + ?Sized>(&mut self, elapsed_ms: f64, surface: &mut S) {
        self.update(elapsed_ms);
        self.render(surface);
    }
}

/// Keeps a scroll component inside `[0, size)`.
fn wrap(v: f64, size: f64) -> f64 {
    if !(size > 0.0) || !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(size);
    if r >= size { 0.0 } else { r }
}
