use super::GridEngine;
use super::color::Rgba;
use crate::model::TileCoord;

const FOOD_GLOW: &str = "rgba(255, 255, 255, 0.5)";
const VIGNETTE_INNER: &str = "rgba(6, 6, 6, 0)";
const VIGNETTE_OUTER: &str = "#060606";
/// Upper bound on tiles per axis, guards against degenerate tile sizes.
const MAX_TILES_PER_AXIS: f64 = 2048.0;

/// Minimal 2d drawing target. The browser host backs it with a canvas context;
/// tests record the calls.
pub trait Surface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn translate(&mut self, x: f64, y: f64);
    fn set_line_width(&mut self, width: f64);
    /// `blur == 0` switches the glow off.
    fn set_shadow(&mut self, color: &str, blur: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    /// Radial gradient from `inner` at the centre to `outer` at `radius`,
    /// filled over `(0, 0, w, h)`.
    #[allow(clippy::too_many_arguments)]
    fn fill_vignette(&mut self, cx: f64, cy: f64, radius: f64, inner: &str, outer: &str, w: f64, h: f64);
}

impl GridEngine {
    pub fn render<S: Surface + ?Sized>(&self, s: &mut S) {
        let vp = self.viewport;
        s.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        s.clear_rect(0.0, 0.0, vp.pixel_width() as f64, vp.pixel_height() as f64);
        s.set_transform(vp.dpr, 0.0, 0.0, vp.dpr, 0.0, 0.0);

        let size = self.tuning.tile_size;
        let (w, h) = (vp.css_width, vp.css_height);
        if !(size > 0.0) || !(w > 0.0) || !(h > 0.0) {
            return;
        }
        let constrained = self.config.capabilities.is_constrained_device;
        s.set_line_width(if constrained { 1.0 } else { 0.5 });
        // pixel alignment keeps 1px borders from shimmering on phones
        if constrained {
            s.translate(0.5, 0.5);
        }

        for mark in self.trail.iter().map(|(_, m)| m) {
            let fill = self.trail_rgb.with_alpha(mark.opacity).to_css();
            s.fill_rect(mark.x.round(), mark.y.round(), size, size, &fill);
        }

        if !self.snake.is_empty() {
            s.set_shadow(&self.config.hover_shadow_color, 15.0);
            for (i, seg) in self.snake.body().enumerate() {
                let (x, y) = self.tile_origin(seg.x, seg.y);
                let fill = self.palette.segment_fill(&self.config.snake_head_color, i, self.config.snake_color_decay);
                s.fill_rect(x, y, size, size, &fill);
            }
            s.set_shadow("transparent", 0.0);
        }

        let cols = ((w + size) / size).ceil().min(MAX_TILES_PER_AXIS) as i32;
        let rows = ((h + size) / size).ceil().min(MAX_TILES_PER_AXIS) as i32;
        let hover_fill = self.hover_rgb.with_alpha(self.opacity).to_css();
        for gx in 0..cols {
            for gy in 0..rows {
                let (x, y) = self.tile_origin(gx, gy);
                let cell = TileCoord::new(gx, gy);
                if let Some(food) = self.food.as_ref().filter(|f| f.coord == cell) {
                    s.set_shadow(FOOD_GLOW, 20.0);
                    s.fill_rect(x, y, size, size, &food.color);
                    s.set_shadow("transparent", 0.0);
                }
                if self.hovered == Some(cell) {
                    s.set_shadow(&self.config.hover_shadow_color, 15.0);
                    s.fill_rect(x, y, size, size, &hover_fill);
                    s.set_shadow("transparent", 0.0);
                }
                s.stroke_rect(x, y, size, size, &self.config.border_color);
            }
        }

        if constrained {
            s.translate(-0.5, -0.5);
        }

        let radius = (w * w + h * h).sqrt() / 2.0;
        s.fill_vignette(w / 2.0, h / 2.0, radius, VIGNETTE_INNER, VIGNETTE_OUTER, w, h);
    }

    /// Top-left corner of tile `(gx, gy)` in CSS pixels at the current scroll phase.
    pub(crate) fn tile_origin(&self, gx: i32, gy: i32) -> (f64, f64) {
        let size = self.tuning.tile_size;
        (
            (gx as f64 * size - self.offset.x).round(),
            (gy as f64 * size - self.offset.y).round(),
        )
    }
}

pub(crate) fn parse_or_white(raw: &str) -> Rgba {
    raw.parse().unwrap_or_else(|e| {
        log::warn!("{e}; using white");
        Rgba::WHITE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceCapabilities, GridConfig};

    #[derive(Default)]
    struct Calls {
        fills: Vec<(f64, f64, String)>,
        strokes: usize,
        translates: Vec<(f64, f64)>,
        vignettes: usize,
        clears: usize,
    }

    impl Surface for Calls {
        fn set_transform(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) {}
        fn clear_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {
            self.clears += 1;
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.translates.push((x, y));
        }
        fn set_line_width(&mut self, _: f64) {}
        fn set_shadow(&mut self, _: &str, _: f64) {}
        fn fill_rect(&mut self, x: f64, y: f64, _: f64, _: f64, color: &str) {
            self.fills.push((x, y, color.to_string()));
        }
        fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: &str) {
            self.strokes += 1;
        }
        fn fill_vignette(&mut self, _: f64, _: f64, _: f64, _: &str, _: &str, _: f64, _: f64) {
            self.vignettes += 1;
        }
    }

    fn engine(cfg: GridConfig) -> GridEngine {
        let mut e = GridEngine::new(cfg, Box::new(|| 0.5));
        e.resize(200.0, 120.0, 2.0);
        e
    }

    #[test]
    fn strokes_every_visible_tile_and_frames_with_vignette() {
        let e = engine(GridConfig::default());
        let mut calls = Calls::default();
        e.render(&mut calls);
        // (200 + 40) / 40 = 6 columns, (120 + 40) / 40 = 4 rows
        assert_eq!(calls.strokes, 24);
        assert_eq!(calls.vignettes, 1);
        assert_eq!(calls.clears, 1);
        assert!(calls.translates.is_empty());
    }

    #[test]
    fn zero_sized_canvas_only_clears() {
        let mut e = engine(GridConfig::default());
        e.resize(0.0, 0.0, 1.0);
        let mut calls = Calls::default();
        e.render(&mut calls);
        assert_eq!(calls.clears, 1);
        assert_eq!(calls.strokes, 0);
        assert_eq!(calls.vignettes, 0);
    }

    #[test]
    fn constrained_devices_offset_by_half_pixel_and_restore() {
        let cfg = GridConfig {
            capabilities: DeviceCapabilities { is_constrained_device: true, supports_haptics: false },
            ..GridConfig::default()
        };
        let e = engine(cfg);
        let mut calls = Calls::default();
        e.render(&mut calls);
        assert_eq!(calls.translates, vec![(0.5, 0.5), (-0.5, -0.5)]);
    }

    #[test]
    fn hover_and_trail_are_drawn() {
        let mut e = engine(GridConfig { speed: 0.0, ..GridConfig::default() });
        e.pointer_move(50.0, 50.0);
        e.pointer_leave();
        e.pointer_move(90.0, 10.0);
        e.update(0.0);
        let mut calls = Calls::default();
        e.render(&mut calls);
        assert_eq!(e.hovered(), Some(TileCoord::new(2, 0)));
        let trail = calls.fills.iter().find(|(x, y, _)| *x == 40.0 && *y == 40.0).unwrap();
        assert_eq!(trail.2, "rgba(255, 255, 255, 0.6)");
        assert!(calls.fills.iter().any(|(x, y, _)| *x == 80.0 && *y == 0.0));
    }
}
