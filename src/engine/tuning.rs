use crate::model::GridConfig;

/// Probe iterations used by the host's fill-rect benchmark.
pub const PROBE_ITERATIONS: u32 = 1000;
const SLOW_DEVICE_MS: f64 = 10.0;
const MEDIUM_DEVICE_MS: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceTier {
    Fast,
    Medium,
    Slow,
}

impl PerformanceTier {
    /// `score_ms` is the wall time of the fill-rect probe.
    pub fn classify(score_ms: f64) -> Self {
        if score_ms > SLOW_DEVICE_MS {
            PerformanceTier::Slow
        } else if score_ms > MEDIUM_DEVICE_MS {
            PerformanceTier::Medium
        } else {
            PerformanceTier::Fast
        }
    }
}

/// Effective values the engine runs with; start from config, may be degraded once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub tile_size: f64,
    pub speed: f64,
    pub trail_duration_ms: f64,
}

impl Tuning {
    pub fn from_config(cfg: &GridConfig) -> Self {
        Self {
            tile_size: cfg.tile_size,
            speed: cfg.speed,
            trail_duration_ms: cfg.trail_duration_ms,
        }
    }

    pub fn degrade(&mut self, tier: PerformanceTier) {
        match tier {
            PerformanceTier::Slow => {
                self.tile_size = (self.tile_size * 1.5).max(60.0);
                self.speed *= 0.7;
                self.trail_duration_ms *= 0.5;
            }
            PerformanceTier::Medium => {
                self.tile_size = (self.tile_size * 1.2).max(50.0);
                self.speed *= 0.8;
            }
            PerformanceTier::Fast => {}
        }
    }

    /// Per-frame offset advance; constrained devices move slower and on a 0.01 px grid.
    pub fn frame_advance(&self, constrained: bool) -> f64 {
        let speed = if constrained { self.speed * 0.8 } else { self.speed }.max(0.0);
        if constrained { (speed * 100.0).round() / 100.0 } else { speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_probe_scores() {
        assert_eq!(PerformanceTier::classify(2.0), PerformanceTier::Fast);
        assert_eq!(PerformanceTier::classify(5.0), PerformanceTier::Fast);
        assert_eq!(PerformanceTier::classify(7.5), PerformanceTier::Medium);
        assert_eq!(PerformanceTier::classify(12.0), PerformanceTier::Slow);
    }

    #[test]
    fn slow_devices_get_bigger_tiles_and_shorter_trails() {
        let mut t = Tuning { tile_size: 50.0, speed: 1.0, trail_duration_ms: 2000.0 };
        t.degrade(PerformanceTier::Slow);
        assert_eq!(t.tile_size, 75.0);
        assert!((t.speed - 0.7).abs() < 1e-12);
        assert_eq!(t.trail_duration_ms, 1000.0);

        let mut t = Tuning { tile_size: 30.0, speed: 1.0, trail_duration_ms: 2000.0 };
        t.degrade(PerformanceTier::Medium);
        assert_eq!(t.tile_size, 50.0);
        assert_eq!(t.trail_duration_ms, 2000.0);
    }

    #[test]
    fn negative_speed_never_moves_backwards() {
        let t = Tuning { tile_size: 40.0, speed: -3.0, trail_duration_ms: 1.0 };
        assert_eq!(t.frame_advance(false), 0.0);
        assert_eq!(t.frame_advance(true), 0.0);
    }

    #[test]
    fn constrained_advance_is_rounded() {
        let t = Tuning { tile_size: 40.0, speed: 0.03, trail_duration_ms: 1.0 };
        assert_eq!(t.frame_advance(true), 0.02);
    }
}
