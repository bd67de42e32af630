use std::collections::HashMap;

use crate::model::TileCoord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailMark {
    pub opacity: f64,
    /// Top-left corner in CSS pixels when the mark was left.
    pub x: f64,
    pub y: f64,
}

/// Fading residue left where pointer contact ended.
#[derive(Clone, Debug, Default)]
pub struct TrailMarks {
    marks: HashMap<TileCoord, TrailMark>,
}

impl TrailMarks {
    pub fn insert(&mut self, coord: TileCoord, mark: TrailMark) {
        self.marks.insert(coord, mark);
    }

    pub fn get(&self, coord: TileCoord) -> Option<&TrailMark> {
        self.marks.get(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileCoord, &TrailMark)> + '_ {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Linear fade over `duration_ms`; marks at or below zero are dropped.
    pub fn decay(&mut self, elapsed_ms: f64, duration_ms: f64) {
        if elapsed_ms <= 0.0 {
            return;
        }
        let step = if duration_ms > 0.0 { elapsed_ms / duration_ms } else { f64::INFINITY };
        self.marks.retain(|_, m| {
            m.opacity -= step;
            m.opacity > 0.0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(opacity: f64) -> TrailMark {
        TrailMark { opacity, x: 0.0, y: 0.0 }
    }

    #[test]
    fn decays_linearly_then_disappears() {
        let mut t = TrailMarks::default();
        let key = TileCoord::new(1, 2);
        t.insert(key, mark(0.6));
        t.decay(250.0, 1000.0);
        let o = t.get(key).unwrap().opacity;
        assert!((o - 0.35).abs() < 1e-9);
        t.decay(400.0, 1000.0);
        assert!(t.get(key).is_none());
    }

    #[test]
    fn reinserting_same_tile_replaces_mark() {
        let mut t = TrailMarks::default();
        let key = TileCoord::new(0, 0);
        t.insert(key, mark(0.1));
        t.insert(key, mark(0.8));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(key).unwrap().opacity, 0.8);
    }

    #[test]
    fn zero_duration_clears_on_next_decay() {
        let mut t = TrailMarks::default();
        t.insert(TileCoord::new(0, 0), mark(0.8));
        t.decay(1.0, 0.0);
        assert!(t.is_empty());
    }
}
