use std::collections::VecDeque;

use crate::model::TileCoord;

/// Ordered trail of crossed tiles, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<TileCoord>,
    /// Length the body is trimmed back to after a crossing.
    length: usize,
    grow: bool,
}

impl Default for Snake {
    fn default() -> Self {
        Self { body: VecDeque::new(), length: 1, grow: false }
    }
}

impl Snake {
    pub fn body(&self) -> impl ExactSizeIterator<Item = &TileCoord> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.body.contains(&coord)
    }

    pub fn growth_pending(&self) -> bool {
        self.grow
    }

    /// Marks the next crossing as growing; consumed by exactly one `commit`.
    pub fn feed(&mut self) {
        self.grow = true;
    }

    /// Pushes the tile the pointer just left onto the head. Without pending
    /// growth the tail is dropped so the length stays put.
    pub fn commit(&mut self, left: TileCoord) {
        self.body.push_front(left);
        if self.grow {
            self.length += 1;
        } else {
            while self.body.len() > self.length {
                self.body.pop_back();
            }
        }
        self.grow = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(s: &Snake) -> Vec<(i32, i32)> {
        s.body().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn steady_state_keeps_one_segment() {
        let mut s = Snake::default();
        for x in 0..6 {
            s.commit(TileCoord::new(x, 0));
            assert_eq!(s.len(), 1);
        }
        assert_eq!(coords(&s), vec![(5, 0)]);
    }

    #[test]
    fn growth_skips_exactly_one_trim() {
        let mut s = Snake::default();
        s.commit(TileCoord::new(0, 0));
        s.feed();
        s.commit(TileCoord::new(1, 0));
        assert_eq!(coords(&s), vec![(1, 0), (0, 0)]);
        assert!(!s.growth_pending());
        s.commit(TileCoord::new(2, 0));
        assert_eq!(coords(&s), vec![(2, 0), (1, 0)]);
    }

    #[test]
    fn feeding_before_first_segment_still_grows() {
        let mut s = Snake::default();
        s.feed();
        s.commit(TileCoord::new(0, 0));
        s.commit(TileCoord::new(1, 0));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn reset_clears_body_and_growth() {
        let mut s = Snake::default();
        s.commit(TileCoord::new(3, 3));
        s.feed();
        s.reset();
        assert!(s.is_empty());
        assert!(!s.growth_pending());
    }
}
