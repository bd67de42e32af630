use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ColorParseError;

static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)(?:,\s*([.\d]+))?\)").expect("static color pattern")
});

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 1.0 };

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ColorParseError::Malformed(s.to_string());
        let caps = RGBA_RE.captures(s).ok_or_else(bad)?;
        let channel = |i: usize| -> Result<u8, ColorParseError> {
            caps[i].parse::<u16>().map(|v| v.min(255) as u8).map_err(|_| bad())
        };
        let a = match caps.get(4) {
            Some(m) => m.as_str().parse::<f64>().map_err(|_| bad())?,
            None => 1.0,
        };
        Ok(Rgba { r: channel(1)?, g: channel(2)?, b: channel(3)?, a })
    }
}

/// Color scheme for snake segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnakePalette {
    Gradient { head: Rgba, tail: Rgba },
    /// Used when either configured color fails to parse.
    OpacityOnly,
}

impl SnakePalette {
    pub fn from_config(head: &str, tail: &str) -> Self {
        match (head.parse::<Rgba>(), tail.parse::<Rgba>()) {
            (Ok(head), Ok(tail)) => SnakePalette::Gradient { head, tail },
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("snake palette falls back to opacity gradient: {e}");
                SnakePalette::OpacityOnly
            }
        }
    }

    /// Fill for segment `index` (0 is the head) given the decay factor.
    pub fn segment_fill(&self, head_css: &str, index: usize, decay: f64) -> String {
        if index == 0 {
            return head_css.to_string();
        }
        let factor = decay.powi(index.min(i32::MAX as usize) as i32);
        match self {
            SnakePalette::Gradient { head, tail } => head.lerp(*tail, 1.0 - factor).to_css(),
            SnakePalette::OpacityOnly => Rgba::WHITE.with_alpha(factor.max(0.2)).to_css(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        let c: Rgba = "rgba(100, 255, 152, 0.8)".parse().unwrap();
        assert_eq!(c, Rgba { r: 100, g: 255, b: 152, a: 0.8 });
        let c: Rgba = "rgb(1,2,3)".parse().unwrap();
        assert_eq!(c, Rgba { r: 1, g: 2, b: 3, a: 1.0 });
    }

    #[test]
    fn rejects_non_rgb_strings() {
        assert!("#ffffff".parse::<Rgba>().is_err());
        assert!("hsl(0, 10%, 10%)".parse::<Rgba>().is_err());
    }

    #[test]
    fn gradient_moves_toward_tail() {
        let palette = SnakePalette::from_config("rgba(255, 255, 255, 1)", "rgba(0, 0, 0, 0)");
        assert_eq!(palette.segment_fill("head", 0, 0.5), "head");
        // 0.5^1 -> halfway
        assert_eq!(palette.segment_fill("head", 1, 0.5), "rgba(128, 128, 128, 0.5)");
        // 0.5^2 -> three quarters toward the tail
        assert_eq!(palette.segment_fill("head", 2, 0.5), "rgba(64, 64, 64, 0.25)");
    }

    #[test]
    fn malformed_palette_uses_opacity_fallback() {
        let palette = SnakePalette::from_config("white", "rgba(0, 0, 0, 0)");
        assert_eq!(palette, SnakePalette::OpacityOnly);
        assert_eq!(palette.segment_fill("white", 1, 0.5), "rgba(255, 255, 255, 0.5)");
        // floor of 0.2
        assert_eq!(palette.segment_fill("white", 5, 0.5), "rgba(255, 255, 255, 0.2)");
    }
}
