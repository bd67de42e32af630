//! Core data models for the landing page.
//! Grid engine configuration, grid geometry types and the page state machine.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

use crate::error::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Right,
    Left,
    Up,
    Down,
    /// Right and down at the same time.
    Diagonal,
}

/// Integer grid coordinate of one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sub-tile scroll phase; both components stay in `[0, tile_size)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridOffset {
    pub x: f64,
    pub y: f64,
}

/// Injected platform knowledge, so the engine never sniffs the user agent itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceCapabilities {
    pub is_constrained_device: bool,
    pub supports_haptics: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub tile_size: f64,
    pub direction: ScrollDirection,
    /// Offset advance per frame, in CSS pixels.
    pub speed: f64,
    pub border_color: String,
    pub hover_fill_color: String,
    pub hover_shadow_color: String,
    pub trail_color: String,
    pub food_color: String,
    pub snake_head_color: String,
    pub snake_tail_color: String,
    /// Per-segment factor; smaller values fade toward the tail color faster.
    pub snake_color_decay: f64,
    pub transition_duration_ms: f64,
    pub trail_duration_ms: f64,
    pub touch_sensitivity: f64,
    pub vibration_enabled: bool,
    pub capabilities: DeviceCapabilities,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: 40.0,
            direction: ScrollDirection::Right,
            speed: 1.0,
            border_color: "rgba(255, 255, 255, 0.05)".into(),
            hover_fill_color: "rgba(255, 255, 255, 0.6)".into(),
            hover_shadow_color: "rgba(255, 255, 255, 0.3)".into(),
            trail_color: "rgb(255, 255, 255)".into(),
            food_color: "rgba(255, 100, 100, 0.8)".into(),
            snake_head_color: "rgba(255, 255, 255, 0.9)".into(),
            snake_tail_color: "rgba(100, 100, 255, 0.3)".into(),
            snake_color_decay: 0.7,
            transition_duration_ms: 200.0,
            trail_duration_ms: 1000.0,
            touch_sensitivity: 1.0,
            vibration_enabled: false,
            capabilities: DeviceCapabilities::default(),
        }
    }
}

impl GridConfig {
    /// Preset used by the landing page background.
    pub fn landing(caps: DeviceCapabilities) -> Self {
        let phone = caps.is_constrained_device;
        Self {
            tile_size: if phone { 50.0 } else { 40.0 },
            direction: ScrollDirection::Diagonal,
            speed: if phone { 0.03 } else { 0.05 },
            border_color: if phone {
                "rgba(255, 255, 255, 0.2)".into()
            } else {
                "rgba(255, 255, 255, 0.1)".into()
            },
            hover_fill_color: "rgba(255, 255, 255, 0.8)".into(),
            hover_shadow_color: "rgba(255, 255, 255, 0.8)".into(),
            food_color: "rgba(100, 255, 152, 0.8)".into(),
            snake_head_color: "rgba(255, 255, 255, 0.95)".into(),
            snake_tail_color: "rgba(218, 231, 255, 0.25)".into(),
            snake_color_decay: 0.85,
            transition_duration_ms: if phone { 150.0 } else { 200.0 },
            trail_duration_ms: if phone { 2000.0 } else { 1500.0 },
            touch_sensitivity: if phone { 1.2 } else { 1.0 },
            vibration_enabled: phone,
            capabilities: caps,
            ..Self::default()
        }
    }

    /// Parses a full or partial JSON configuration; absent fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Overlays the fields present in `raw` onto `self`.
    pub fn merged_with_json(&self, raw: &str) -> Result<Self, EngineError> {
        let mut base = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(raw)?;
        if let (Some(base_map), serde_json::Value::Object(patch_map)) = (base.as_object_mut(), patch) {
            for (k, v) in patch_map {
                base_map.insert(k, v);
            }
        }
        Ok(serde_json::from_value(base)?)
    }
}

// ---------------- Page state machine -----------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Intro,
    Main,
    Category(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageState {
    pub page: Page,
    /// Bumped on every accepted transition so effects can key on it.
    pub version: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self { page: Page::Intro, version: 0 }
    }
}

#[derive(Clone, Debug)]
pub enum PageAction {
    /// Intro -> Main.
    Enter,
    /// Category -> Main, Main -> Intro.
    Back,
    /// Main -> Category; ignored for unknown ids.
    OpenCategory(String),
}

impl PageState {
    pub fn next(&self, action: &PageAction) -> Option<Page> {
        match (&self.page, action) {
            (Page::Intro, PageAction::Enter) => Some(Page::Main),
            (Page::Main, PageAction::Back) => Some(Page::Intro),
            (Page::Category(_), PageAction::Back) => Some(Page::Main),
            (Page::Main, PageAction::OpenCategory(id)) => {
                find_category(id).map(|c| Page::Category(c.id.to_string()))
            }
            _ => None,
        }
    }

    pub fn shows_background(&self) -> bool {
        !matches!(self.page, Page::Intro)
    }
}

impl Reducible for PageState {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match self.next(&action) {
            Some(page) => {
                log::debug!("page transition {:?} -> {:?}", self.page, page);
                Rc::new(PageState { page, version: self.version + 1 })
            }
            None => self,
        }
    }
}

// ---------------- Category catalog -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub text: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub text: &'static str,
    pub icon: &'static str,
    pub projects: &'static [Project],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "tools",
        text: "Tools",
        icon: "tool",
        projects: &[
            Project { text: "Image Compressor", href: "https://tools.example.com/compress", icon: "image" },
            Project { text: "JSON Formatter", href: "https://tools.example.com/json", icon: "code" },
        ],
    },
    Category {
        id: "games",
        text: "Games",
        icon: "game",
        projects: &[
            Project { text: "Grid Snake", href: "https://games.example.com/snake", icon: "snake" },
            Project { text: "Minesweeper", href: "https://games.example.com/mines", icon: "mine" },
        ],
    },
    Category {
        id: "writing",
        text: "Writing",
        icon: "pen",
        projects: &[Project { text: "Blog", href: "https://blog.example.com", icon: "blog" }],
    },
];

pub fn find_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = GridConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GridConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = GridConfig::from_json(
            r#"{"tileSize": 24, "direction": "diagonal", "capabilities": {"supportsHaptics": true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.tile_size, 24.0);
        assert_eq!(cfg.direction, ScrollDirection::Diagonal);
        assert!(cfg.capabilities.supports_haptics);
        assert!(!cfg.capabilities.is_constrained_device);
        assert_eq!(cfg.trail_duration_ms, 1000.0);
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert!(GridConfig::from_json(r#"{"direction": "sideways"}"#).is_err());
    }

    #[test]
    fn merge_overrides_only_present_fields() {
        let base = GridConfig::landing(DeviceCapabilities { is_constrained_device: true, supports_haptics: true });
        let merged = base.merged_with_json(r#"{"speed": 2.5}"#).unwrap();
        assert_eq!(merged.speed, 2.5);
        assert_eq!(merged.tile_size, 50.0);
        assert_eq!(merged.direction, ScrollDirection::Diagonal);
    }

    #[test]
    fn page_transitions_are_guarded() {
        let state = Rc::new(PageState::default());
        let same = state.clone().reduce(PageAction::Back);
        assert_eq!(same.page, Page::Intro);
        assert_eq!(same.version, 0);

        let main = state.reduce(PageAction::Enter);
        assert_eq!(main.page, Page::Main);
        let again = main.clone().reduce(PageAction::Enter);
        assert_eq!(again.version, main.version);

        let cat = main.clone().reduce(PageAction::OpenCategory("games".into()));
        assert_eq!(cat.page, Page::Category("games".into()));
        let back = cat.reduce(PageAction::Back);
        assert_eq!(back.page, Page::Main);
        let intro = back.reduce(PageAction::Back);
        assert_eq!(intro.page, Page::Intro);
    }

    #[test]
    fn unknown_category_is_ignored() {
        let main = Rc::new(PageState { page: Page::Main, version: 3 });
        let next = main.reduce(PageAction::OpenCategory("nope".into()));
        assert_eq!(next.page, Page::Main);
        assert_eq!(next.version, 3);
    }
}
