//! Animated grid background and page controller for a personal landing page.

pub mod components;
pub mod engine;
pub mod error;
pub mod host;
pub mod model;
pub mod state;
pub mod util;

pub use engine::{GridEngine, Surface};
pub use error::EngineError;
pub use host::GridAnimation;
pub use model::GridConfig;
