pub mod app;
pub mod category_view;
pub mod grid_background;
pub mod intro_view;
pub mod main_view;

pub use app::App;
