use grid_landing::components::App;
use grid_landing::util::init_logging;
use log::LevelFilter;

fn main() {
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    init_logging(level);
    yew::Renderer::<App>::new().render();
}
