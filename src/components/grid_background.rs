use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::host::GridAnimation;
use crate::model::GridConfig;

pub const GRID_CANVAS_ID: &str = "grid-canvas";

#[derive(Properties, PartialEq, Clone)]
pub struct GridBackgroundProps {
    pub config: GridConfig,
}

/// Full-size canvas running the grid animation while mounted.
#[function_component(GridBackground)]
pub fn grid_background(props: &GridBackgroundProps) -> Html {
    let canvas_ref = use_node_ref();
    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(props.config.clone(), move |config| {
            let animation = match GridAnimation::create(canvas_ref.cast::<HtmlCanvasElement>(), config.clone()) {
                Ok(animation) => {
                    animation.init();
                    Some(animation)
                }
                Err(err) => {
                    log::error!("grid background unavailable: {err}");
                    None
                }
            };
            move || {
                if let Some(animation) = animation {
                    animation.destroy();
                }
            }
        });
    }
    html! {
        <canvas id={GRID_CANVAS_ID} class="grid-canvas" ref={canvas_ref}></canvas>
    }
}
