use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlScriptElement, TouchEvent, WheelEvent};
use yew::prelude::*;

use super::{
    category_view::CategoryView,
    grid_background::{GRID_CANVAS_ID, GridBackground},
    intro_view::IntroView,
    main_view::MainView,
};
use crate::model::{GridConfig, Page, PageAction, PageState};
use crate::util::{SwipeDirection, classify_swipe, detect_capabilities, in_canvas_interior};

const CONFIG_SCRIPT_ID: &str = "grid-config";

/// Landing-page preset for this device, with an optional JSON override embedded
/// in the page.
fn load_config() -> GridConfig {
    let base = GridConfig::landing(detect_capabilities());
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_SCRIPT_ID))
        .and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
        .and_then(|script| script.text().ok());
    match raw {
        Some(raw) if !raw.trim().is_empty() => base.merged_with_json(&raw).unwrap_or_else(|err| {
            log::warn!("ignoring #{CONFIG_SCRIPT_ID}: {err}");
            base
        }),
        _ => base,
    }
}

struct SwipeStart {
    x: f64,
    y: f64,
    at_ms: f64,
}

/// Touches in the middle of the live canvas drive the snake, not navigation.
fn is_canvas_touch(event: &TouchEvent) -> bool {
    let Some(canvas) = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .filter(|el| el.id() == GRID_CANVAS_ID)
    else {
        return false;
    };
    let Some(touch) = event.touches().get(0) else {
        return false;
    };
    let rect = canvas.get_bounding_client_rect();
    in_canvas_interior(
        touch.client_x() as f64 - rect.left(),
        touch.client_y() as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

#[function_component(App)]
pub fn app() -> Html {
    let page = use_reducer(PageState::default);
    let config = use_memo((), |_| load_config());

    // Wheel navigation
    {
        let dispatcher = page.dispatcher();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "wheel", move |event| {
                    let Some(event) = event.dyn_ref::<WheelEvent>() else {
                        return;
                    };
                    let delta = event.delta_y();
                    if delta > 0.0 {
                        dispatcher.dispatch(PageAction::Enter);
                    } else if delta < 0.0 {
                        dispatcher.dispatch(PageAction::Back);
                    }
                })
            });
            move || drop(listener)
        });
    }

    // Swipe navigation on touch devices
    {
        let dispatcher = page.dispatcher();
        let constrained = config.capabilities.is_constrained_device;
        use_effect_with(constrained, move |constrained| {
            let mut listeners = Vec::new();
            let document = web_sys::window().and_then(|w| w.document());
            if let (true, Some(document)) = (*constrained, document) {
                let start: Rc<RefCell<Option<SwipeStart>>> = Rc::new(RefCell::new(None));
                let passive = EventListenerOptions::default();

                let on_start = start.clone();
                listeners.push(EventListener::new_with_options(&document, "touchstart", passive, move |event| {
                    let Some(event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    *on_start.borrow_mut() = if is_canvas_touch(event) {
                        None
                    } else {
                        event.touches().get(0).map(|t| SwipeStart {
                            x: t.page_x() as f64,
                            y: t.page_y() as f64,
                            at_ms: js_sys::Date::now(),
                        })
                    };
                }));

                listeners.push(EventListener::new_with_options(&document, "touchend", passive, move |event| {
                    let Some(event) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    let Some(begin) = start.borrow_mut().take() else {
                        return;
                    };
                    let Some(touch) = event.changed_touches().get(0) else {
                        return;
                    };
                    let dx = touch.page_x() as f64 - begin.x;
                    let dy = touch.page_y() as f64 - begin.y;
                    match classify_swipe(dx, dy, js_sys::Date::now() - begin.at_ms) {
                        Some(SwipeDirection::Up) => dispatcher.dispatch(PageAction::Enter),
                        Some(SwipeDirection::Down) => dispatcher.dispatch(PageAction::Back),
                        _ => {}
                    }
                }));
            }
            move || drop(listeners)
        });
    }

    let enter = {
        let page = page.clone();
        Callback::from(move |_| page.dispatch(PageAction::Enter))
    };
    let back = {
        let page = page.clone();
        Callback::from(move |_| page.dispatch(PageAction::Back))
    };
    let open_category = {
        let page = page.clone();
        Callback::from(move |id: String| page.dispatch(PageAction::OpenCategory(id)))
    };

    let on_intro = page.page == Page::Intro;
    html! {
        <div class={classes!("wrap", "in", format!("page-{}", page_slug(&page.page)))}>
            if page.shows_background() {
                <GridBackground config={(*config).clone()} />
            }
            <IntroView active={on_intro} on_enter={enter} />
            if !on_intro {
                <MainView {open_category} />
            }
            if let Page::Category(id) = &page.page {
                <CategoryView category_id={id.clone()} on_back={back} />
            }
        </div>
    }
}

fn page_slug(page: &Page) -> &'static str {
    match page {
        Page::Intro => "intro",
        Page::Main => "main",
        Page::Category(_) => "category",
    }
}
