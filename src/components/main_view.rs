use yew::prelude::*;

use crate::model::CATEGORIES;

#[derive(Properties, PartialEq, Clone)]
pub struct MainViewProps {
    pub open_category: Callback<String>,
}

#[function_component(MainView)]
pub fn main_view(props: &MainViewProps) -> Html {
    html! {
        <section class="card-inner">
            <h2 class="card-title">{"Things I make"}</h2>
            <ul class="category-list">
                { for CATEGORIES.iter().map(|category| {
                    let open = props.open_category.clone();
                    let id = category.id.to_string();
                    let onclick = Callback::from(move |e: MouseEvent| {
                        e.prevent_default();
                        open.emit(id.clone());
                    });
                    html! {
                        <li class="category-item" key={category.id}>
                            <a class="category-link" href="#" {onclick}>
                                <span class={classes!("icon", format!("icon-{}", category.icon))}></span>
                                {category.text}
                            </a>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}
