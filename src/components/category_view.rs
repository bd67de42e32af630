use yew::prelude::*;

use crate::model::find_category;

#[derive(Properties, PartialEq, Clone)]
pub struct CategoryViewProps {
    pub category_id: String,
    pub on_back: Callback<()>,
}

#[function_component(CategoryView)]
pub fn category_view(props: &CategoryViewProps) -> Html {
    let Some(category) = find_category(&props.category_id) else {
        return html! {};
    };
    let back = {
        let cb = props.on_back.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    html! {
        <section class="category-page">
            <button class="category-back" onclick={back}>{"Back"}</button>
            <h2 class="category-title">{category.text}</h2>
            <ul class="project-list">
                { for category.projects.iter().map(|project| html! {
                    <li class="project-item" key={project.href}>
                        <a href={project.href} target="_blank" rel="noopener noreferrer">
                            <span class={classes!("icon", format!("icon-{}", project.icon))}></span>
                            {project.text}
                        </a>
                    </li>
                }) }
            </ul>
        </section>
    }
}
