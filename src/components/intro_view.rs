use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct IntroViewProps {
    pub active: bool,
    pub on_enter: Callback<()>,
}

#[function_component(IntroView)]
pub fn intro_view(props: &IntroViewProps) -> Html {
    let enter = {
        let cb = props.on_enter.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let hover_arrow = {
        let cb = props.on_enter.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let class = classes!("content-intro", (!props.active).then_some("away"));
    html! {
        <section {class}>
            <h1 class="content-title">{"Hello there"}</h1>
            <p class="content-subtitle">{"Scroll, swipe or click to come in."}</p>
            <button class="enter" onclick={enter}>{"Enter"}</button>
            <div class="arrow" onmouseenter={hover_arrow}>{"\u{2193}"}</div>
        </section>
    }
}
