use yew::prelude::*;

use crate::wizard::progress::Slot;

#[derive(Properties, PartialEq)]
pub struct ProgressDotsProps {
    pub slots: Vec<Slot>,
}

#[function_component(ProgressDots)]
pub fn progress_dots(props: &ProgressDotsProps) -> Html {
    html! {
        <div class="progress-dots">
            { for props.slots.iter().map(|slot| html! { <span class={slot.class()}></span> }) }
        </div>
    }
}
