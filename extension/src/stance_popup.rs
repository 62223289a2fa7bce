use yew::prelude::*;
use stance_shared::{dominant, PostTally, StanceKind};
use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub tally: PostTally,
    pub own_vote: Option<StanceKind>,
    pub on_select: Callback<StanceKind>,
    pub on_enter: Callback<()>,
    pub on_leave: Callback<()>,
}

/// The selection surface shown next to a post's trigger button.
#[function_component(StancePopup)]
pub fn stance_popup(props: &Props) -> Html {
    let on_enter = props.on_enter.reform(|_: MouseEvent| ());
    let on_leave = props.on_leave.reform(|_: MouseEvent| ());
    let leading = dominant(&props.tally);

    html! {
        <div class={POPUP} onmouseenter={on_enter} onmouseleave={on_leave}>
            <div class={GRID_STATS}>
                {for StanceKind::ALL.iter().map(|&stance| html! {
                    <div class={if leading == Some(stance) { "font-bold text-gray-100" } else { "text-gray-400" }}>
                        <div>{stance_text(stance)}</div>
                        <div>{props.tally.count(stance)}</div>
                    </div>
                })}
            </div>
            <div class="grid grid-cols-2 gap-2">
                {for StanceKind::ALL.iter().map(|&stance| {
                    let onclick = props.on_select.reform(move |_: MouseEvent| stance);
                    let chosen = props.own_vote == Some(stance);
                    html! {
                        <button
                            type="button"
                            class={combine_classes(&stance_badge(stance), if chosen { "ring-2 ring-white" } else { "" })}
                            {onclick}
                        >
                            {stance_text(stance)}
                        </button>
                    }
                })}
            </div>
            <p class={combine_classes(TEXT_MUTED, "mt-2")}>
                {format!("{} votes", props.tally.total())}
            </p>
        </div>
    }
}
