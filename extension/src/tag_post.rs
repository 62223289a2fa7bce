use yew::prelude::*;
use stance_shared::{ErrorCode, StanceKind, VoteOutcome};
use crate::api;
use crate::styles::*;

#[derive(Clone, PartialEq)]
enum Status {
    Idle,
    Sending,
    Tagged(VoteOutcome),
    Failed(String),
}

/// Toolbar popup: tag whatever post is in view with the chosen stance.
#[function_component]
pub fn TagPost() -> Html {
    let selected = use_state(|| None::<StanceKind>);
    let status = use_state(|| Status::Idle);

    let on_tag = {
        let selected = selected.clone();
        let status = status.clone();
        Callback::from(move |_| {
            let Some(stance) = *selected else {
                status.set(Status::Failed("Please select a stance first!".into()));
                return;
            };
            let status = status.clone();
            status.set(Status::Sending);
            wasm_bindgen_futures::spawn_local(async move {
                match api::tag_active_post(stance).await {
                    Ok(outcome) => status.set(Status::Tagged(outcome)),
                    Err(failure) => {
                        let message = match failure.code {
                            Some(ErrorCode::NotFound) => "Failed to tag post. Make sure a post is in view.".to_string(),
                            Some(ErrorCode::StoreUnavailable) => "Could not save your stance. Please try again.".to_string(),
                            _ => failure.message,
                        };
                        status.set(Status::Failed(message));
                    }
                }
            });
        })
    };

    html! {
        <div class={CONTAINER}>
            <h1 class={HEADING_MD}>{"Tag this post"}</h1>
            <div class={SPACE_Y_BASE}>
                {for StanceKind::ALL.iter().map(|&stance| {
                    let onchange = {
                        let selected = selected.clone();
                        Callback::from(move |_| selected.set(Some(stance)))
                    };
                    html! {
                        <label class={combine_classes(CARD_SECTION, "flex items-center gap-3 cursor-pointer")}>
                            <input
                                type="radio"
                                name="stance"
                                value={stance.as_str()}
                                checked={*selected == Some(stance)}
                                {onchange}
                            />
                            <span class={stance_badge(stance)}>{stance_text(stance)}</span>
                        </label>
                    }
                })}
            </div>

            <button
                type="button"
                class={combine_classes(&button_primary(), "w-full mt-4")}
                disabled={*status == Status::Sending}
                onclick={on_tag}
            >
                {"Tag post"}
            </button>

            {match &*status {
                Status::Tagged(outcome) => html! {
                    <div class={combine_classes(&alert_style("success"), "mt-4")}>
                        {format!("Post tagged successfully! {} votes so far.", outcome.tally.total())}
                    </div>
                },
                Status::Failed(message) => html! {
                    <div class={combine_classes(&alert_style("error"), "mt-4")}>{message}</div>
                },
                Status::Idle | Status::Sending => html! {},
            }}
        </div>
    }
}
