use yew::prelude::*;
use gloo_timers::callback::{Interval, Timeout};
use stance_shared::{
    HoverDelays, HoverEvent, HoverMachine, PostId, PostTally, RenderedPost, StanceKind, SurfaceCommand, TallyView,
    VoteOutcome,
};
use time::OffsetDateTime;
use crate::api::{self, ApiFailure};
use crate::config::CONFIG;
use crate::styles::*;

pub enum Msg {
    Refresh,
    Loaded(Result<Vec<RenderedPost>, ApiFailure>),
    Hover(HoverEvent<PostId>),
    Opened(PostId, Result<TallyView, ApiFailure>),
    Select(PostId, StanceKind),
    Voted(Result<VoteOutcome, ApiFailure>),
}

/// Live view of the tracked feed. Hovering a post's trigger opens its stance
/// popup after a short delay; leaving both trigger and popup closes it.
pub struct FeedPanel {
    posts: Vec<RenderedPost>,
    hover: HoverMachine<PostId>,
    popup: Option<(PostId, PostTally)>,
    banner: Option<String>,
    _poll: Interval,
    deadline: Option<Timeout>,
}

impl Component for FeedPanel {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let poll = {
            let link = ctx.link().clone();
            Interval::new(CONFIG.feed_poll_ms, move || link.send_message(Msg::Refresh))
        };
        ctx.link().send_message(Msg::Refresh);

        Self {
            posts: Vec::new(),
            hover: HoverMachine::new(HoverDelays::from_millis(
                CONFIG.hover_open_delay_ms,
                CONFIG.hover_close_delay_ms,
            )),
            popup: None,
            banner: None,
            _poll: poll,
            deadline: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Refresh => {
                ctx.link().send_future(async { Msg::Loaded(api::fetch_feed().await) });
                false
            }
            Msg::Loaded(Ok(posts)) => {
                self.posts = posts;
                true
            }
            Msg::Loaded(Err(failure)) => {
                web_sys::console::warn_1(&format!("Feed refresh failed: {}", failure.message).into());
                false
            }
            Msg::Hover(event) => {
                let command = self.hover.handle(event, OffsetDateTime::now_utc());
                self.apply(ctx, command);
                self.arm_deadline(ctx);
                true
            }
            Msg::Opened(id, Ok(view)) => {
                if self.hover.open_post() == Some(&id) {
                    self.popup = Some((id, view.tally));
                    true
                } else {
                    // the pointer left before the tracker answered
                    ctx.link().send_future(async move {
                        if let Err(failure) = api::close_surface(&id).await {
                            web_sys::console::warn_1(&format!("Could not close {}: {}", id, failure.message).into());
                        }
                        Msg::Refresh
                    });
                    false
                }
            }
            Msg::Opened(id, Err(failure)) => {
                web_sys::console::warn_1(&format!("Could not open {}: {}", id, failure.message).into());
                self.hover.handle(HoverEvent::Dismiss, OffsetDateTime::now_utc());
                self.popup = None;
                true
            }
            Msg::Select(id, stance) => {
                ctx.link().send_future(async move { Msg::Voted(api::select_stance(&id, stance).await) });
                false
            }
            Msg::Voted(Ok(_)) => {
                self.banner = None;
                self.popup = None;
                // the tracker closes its surface after a recorded vote
                self.hover.handle(HoverEvent::Dismiss, OffsetDateTime::now_utc());
                self.deadline = None;
                ctx.link().send_message(Msg::Refresh);
                true
            }
            Msg::Voted(Err(failure)) => {
                self.banner = Some(failure.message);
                ctx.link().send_message(Msg::Refresh);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class={CONTAINER}>
                <div class={FLEX_BETWEEN}>
                    <h1 class={HEADING_MD}>{"Feed"}</h1>
                    if self.popup.is_some() {
                        <button
                            type="button"
                            class={BUTTON_TRIGGER}
                            onclick={link.callback(|_| Msg::Hover(HoverEvent::Dismiss))}
                        >
                            {"×"}
                        </button>
                    }
                </div>

                if let Some(message) = &self.banner {
                    <div class={alert_style("error")}>
                        <p>{"Failed to save your stance. Please try again."}</p>
                        <p class="text-xs mt-1">{message}</p>
                    </div>
                }

                if self.posts.is_empty() {
                    <p class={TEXT_MUTED}>{"No posts tracked yet."}</p>
                } else {
                    <div class={SPACE_Y_BASE}>
                        {for self.posts.iter().map(|post| self.view_post(ctx, post))}
                    </div>
                }
            </div>
        }
    }
}

impl FeedPanel {
    fn apply(&mut self, ctx: &Context<Self>, command: Option<SurfaceCommand<PostId>>) {
        match command {
            Some(SurfaceCommand::Open { post, .. }) => {
                self.popup = None;
                ctx.link().send_future(async move {
                    let result = api::open_surface(&post).await;
                    Msg::Opened(post, result)
                });
            }
            Some(SurfaceCommand::Close(post)) => {
                self.popup = None;
                ctx.link().send_future(async move {
                    if let Err(failure) = api::close_surface(&post).await {
                        web_sys::console::warn_1(&format!("Could not close {}: {}", post, failure.message).into());
                    }
                    Msg::Refresh
                });
            }
            None => {}
        }
    }

    fn arm_deadline(&mut self, ctx: &Context<Self>) {
        self.deadline = self.hover.next_deadline().map(|at| {
            let wait = (at - OffsetDateTime::now_utc()).whole_milliseconds().clamp(0, u32::MAX as i128) as u32;
            let link = ctx.link().clone();
            Timeout::new(wait, move || link.send_message(Msg::Hover(HoverEvent::Tick)))
        });
    }

    fn view_post(&self, ctx: &Context<Self>, post: &RenderedPost) -> Html {
        let link = ctx.link();
        let id = post.id.clone();
        let on_enter = {
            let id = id.clone();
            link.callback(move |_: MouseEvent| Msg::Hover(HoverEvent::EnterTrigger(id.clone())))
        };
        let on_leave = {
            let id = id.clone();
            link.callback(move |_: MouseEvent| Msg::Hover(HoverEvent::LeaveTrigger(id.clone())))
        };
        let on_click = {
            let id = id.clone();
            link.callback(move |_: MouseEvent| Msg::Hover(HoverEvent::Click(id.clone())))
        };

        let popup = self.popup.as_ref().filter(|(open, _)| *open == id).map(|(_, tally)| {
            let id = id.clone();
            html! {
                <crate::stance_popup::StancePopup
                    tally={*tally}
                    own_vote={post.user_stance}
                    on_select={link.callback(move |stance| Msg::Select(id.clone(), stance))}
                    on_enter={link.callback(|_| Msg::Hover(HoverEvent::EnterSurface))}
                    on_leave={link.callback(|_| Msg::Hover(HoverEvent::LeaveSurface))}
                />
            }
        });

        html! {
            <div class={combine_classes(CARD_SECTION, "relative")} key={post.element.to_string()}>
                <div class={FLEX_BETWEEN}>
                    <span class={combine_classes(TEXT_LABEL, "truncate")}>{post.id.as_str()}</span>
                    <div class="flex items-center gap-2">
                        if let Some(stance) = post.label {
                            <span class={stance_badge(stance)}>{stance_text(stance)}</span>
                        }
                        <button
                            type="button"
                            class={BUTTON_TRIGGER}
                            onmouseenter={on_enter}
                            onmouseleave={on_leave}
                            onclick={on_click}
                        >
                            {"?"}
                        </button>
                    </div>
                </div>
                if let Some(stance) = post.user_stance {
                    <p class={TEXT_MUTED}>{format!("You voted: {}", stance_text(stance))}</p>
                }
                if let Some(failure) = &post.failure {
                    <p class={TEXT_ERROR}>{failure}</p>
                }
                {for popup}
            </div>
        }
    }
}
