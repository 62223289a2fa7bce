use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod config;
mod feed_panel;
mod stance_popup;
mod styles;
mod tag_post;

use crate::{feed_panel::FeedPanel, tag_post::TagPost};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")] TagPost,
    #[at("/feed")] Feed,
}

const NAV_LINK: &str = "text-sm font-medium px-3 py-1 rounded-md transition-colors duration-200 ease-in-out text-gray-200 border border-transparent hover:border-blue-400 hover:text-blue-400";
const NAV_ACTIVE: &str = "text-blue-400 border-blue-400 ring-2 ring-blue-500 ring-offset-1 ring-offset-gray-900";

#[function_component(Navigation)]
fn navigation() -> Html {
    let current_route = use_route::<Route>();
    let active = |route: Route| if current_route.as_ref() == Some(&route) { NAV_ACTIVE } else { "" };

    html! {
        <nav class="bg-gray-900 shadow-lg w-full">
            <div class="px-4 py-3 flex justify-center space-x-4">
                <Link<Route> to={Route::TagPost} classes={classes!(NAV_LINK, active(Route::TagPost))}>
                    {"Tag"}
                </Link<Route>>
                <Link<Route> to={Route::Feed} classes={classes!(NAV_LINK, active(Route::Feed))}>
                    {"Feed"}
                </Link<Route>>
            </div>
        </nav>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <HashRouter>
            <div class="min-w-[20rem] bg-gray-900">
                <Navigation />
                <Switch<Route> render={switch} />
            </div>
        </HashRouter>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::TagPost => html! { <TagPost /> },
        Route::Feed => html! { <FeedPanel /> },
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
