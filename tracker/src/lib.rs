pub mod adapter;
pub mod catchers;
pub mod command;
pub mod config;
pub mod cors;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod logging;
pub mod post_tracker;
pub mod routes;
pub mod storage;
pub mod store;
pub mod surface;

pub use adapter::{FeedAdapter, Label};
pub use error::{ApiError, TrackerError};
pub use ledger::VoteLedger;
pub use post_tracker::{PostTracker, TrackedPost};
pub use routes::AppState;
pub use storage::{FileBackend, MemoryBackend, SharedBackend, StorageBackend, StorageError};
pub use store::StanceStore;

use rocket::{catchers, routes, Build, Rocket};

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    let cors = cors::Cors::new(state.config.allowed_origins.clone());

    rocket::build()
        .attach(cors)
        .manage(state)
        .mount(
            "/api",
            routes![
                routes::report_feed,
                routes::get_feed,
                routes::get_tally,
                routes::select_stance,
                routes::open_surface,
                routes::close_surface,
                routes::command_stance,
                routes::all_options
            ],
        )
        .register(
            "/",
            catchers![
                catchers::bad_request,
                catchers::not_found,
                catchers::unprocessable,
                catchers::internal_error,
                catchers::unavailable
            ],
        )
}

#[cfg(test)]
mod tests;
