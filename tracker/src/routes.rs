use rocket::{State, delete, get, post, http::Status, serde::json::Json};
use stance_shared::{
    dominant, parse_stance, CommandRequest, FeedReport, PostId, RenderedPost, SelectRequest, TallyView,
    ValidationError, VoteOutcome,
};
use tracing::{debug, instrument};
use crate::{
    command::tag_active_post,
    config::TrackerConfig,
    error::{ApiError, TrackerError},
    feed::ReportedFeed,
    ledger::VoteLedger,
    post_tracker::PostTracker,
    storage::SharedBackend,
    store::StanceStore,
};

pub type HttpTracker = PostTracker<SharedBackend, ReportedFeed>;

pub struct AppState {
    pub tracker: HttpTracker,
    pub config: TrackerConfig,
}

impl AppState {
    pub fn new(backend: SharedBackend, config: TrackerConfig) -> Self {
        let ledger = VoteLedger::new(StanceStore::new(backend));
        Self {
            tracker: PostTracker::new(ledger, ReportedFeed::new()),
            config,
        }
    }
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[instrument(skip(state, report), fields(posts = report.posts.len()))]
#[post("/feed", format = "json", data = "<report>")]
pub async fn report_feed(state: &State<AppState>, report: Json<FeedReport>) -> Json<Vec<RenderedPost>> {
    let candidates = state.tracker.adapter().apply_report(report.into_inner());
    let registered = state.tracker.discover(candidates).await;
    debug!(registered, "Discovery pass complete");
    Json(state.tracker.adapter().rendered())
}

#[get("/feed")]
pub async fn get_feed(state: &State<AppState>) -> Json<Vec<RenderedPost>> {
    Json(state.tracker.adapter().rendered())
}

#[get("/posts/<id>/tally")]
pub async fn get_tally(
    state: &State<AppState>,
    id: Result<PostId, ValidationError>,
) -> Result<Json<TallyView>, ApiError> {
    let id = id?;
    let tally = state.tracker.tally(&id).await;
    Ok(Json(TallyView {
        dominant: dominant(&tally),
        id,
        tally,
    }))
}

#[instrument(skip(state, request), fields(post_id))]
#[post("/posts/<id>/stance", format = "json", data = "<request>")]
pub async fn select_stance(
    state: &State<AppState>,
    id: Result<PostId, ValidationError>,
    request: Json<SelectRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let id = id?;
    tracing::Span::current().record("post_id", id.as_str());
    let stance = parse_stance(&request.stance)?;

    let tally = state.tracker.on_user_select(&id, stance).await?;
    Ok(Json(VoteOutcome {
        dominant: dominant(&tally),
        id,
        stance,
        tally,
    }))
}

#[post("/posts/<id>/surface")]
pub async fn open_surface(
    state: &State<AppState>,
    id: Result<PostId, ValidationError>,
) -> Result<Json<TallyView>, ApiError> {
    let id = id?;
    let tally = state.tracker.open_selection(&id).await?;
    Ok(Json(TallyView {
        dominant: dominant(&tally),
        id,
        tally,
    }))
}

#[delete("/posts/<id>/surface")]
pub async fn close_surface(state: &State<AppState>, id: Result<PostId, ValidationError>) -> Result<Status, ApiError> {
    let id = id?;
    if state.tracker.close_selection(&id) {
        Ok(Status::NoContent)
    } else {
        Err(TrackerError::NotFound(format!("no open selection for {id}")).into())
    }
}

#[instrument(skip(state, request))]
#[post("/command/stance", format = "json", data = "<request>")]
pub async fn command_stance(
    state: &State<AppState>,
    request: Json<CommandRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    tag_active_post(&state.tracker, &request.stance)
        .await
        .map(Json)
        .map_err(ApiError::from)
}
