use stance_shared::{dominant, parse_stance, VoteOutcome};
use tracing::info;
use crate::adapter::FeedAdapter;
use crate::error::TrackerError;
use crate::post_tracker::PostTracker;
use crate::storage::StorageBackend;

/// Toolbar entry point: records `raw_stance` for whichever post is in view.
pub async fn tag_active_post<B, A>(tracker: &PostTracker<B, A>, raw_stance: &str) -> Result<VoteOutcome, TrackerError>
where
    B: StorageBackend,
    A: FeedAdapter,
{
    let stance = parse_stance(raw_stance).map_err(|_| TrackerError::InvalidStance(raw_stance.to_string()))?;

    let (element, raw) = tracker
        .adapter()
        .active_post()
        .ok_or_else(|| TrackerError::NotFound("no post in the current view".into()))?;
    let id = tracker
        .adapter()
        .identify(&raw)
        .ok_or_else(|| TrackerError::NotFound(format!("active element has no post id: {raw}")))?;

    tracker.on_post_discovered(element, id.clone()).await;
    let tally = tracker.on_user_select(&id, stance).await?;
    info!("🏷️ Tagged active post {} as {}", id, stance);

    Ok(VoteOutcome {
        dominant: dominant(&tally),
        id,
        stance,
        tally,
    })
}
